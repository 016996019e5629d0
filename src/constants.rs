// Shared visual/DOM constants used by the web frontend.

// Assets
pub const SCARE_SOUND_URL: &str = "assets/scream.mp3";
pub const SCARE_IMAGE_URL: &str = "assets/scare.png";

// Audio counts as settled on the first of these; some browsers skip
// `canplaythrough` until a user gesture.
pub const AUDIO_READY_EVENTS: [&str; 2] = ["canplaythrough", "loadeddata"];
pub const AUDIO_ERROR_EVENT: &str = "error";
pub const AUDIO_SETTLE_TIMEOUT_MS: i32 = 8000; // gives up and reports a failed load

// Tracker model files are fetched from here at runtime
pub const FACE_MESH_ASSET_BASE: &str = "https://cdn.jsdelivr.net/npm/@mediapipe/face_mesh";

// DOM element ids (see index.html)
pub const CANVAS_ID: &str = "mirror-canvas";
pub const VIDEO_ID: &str = "mirror-video";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const START_BUTTON_ID: &str = "start-button";
pub const STATUS_ID: &str = "status-text";
pub const TIP_ID: &str = "tip-text";
pub const CALIBRATING_ID: &str = "calibrating-badge";
pub const DEBUG_ID: &str = "debug-readout";
pub const SCARE_OVERLAY_ID: &str = "scare-overlay";

// Camera capture size requested from the tracker's camera helper
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

// Overlay drawing
pub const LANDMARK_STRIDE: usize = 4; // draw every Nth mesh point
pub const LANDMARK_RADIUS_PX: f64 = 1.5;
pub const MOUTH_BOX_PAD: f32 = 0.015; // normalized image units
pub const SCAN_PERIOD_SEC: f32 = 2.4; // top -> bottom -> top

// Palette
pub const LANDMARK_COLOR: &str = "rgba(80, 255, 200, 0.55)";
pub const MOUTH_BOX_COLOR: &str = "rgba(255, 80, 80, 0.9)";
pub const MOUTH_BOX_IDLE_COLOR: &str = "rgba(80, 255, 200, 0.8)";
pub const SCAN_LINE_COLOR: &str = "rgba(80, 255, 200, 0.35)";
pub const BACKDROP_COLOR: &str = "#05070c";
