use std::time::Duration;

// Shared timing/threshold constants for the scare mirror.

// Phase timing
pub const LOADING_TRANSITION_DELAY: Duration = Duration::from_millis(1000); // Setup -> mirror warm-up
pub const SCARE_RESET_DELAY: Duration = Duration::from_millis(3000); // how long the scare stays up
pub const TIP_ROTATION_INTERVAL: Duration = Duration::from_millis(2000);

// Mouth gesture
pub const MOUTH_OPEN_THRESHOLD: f32 = 0.4; // height / width
pub const MIN_MOUTH_WIDTH: f32 = 1e-4; // normalized image units

// Face mesh landmark indices (468/478 point topology)
pub const UPPER_LIP_INDEX: usize = 13;
pub const LOWER_LIP_INDEX: usize = 14;
pub const MOUTH_LEFT_INDEX: usize = 61;
pub const MOUTH_RIGHT_INDEX: usize = 291;

pub const MOUTH_LANDMARKS: [usize; 4] = [
    UPPER_LIP_INDEX,
    LOWER_LIP_INDEX,
    MOUTH_LEFT_INDEX,
    MOUTH_RIGHT_INDEX,
];

// Tracker defaults
pub const TRACKER_MAX_FACES: u32 = 1;
pub const TRACKER_REFINE_LANDMARKS: bool = true;
pub const TRACKER_MIN_DETECTION_CONFIDENCE: f32 = 0.5;
pub const TRACKER_MIN_TRACKING_CONFIDENCE: f32 = 0.5;

// The last entry is the bait.
pub const DEFAULT_TIPS: &[&str] = &[
    "Scanning facial structure...",
    "Analyzing skin clarity...",
    "Measuring symmetry...",
    "Open your mouth wide to complete the scan",
];
