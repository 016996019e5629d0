use crate::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH, FACE_MESH_ASSET_BASE};
use crate::tracker;
use mirror_core::{FaceLandmarks, TrackerOptions};
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Webcam capture feeding the face tracker.
///
/// `start`/`stop` are paired: a `stop` that arrives while `start` is still
/// waiting on camera permission wins, and the camera is released as soon as
/// it comes up.
pub struct Tracking {
    camera: tracker::MpCamera,
    _mesh: tracker::FaceMesh,
    wanted: Cell<bool>,
    starting: Cell<bool>,
    running: Cell<bool>,
    _on_results: Closure<dyn FnMut(JsValue)>,
    _on_frame: Closure<dyn FnMut() -> js_sys::Promise>,
}

impl Tracking {
    /// Configure the tracker and bind it to `video`. Fails when the tracker
    /// scripts are not loaded.
    pub fn new(
        video: &web::HtmlVideoElement,
        options: &TrackerOptions,
        mut on_face: impl FnMut(Option<FaceLandmarks>) + 'static,
    ) -> anyhow::Result<Self> {
        let mesh = tracker::FaceMesh::new(&tracker::mesh_config(FACE_MESH_ASSET_BASE).map_err(js_err)?)
            .map_err(js_err)?;
        mesh.set_options(&tracker::options_to_js(options).map_err(js_err)?);

        let on_results = Closure::<dyn FnMut(JsValue)>::new(move |results: JsValue| {
            on_face(tracker::first_face(&results));
        });
        mesh.on_results(on_results.as_ref().unchecked_ref());

        let mesh_for_frame = mesh.clone();
        let video_for_frame = video.clone();
        let on_frame = Closure::<dyn FnMut() -> js_sys::Promise>::new(move || {
            match tracker::frame_input(&video_for_frame).and_then(|input| mesh_for_frame.send(&input)) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("[tracker] frame send failed: {:?}", e);
                    js_sys::Promise::resolve(&JsValue::UNDEFINED)
                }
            }
        });

        let camera_opts = tracker::camera_options(
            on_frame.as_ref().unchecked_ref(),
            CAPTURE_WIDTH,
            CAPTURE_HEIGHT,
        )
        .map_err(js_err)?;
        let camera = tracker::MpCamera::new(video, &camera_opts).map_err(js_err)?;
        log::info!(
            "[tracker] configured (max faces {}, refine {})",
            options.max_faces,
            options.refine_landmarks
        );

        Ok(Self {
            camera,
            _mesh: mesh,
            wanted: Cell::new(false),
            starting: Cell::new(false),
            running: Cell::new(false),
            _on_results: on_results,
            _on_frame: on_frame,
        })
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        self.wanted.set(true);
        if self.running.get() || self.starting.get() {
            return Ok(());
        }
        self.starting.set(true);
        let result = match self.camera.start() {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()).map_err(js_err),
            Err(e) => Err(js_err(e)),
        };
        self.starting.set(false);
        result?;

        self.running.set(true);
        log::info!("[tracker] camera started");
        if !self.wanted.get() {
            self.stop();
        }
        Ok(())
    }

    pub fn stop(&self) {
        self.wanted.set(false);
        if !self.running.get() {
            return;
        }
        self.running.set(false);
        if let Err(e) = self.camera.stop() {
            log::warn!("[tracker] camera stop failed: {:?}", e);
        }
        log::info!("[tracker] camera stopped");
    }
}

impl Drop for Tracking {
    fn drop(&mut self) {
        self.stop();
    }
}
