//! Bindings to the MediaPipe FaceMesh and camera helper globals loaded by
//! index.html, plus narrowing of their untyped results.

use glam::Vec2;
use js_sys::{Array, Object, Reflect};
use mirror_core::{FaceLandmarks, TrackerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = FaceMesh)]
    pub type FaceMesh;

    #[wasm_bindgen(constructor, js_class = "FaceMesh", catch)]
    pub fn new(config: &JsValue) -> Result<FaceMesh, JsValue>;

    #[wasm_bindgen(method, js_class = "FaceMesh", js_name = setOptions)]
    pub fn set_options(this: &FaceMesh, options: &JsValue);

    #[wasm_bindgen(method, js_class = "FaceMesh", js_name = onResults)]
    pub fn on_results(this: &FaceMesh, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_class = "FaceMesh", catch)]
    pub fn send(this: &FaceMesh, inputs: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Camera)]
    pub type MpCamera;

    #[wasm_bindgen(constructor, js_class = "Camera", catch)]
    pub fn new(video: &web::HtmlVideoElement, options: &JsValue) -> Result<MpCamera, JsValue>;

    #[wasm_bindgen(method, js_class = "Camera", catch)]
    pub fn start(this: &MpCamera) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, js_class = "Camera", catch)]
    pub fn stop(this: &MpCamera) -> Result<js_sys::Promise, JsValue>;
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

/// `{ locateFile }` config pointing the tracker at its CDN assets.
pub fn mesh_config(asset_base: &str) -> Result<JsValue, JsValue> {
    let base = asset_base.trim_end_matches('/').to_string();
    let locate = Closure::<dyn Fn(String) -> String>::new(move |file: String| {
        format!("{}/{}", base, file)
    });
    let cfg = Object::new();
    set(&cfg, "locateFile", locate.as_ref())?;
    locate.forget();
    Ok(cfg.into())
}

pub fn options_to_js(opts: &TrackerOptions) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "maxNumFaces", &JsValue::from(opts.max_faces))?;
    set(&obj, "refineLandmarks", &JsValue::from(opts.refine_landmarks))?;
    set(
        &obj,
        "minDetectionConfidence",
        &JsValue::from(opts.min_detection_confidence),
    )?;
    set(
        &obj,
        "minTrackingConfidence",
        &JsValue::from(opts.min_tracking_confidence),
    )?;
    Ok(obj.into())
}

/// Pull the first face out of a results object. Anything malformed is
/// treated as "no face".
pub fn first_face(results: &JsValue) -> Option<FaceLandmarks> {
    let faces = Reflect::get(results, &JsValue::from_str("multiFaceLandmarks")).ok()?;
    let faces: Array = faces.dyn_into().ok()?;
    let face: Array = faces.get(0).dyn_into().ok()?;
    let key_x = JsValue::from_str("x");
    let key_y = JsValue::from_str("y");
    let mut points = Vec::with_capacity(face.length() as usize);
    for p in face.iter() {
        let x = Reflect::get(&p, &key_x).ok()?.as_f64()?;
        let y = Reflect::get(&p, &key_y).ok()?.as_f64()?;
        points.push(Vec2::new(x as f32, y as f32));
    }
    if points.is_empty() {
        return None;
    }
    Some(FaceLandmarks::new(points))
}

/// `{ image }` payload for `FaceMesh.send`.
pub fn frame_input(video: &web::HtmlVideoElement) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "image", video.as_ref())?;
    Ok(obj.into())
}

/// `{ onFrame, width, height }` options for the camera helper.
pub fn camera_options(
    on_frame: &js_sys::Function,
    width: u32,
    height: u32,
) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "onFrame", on_frame.as_ref())?;
    set(&obj, "width", &JsValue::from(width))?;
    set(&obj, "height", &JsValue::from(height))?;
    Ok(obj.into())
}
