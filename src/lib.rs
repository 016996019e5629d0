#![cfg(target_arch = "wasm32")]
use mirror_core::{ScareMachine, TrackerOptions};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod camera;
mod constants;
mod dom;
mod effects;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod tracker;

use constants::{CANVAS_ID, VIDEO_ID};

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Bind the tracker to the video element. A missing tracker is logged and
/// left as `None`; the machine learns about it on the first `StartTracking`.
fn init_tracking(video: &web::HtmlVideoElement, fx: &effects::Effects) {
    let fx_frames = fx.clone();
    match camera::Tracking::new(video, &TrackerOptions::default(), move |face| {
        fx_frames.handle_frame(face)
    }) {
        Ok(t) => *fx.tracking.borrow_mut() = Some(Rc::new(t)),
        Err(e) => log::error!("[tracker] init failed: {:#}", e),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("mirror-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;
    let video: web::HtmlVideoElement = dom::element_by_id(&document, VIDEO_ID)?;
    wire_canvas_resize(&canvas);

    let assets = assets::ScareAssets::create()?;
    overlay::attach_scare_image(&document, &assets.image);
    overlay::hide_scare(&document);

    let fx = effects::Effects {
        machine: Rc::new(RefCell::new(ScareMachine::default())),
        tracking: Rc::new(RefCell::new(None)),
        latest_face: Rc::new(RefCell::new(None)),
        assets: assets.clone(),
        document: document.clone(),
        clock: effects::SessionClock::start(),
    };
    init_tracking(&video, &fx);

    events::wire_start_button(&document, fx.clone());
    events::wire_global_keydown(fx.clone(), canvas.clone());
    overlay::show(&document);
    overlay::update_hud(&document, &fx.machine.borrow().snapshot());

    // Warm the scare assets; the start button stays disabled until both settle.
    let machine = fx.machine.clone();
    spawn_local(async move {
        let report = assets.preload().await;
        machine.borrow_mut().assets_settled(&report);
    });

    let renderer = match render::Renderer::new(&canvas) {
        Ok(r) => Some(r),
        Err(e) => {
            log::error!("[render] canvas init failed: {:?}", e);
            None
        }
    };
    frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
        fx,
        renderer,
        video,
        last_snapshot: None,
    })));
    Ok(())
}
