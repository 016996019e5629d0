use crate::constants::START_BUTTON_ID;
use crate::dom;
use crate::effects::Effects;
use crate::input::{key_action, KeyAction};
use crate::overlay;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_start_button(document: &web::Document, fx: Effects) {
    dom::add_click_listener(document, START_BUTTON_ID, move || fx.request_start());
}

fn handle_keydown(ev: &web::KeyboardEvent, fx: &Effects, canvas: &web::HtmlCanvasElement) {
    if ev.repeat() {
        return;
    }
    let Some(action) = key_action(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::Start => {
            fx.request_start();
            ev.prevent_default();
        }
        KeyAction::ToggleDebug => {
            let shown = overlay::toggle_debug(&fx.document);
            log::info!("[keys] debug readout {}", if shown { "on" } else { "off" });
        }
        KeyAction::ToggleFullscreen => {
            if fx.document.fullscreen_element().is_some() {
                fx.document.exit_fullscreen();
            } else {
                _ = canvas.request_fullscreen();
            }
            ev.prevent_default();
        }
    }
}

pub fn wire_global_keydown(fx: Effects, canvas: web::HtmlCanvasElement) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_keydown(&ev, &fx, &canvas);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
