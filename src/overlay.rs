use crate::constants::*;
use crate::dom;
use mirror_core::{ApplicationPhase, MirrorSnapshot};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    dom::set_visible(document, START_OVERLAY_ID, true);
}

#[inline]
pub fn hide(document: &web::Document) {
    dom::set_visible(document, START_OVERLAY_ID, false);
}

/// Enable the start button once assets have settled.
pub fn set_start_enabled(document: &web::Document, enabled: bool) {
    if let Some(btn) = document
        .get_element_by_id(START_BUTTON_ID)
        .and_then(|el| el.dyn_into::<web::HtmlButtonElement>().ok())
    {
        if btn.disabled() == enabled {
            btn.set_disabled(!enabled);
        }
    }
}

/// Put the preloaded scare image into the (hidden) scare overlay.
pub fn attach_scare_image(document: &web::Document, image: &web::HtmlImageElement) {
    if let Some(el) = document.get_element_by_id(SCARE_OVERLAY_ID) {
        if !image.is_connected() {
            _ = el.append_child(image);
        }
    }
}

pub fn show_scare(document: &web::Document) {
    dom::set_visible(document, SCARE_OVERLAY_ID, true);
}

pub fn hide_scare(document: &web::Document) {
    dom::set_visible(document, SCARE_OVERLAY_ID, false);
}

pub fn toggle_debug(document: &web::Document) -> bool {
    let Some(el) = document.get_element_by_id(DEBUG_ID) else {
        return false;
    };
    let shown = el.class_list().contains("hidden");
    dom::set_visible(document, DEBUG_ID, shown);
    shown
}

/// Refresh status, tip and badges from the snapshot.
pub fn update_hud(document: &web::Document, snap: &MirrorSnapshot) {
    dom::set_text(document, STATUS_ID, snap.status);
    set_start_enabled(document, snap.can_start());

    let tip = match snap.phase {
        ApplicationPhase::MirrorActive if snap.camera_ready => snap.tip,
        ApplicationPhase::MirrorActive => "Look into the mirror",
        _ => "",
    };
    dom::set_text(document, TIP_ID, tip);
    dom::set_visible(
        document,
        CALIBRATING_ID,
        snap.phase == ApplicationPhase::MirrorActive && !snap.camera_ready,
    );

    let debug = match snap.mouth_ratio {
        Some(r) => format!(
            "phase: {} • tip {}/{} • mouth {:.2} • scares {}",
            snap.phase,
            snap.tip_index + 1,
            snap.tip_count,
            r,
            snap.scare_count
        ),
        None => format!(
            "phase: {} • tip {}/{} • mouth – • scares {}",
            snap.phase,
            snap.tip_index + 1,
            snap.tip_count,
            snap.scare_count
        ),
    };
    dom::set_text(document, DEBUG_ID, &debug);
}
