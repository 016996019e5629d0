use crate::constants::{
    AUDIO_ERROR_EVENT, AUDIO_READY_EVENTS, AUDIO_SETTLE_TIMEOUT_MS, SCARE_IMAGE_URL,
    SCARE_SOUND_URL,
};
use mirror_core::{preload, AssetError, AssetKind, AssetsReady};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// The scare sound and image, created once and shared for the session.
#[derive(Clone)]
pub struct ScareAssets {
    pub audio: web::HtmlAudioElement,
    pub image: web::HtmlImageElement,
}

impl ScareAssets {
    pub fn create() -> anyhow::Result<Self> {
        let audio = web::HtmlAudioElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        audio.set_preload("auto");
        let image = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        image.set_alt("");
        Ok(Self { audio, image })
    }

    /// Load both assets once. Always resolves.
    pub async fn preload(&self) -> AssetsReady {
        preload(load_audio(&self.audio), load_image(&self.image)).await
    }
}

async fn load_audio(audio: &web::HtmlAudioElement) -> Result<(), AssetError> {
    let fail = |reason: String| AssetError::new(AssetKind::ScareSound, SCARE_SOUND_URL, reason);
    let settled = settle_on(
        audio,
        &AUDIO_READY_EVENTS,
        AUDIO_ERROR_EVENT,
        AUDIO_SETTLE_TIMEOUT_MS,
    );
    audio.set_src(SCARE_SOUND_URL);
    audio.load();
    settled.await.map_err(|e| fail(format!("{:?}", e)))
}

async fn load_image(image: &web::HtmlImageElement) -> Result<(), AssetError> {
    image.set_src(SCARE_IMAGE_URL);
    JsFuture::from(image.decode())
        .await
        .map(|_| ())
        .map_err(|e| AssetError::new(AssetKind::ScareImage, SCARE_IMAGE_URL, format!("{:?}", e)))
}

/// Promise that resolves on the first of `ok_events`, and rejects on
/// `err_event` or once `timeout_ms` elapses, whichever comes first.
/// Listeners are attached before returning.
fn settle_on(
    target: &web::EventTarget,
    ok_events: &[&str],
    err_event: &str,
    timeout_ms: i32,
) -> JsFuture {
    let opts = web::AddEventListenerOptions::new();
    opts.set_once(true);
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        // A settled promise ignores later calls, so every listener may fire.
        let on_ok = Closure::<dyn FnMut()>::new(move || {
            _ = resolve.call0(&JsValue::NULL);
        });
        for event in ok_events {
            _ = target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                on_ok.as_ref().unchecked_ref(),
                &opts,
            );
        }
        on_ok.forget();

        let reject_timeout = reject.clone();
        let on_err = Closure::once_into_js(move |ev: JsValue| {
            _ = reject.call1(&JsValue::NULL, &ev);
        });
        _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            err_event,
            on_err.unchecked_ref(),
            &opts,
        );

        let on_timeout = Closure::once_into_js(move || {
            _ = reject_timeout.call1(&JsValue::NULL, &JsValue::from_str("timed out"));
        });
        if let Some(window) = web::window() {
            _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.unchecked_ref(),
                timeout_ms,
            );
        }
    });
    JsFuture::from(promise)
}

/// Start and immediately stop a muted playback so later `play()` calls are
/// allowed without a user gesture. Must be called from inside one.
pub fn unlock_for_autoplay(audio: &web::HtmlAudioElement) {
    audio.set_muted(true);
    let promise = match audio.play() {
        Ok(p) => p,
        Err(e) => {
            log::debug!("[audio] unlock failed: {:?}", e);
            audio.set_muted(false);
            return;
        }
    };
    let audio = audio.clone();
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::debug!("[audio] unlock rejected: {:?}", e);
        }
        _ = audio.pause();
        audio.set_current_time(0.0);
        audio.set_muted(false);
    });
}

/// Fire-and-forget scare playback; failure only costs the sound.
pub fn play_scare(audio: &web::HtmlAudioElement) {
    audio.set_current_time(0.0);
    match audio.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("[audio] scare playback failed: {:?}", e);
            }
        }),
        Err(e) => log::warn!("[audio] scare playback failed: {:?}", e),
    }
}

pub fn stop_scare(audio: &web::HtmlAudioElement) {
    _ = audio.pause();
}
