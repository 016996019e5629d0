//! Asset warm-up for the scare sound and image.
//!
//! Both loads run concurrently and the combined future always resolves: a
//! failed asset counts as settled so a missing file can never keep the mirror
//! from starting. The scare then simply runs without that asset.

use std::fmt;
use std::future::{poll_fn, Future};
use std::pin::pin;
use std::task::Poll;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    ScareSound,
    ScareImage,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::ScareSound => "scare sound",
            AssetKind::ScareImage => "scare image",
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} failed to load from {url}: {reason}")]
pub struct AssetError {
    pub kind: AssetKind,
    pub url: String,
    pub reason: String,
}

impl AssetError {
    pub fn new(kind: AssetKind, url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetOutcome {
    Loaded,
    Failed(AssetError),
}

impl AssetOutcome {
    fn from_result(kind: AssetKind, result: Result<(), AssetError>) -> Self {
        match result {
            Ok(()) => {
                log::info!("[assets] {} loaded", kind);
                AssetOutcome::Loaded
            }
            Err(e) => {
                log::warn!("[assets] {}; continuing without it", e);
                AssetOutcome::Failed(e)
            }
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, AssetOutcome::Loaded)
    }
}

/// Both assets settled; individual outcomes kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetsReady {
    pub sound: AssetOutcome,
    pub image: AssetOutcome,
}

impl AssetsReady {
    pub fn all_loaded(&self) -> bool {
        self.sound.is_loaded() && self.image.is_loaded()
    }
}

/// Drive both loads to completion concurrently. Never fails.
pub async fn preload<S, I>(sound: S, image: I) -> AssetsReady
where
    S: Future<Output = Result<(), AssetError>>,
    I: Future<Output = Result<(), AssetError>>,
{
    let mut sound = pin!(sound);
    let mut image = pin!(image);
    let mut sound_done: Option<AssetOutcome> = None;
    let mut image_done: Option<AssetOutcome> = None;

    poll_fn(|cx| {
        if sound_done.is_none() {
            if let Poll::Ready(r) = sound.as_mut().poll(cx) {
                sound_done = Some(AssetOutcome::from_result(AssetKind::ScareSound, r));
            }
        }
        if image_done.is_none() {
            if let Poll::Ready(r) = image.as_mut().poll(cx) {
                image_done = Some(AssetOutcome::from_result(AssetKind::ScareImage, r));
            }
        }
        match (sound_done.take(), image_done.take()) {
            (Some(sound), Some(image)) => Poll::Ready(AssetsReady { sound, image }),
            (s, i) => {
                sound_done = s;
                image_done = i;
                Poll::Pending
            }
        }
    })
    .await
}
