//! Phase and presentation-side state shared with the web frontend.
//!
//! These types avoid platform APIs. The frontend renders exclusively from a
//! [`MirrorSnapshot`] taken once per animation frame.

use std::fmt;

/// Coarse application mode. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApplicationPhase {
    #[default]
    Setup,
    LoadingTransition,
    MirrorActive,
    ScareTriggered,
    /// The tracker could not be started; the session stays here.
    TrackingUnavailable,
}

impl ApplicationPhase {
    /// Edges of the phase graph. Everything else is rejected.
    pub fn can_transition_to(self, next: ApplicationPhase) -> bool {
        use ApplicationPhase::*;
        matches!(
            (self, next),
            (Setup, LoadingTransition)
                | (LoadingTransition, MirrorActive)
                | (MirrorActive, ScareTriggered)
                | (ScareTriggered, MirrorActive)
                | (MirrorActive, TrackingUnavailable)
        )
    }

    /// Whether the camera feed is on screen in this phase.
    pub fn shows_mirror(self) -> bool {
        matches!(
            self,
            ApplicationPhase::MirrorActive | ApplicationPhase::ScareTriggered
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationPhase::Setup => "setup",
            ApplicationPhase::LoadingTransition => "loading",
            ApplicationPhase::MirrorActive => "mirror",
            ApplicationPhase::ScareTriggered => "scare",
            ApplicationPhase::TrackingUnavailable => "tracking-unavailable",
        }
    }
}

impl fmt::Display for ApplicationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the machine for one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MirrorSnapshot {
    pub phase: ApplicationPhase,
    pub tip_index: usize,
    pub tip_count: usize,
    pub tip: &'static str,
    pub camera_ready: bool,
    pub assets_ready: bool,
    pub status: &'static str,
    /// Mouth ratio from the latest frame that had a usable face.
    pub mouth_ratio: Option<f32>,
    pub scare_count: u32,
}

impl MirrorSnapshot {
    #[inline]
    pub fn can_start(&self) -> bool {
        self.phase == ApplicationPhase::Setup && self.assets_ready
    }

    #[inline]
    pub fn is_bait_shown(&self) -> bool {
        self.tip_count > 0 && self.tip_index == self.tip_count - 1
    }
}
