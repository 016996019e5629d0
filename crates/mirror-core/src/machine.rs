//! The scare state machine.
//!
//! One owned value holds every piece of mutable session state: phase, tip
//! cursor, camera/asset readiness and the pending deadlines. Nothing here owns
//! a platform timer. Callers feed it a monotonically increasing session clock
//! through [`ScareMachine::tick`], and every deadline handler re-reads the
//! current phase when it fires, so a deadline armed under an older phase can
//! never act on a newer one.
//!
//! Side effects are returned as [`Command`]s pushed in the same call that
//! changes the phase; the frontend executes them in order.

use crate::constants::*;
use crate::gesture::{FrameVerdict, GestureDetector};
use crate::landmarks::FaceLandmarks;
use crate::preload::AssetsReady;
use crate::state::{ApplicationPhase, MirrorSnapshot};
use crate::tips::{TipRotator, TipSequence};
use smallvec::SmallVec;
use std::time::Duration;

use crate::state::ApplicationPhase::*;

/// Effects the frontend must carry out for a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Prime audio output. Must run inside the user's start gesture.
    UnlockAudio,
    StartTracking,
    StopTracking,
    PlayScareSound,
    ShowScare,
    HideScare,
}

pub type Commands = SmallVec<[Command; 4]>;

#[derive(Clone, Debug)]
pub struct MachineConfig {
    pub loading_delay: Duration,
    pub scare_reset_delay: Duration,
    pub tip_interval: Duration,
    pub mouth_open_threshold: f32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            loading_delay: LOADING_TRANSITION_DELAY,
            scare_reset_delay: SCARE_RESET_DELAY,
            tip_interval: TIP_ROTATION_INTERVAL,
            mouth_open_threshold: MOUTH_OPEN_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deadline {
    LoadingDone,
    ScareReset,
    TipRotation,
}

pub struct ScareMachine {
    config: MachineConfig,
    phase: ApplicationPhase,
    tips: TipRotator,
    detector: GestureDetector,
    camera_ready: bool,
    assets_ready: bool,
    loading_done_at: Option<Duration>,
    scare_reset_at: Option<Duration>,
    last_ratio: Option<f32>,
    scare_count: u32,
}

impl Default for ScareMachine {
    fn default() -> Self {
        Self::new(MachineConfig::default(), TipSequence::default())
    }
}

impl ScareMachine {
    pub fn new(config: MachineConfig, tips: TipSequence) -> Self {
        Self {
            tips: TipRotator::new(tips, config.tip_interval),
            detector: GestureDetector::new(config.mouth_open_threshold),
            config,
            phase: Setup,
            camera_ready: false,
            assets_ready: false,
            loading_done_at: None,
            scare_reset_at: None,
            last_ratio: None,
            scare_count: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> ApplicationPhase {
        self.phase
    }

    #[inline]
    pub fn tip_index(&self) -> usize {
        self.tips.index()
    }

    pub fn current_tip(&self) -> &'static str {
        self.tips.current()
    }

    #[inline]
    pub fn camera_ready(&self) -> bool {
        self.camera_ready
    }

    #[inline]
    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    /// Whether the tip rotation timer is currently armed.
    #[inline]
    pub fn tip_rotation_running(&self) -> bool {
        self.tips.is_running()
    }

    /// Number of scares fired this session.
    #[inline]
    pub fn scare_count(&self) -> u32 {
        self.scare_count
    }

    pub fn status(&self) -> &'static str {
        match self.phase {
            Setup if self.assets_ready => "system ready",
            Setup => "loading assets",
            LoadingTransition => "initializing",
            MirrorActive | ScareTriggered => "online",
            TrackingUnavailable => "tracking unavailable",
        }
    }

    pub fn snapshot(&self) -> MirrorSnapshot {
        MirrorSnapshot {
            phase: self.phase,
            tip_index: self.tips.index(),
            tip_count: self.tips.sequence().len(),
            tip: self.tips.current(),
            camera_ready: self.camera_ready,
            assets_ready: self.assets_ready,
            status: self.status(),
            mouth_ratio: self.last_ratio,
            scare_count: self.scare_count,
        }
    }

    /// Record that both assets settled. Outcomes only matter for logging;
    /// a failed asset still counts as ready.
    pub fn assets_settled(&mut self, report: &AssetsReady) {
        if self.assets_ready {
            return;
        }
        self.assets_ready = true;
        if report.all_loaded() {
            log::info!("[assets] ready");
        } else {
            log::warn!(
                "[assets] ready with gaps (sound loaded={}, image loaded={})",
                report.sound.is_loaded(),
                report.image.is_loaded()
            );
        }
    }

    /// User pressed start. Returns whether the request was accepted.
    pub fn request_start(&mut self, now: Duration, out: &mut Commands) -> bool {
        if self.phase != Setup {
            log::debug!("[phase] start ignored in {}", self.phase);
            return false;
        }
        if !self.assets_ready {
            log::info!("[phase] start ignored: assets still loading");
            return false;
        }
        out.push(Command::UnlockAudio);
        self.transition(LoadingTransition, out);
        self.loading_done_at = Some(now + self.config.loading_delay);
        true
    }

    /// Fire every deadline due at `now`, oldest first.
    pub fn tick(&mut self, now: Duration, out: &mut Commands) {
        while let Some((due, which)) = self.next_due(now) {
            match which {
                Deadline::LoadingDone => self.finish_loading(due, out),
                Deadline::ScareReset => self.finish_scare(due, out),
                Deadline::TipRotation => self.rotate_tip(due),
            }
        }
    }

    /// Evaluate one tracked frame. Frames outside the mirror phase are
    /// measured but otherwise ignored.
    pub fn on_frame(
        &mut self,
        now: Duration,
        face: Option<&FaceLandmarks>,
        out: &mut Commands,
    ) -> FrameVerdict {
        let verdict = self.detector.evaluate(face);
        if self.phase != MirrorActive {
            log::trace!("[tracker] frame dropped in {}", self.phase);
            return verdict;
        }
        if verdict.ratio.is_some() {
            self.last_ratio = verdict.ratio;
        }
        if verdict.face_present && !self.camera_ready {
            self.camera_ready = true;
            self.tips.start(now);
            log::info!("[tracker] face acquired; tips rotating");
        }
        if verdict.mouth_open && self.tips.is_at_bait() {
            self.trigger_scare(now, out);
        }
        verdict
    }

    /// The tracker could not be started. Only meaningful while the mirror is
    /// supposed to be tracking.
    pub fn tracking_failed(&mut self, reason: &str, out: &mut Commands) {
        if self.phase != MirrorActive {
            log::warn!(
                "[tracker] failure reported in {} ignored: {}",
                self.phase,
                reason
            );
            return;
        }
        log::error!("[tracker] unavailable: {}", reason);
        self.transition(TrackingUnavailable, out);
    }

    fn next_due(&self, now: Duration) -> Option<(Duration, Deadline)> {
        [
            (self.loading_done_at, Deadline::LoadingDone),
            (self.scare_reset_at, Deadline::ScareReset),
            (self.tips.next_deadline(), Deadline::TipRotation),
        ]
        .into_iter()
        .filter_map(|(at, which)| at.filter(|at| *at <= now).map(|at| (at, which)))
        .min_by_key(|(at, _)| *at)
    }

    fn finish_loading(&mut self, due: Duration, out: &mut Commands) {
        self.loading_done_at = None;
        if self.phase != LoadingTransition {
            log::debug!("[phase] stale loading deadline at {:?} in {}", due, self.phase);
            return;
        }
        self.tips.reset();
        self.transition(MirrorActive, out);
    }

    fn trigger_scare(&mut self, now: Duration, out: &mut Commands) {
        if self.phase != MirrorActive {
            return;
        }
        self.transition(ScareTriggered, out);
        self.scare_reset_at = Some(now + self.config.scare_reset_delay);
        self.scare_count += 1;
        out.push(Command::PlayScareSound);
        out.push(Command::ShowScare);
        log::info!("[scare] fired (#{})", self.scare_count);
    }

    fn finish_scare(&mut self, due: Duration, out: &mut Commands) {
        self.scare_reset_at = None;
        if self.phase != ScareTriggered {
            log::debug!("[phase] stale scare reset at {:?} in {}", due, self.phase);
            return;
        }
        out.push(Command::HideScare);
        self.tips.reset();
        self.transition(MirrorActive, out);
    }

    fn rotate_tip(&mut self, due: Duration) {
        if self.phase != MirrorActive || !self.camera_ready {
            self.tips.stop();
            return;
        }
        if let Some(i) = self.tips.fire(due) {
            log::info!("[tips] {} -> \"{}\"", i, self.tips.current());
        }
    }

    /// Change phase and apply the tracking lifecycle bound to `MirrorActive`:
    /// leaving it always releases the tracker, entering it always acquires a
    /// fresh one. Both directions zero camera readiness and stop the tips.
    fn transition(&mut self, next: ApplicationPhase, out: &mut Commands) {
        let prev = self.phase;
        if !prev.can_transition_to(next) {
            log::error!("[phase] rejected {} -> {}", prev, next);
            return;
        }
        if prev == MirrorActive {
            self.release_tracking(out);
        }
        self.phase = next;
        if next == MirrorActive {
            self.acquire_tracking(out);
        }
        log::info!("[phase] {} -> {}", prev, next);
    }

    fn acquire_tracking(&mut self, out: &mut Commands) {
        self.camera_ready = false;
        self.last_ratio = None;
        self.tips.stop();
        out.push(Command::StartTracking);
    }

    fn release_tracking(&mut self, out: &mut Commands) {
        self.camera_ready = false;
        self.tips.stop();
        out.push(Command::StopTracking);
    }
}
