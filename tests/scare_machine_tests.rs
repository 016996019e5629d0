// Host-side scenario tests for the scare state machine.
// Time is simulated: every call takes an explicit session clock value.

use glam::Vec2;
use mirror_core::constants::*;
use mirror_core::*;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn face_with_ratio(ratio: f32) -> FaceLandmarks {
    let width = 0.2;
    let mut points = vec![Vec2::new(0.5, 0.5); 478];
    points[UPPER_LIP_INDEX] = Vec2::new(0.5, 0.6);
    points[LOWER_LIP_INDEX] = Vec2::new(0.5, 0.6 + ratio * width);
    points[MOUTH_LEFT_INDEX] = Vec2::new(0.4, 0.65);
    points[MOUTH_RIGHT_INDEX] = Vec2::new(0.6, 0.65);
    FaceLandmarks::new(points)
}

fn assets_ok() -> AssetsReady {
    AssetsReady {
        sound: AssetOutcome::Loaded,
        image: AssetOutcome::Loaded,
    }
}

/// Small harness: machine plus a log of every command it emitted.
struct Session {
    m: ScareMachine,
    now: Duration,
    log: Vec<Command>,
    phases: Vec<ApplicationPhase>,
}

impl Session {
    fn new() -> Self {
        init_logs();
        let m = ScareMachine::default();
        let phases = vec![m.phase()];
        Self {
            m,
            now: Duration::ZERO,
            log: Vec::new(),
            phases,
        }
    }

    fn record(&mut self, out: Commands) {
        self.log.extend(out);
        if self.phases.last() != Some(&self.m.phase()) {
            self.phases.push(self.m.phase());
        }
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        let mut out = Commands::new();
        self.m.tick(self.now, &mut out);
        self.record(out);
    }

    /// Step in 100 ms increments, like a coarse frame loop would.
    fn run_for(&mut self, total: Duration) {
        let step = ms(100);
        let mut left = total;
        while left > Duration::ZERO {
            let s = left.min(step);
            self.advance(s);
            left -= s;
        }
    }

    fn start(&mut self) -> bool {
        let mut out = Commands::new();
        let accepted = self.m.request_start(self.now, &mut out);
        self.record(out);
        accepted
    }

    fn frame(&mut self, face: Option<&FaceLandmarks>) -> FrameVerdict {
        let mut out = Commands::new();
        let v = self.m.on_frame(self.now, face, &mut out);
        self.record(out);
        v
    }

    fn count(&self, cmd: Command) -> usize {
        self.log.iter().filter(|c| **c == cmd).count()
    }

    /// Ready assets, start, wait out the loading delay.
    fn into_mirror() -> Self {
        let mut s = Self::new();
        s.m.assets_settled(&assets_ok());
        assert!(s.start());
        s.advance(LOADING_TRANSITION_DELAY);
        assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
        s
    }

    /// Acquire a face and let the tips run up to the bait.
    fn into_bait() -> Self {
        let mut s = Self::into_mirror();
        s.frame(Some(&face_with_ratio(0.1)));
        s.run_for(TIP_ROTATION_INTERVAL * 3);
        assert_eq!(s.m.tip_index(), 3);
        s
    }
}

#[test]
fn start_is_noop_until_assets_ready() {
    let mut s = Session::new();
    assert!(!s.m.assets_ready());
    assert!(!s.start());
    assert_eq!(s.m.phase(), ApplicationPhase::Setup);
    assert!(s.log.is_empty(), "no unlock without a valid start");

    s.m.assets_settled(&assets_ok());
    assert!(s.start());
    assert_eq!(s.m.phase(), ApplicationPhase::LoadingTransition);
    assert_eq!(s.log, vec![Command::UnlockAudio]);

    s.advance(ms(999));
    assert_eq!(s.m.phase(), ApplicationPhase::LoadingTransition);
    s.advance(ms(1));
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
    assert_eq!(s.m.tip_index(), 0);
    assert_eq!(s.m.status(), "online");
    assert_eq!(s.count(Command::StartTracking), 1);
}

#[test]
fn assets_ready_even_when_loads_fail() {
    let ready = pollster::block_on(preload(
        async {
            Err(AssetError::new(
                AssetKind::ScareSound,
                "scream.mp3",
                "network error",
            ))
        },
        async {
            Err(AssetError::new(
                AssetKind::ScareImage,
                "does-not-exist.png",
                "404",
            ))
        },
    ));
    assert!(!ready.sound.is_loaded());
    assert!(!ready.image.is_loaded());

    let mut s = Session::new();
    s.m.assets_settled(&ready);
    assert!(s.m.assets_ready());
    assert!(s.start());
}

#[test]
fn faceless_frames_do_not_calibrate() {
    let mut s = Session::into_mirror();
    for _ in 0..3 {
        let v = s.frame(None);
        assert!(!v.face_present);
        s.advance(ms(30));
    }
    assert!(!s.m.camera_ready());
    assert!(!s.m.tip_rotation_running());

    s.run_for(ms(5000));
    assert_eq!(s.m.tip_index(), 0, "no rotation before a face");

    let v = s.frame(Some(&face_with_ratio(0.1)));
    assert!(v.face_present);
    assert!(s.m.camera_ready());
    assert!(s.m.tip_rotation_running());
}

#[test]
fn tips_are_monotonic_and_clamp_at_bait() {
    let mut s = Session::into_mirror();
    s.frame(Some(&face_with_ratio(0.1)));
    let mut prev = s.m.tip_index();
    for _ in 0..200 {
        s.advance(ms(100));
        let i = s.m.tip_index();
        assert!(i >= prev, "tip went backwards {prev} -> {i}");
        assert!(i <= 3);
        prev = i;
    }
    assert_eq!(s.m.tip_index(), 3);
    assert_eq!(s.m.current_tip(), DEFAULT_TIPS[3]);
    assert!(!s.m.tip_rotation_running());
}

#[test]
fn tips_advance_every_interval() {
    let mut s = Session::into_mirror();
    s.frame(Some(&face_with_ratio(0.1)));
    s.advance(ms(1999));
    assert_eq!(s.m.tip_index(), 0);
    s.advance(ms(1));
    assert_eq!(s.m.tip_index(), 1);
    s.advance(ms(2000));
    assert_eq!(s.m.tip_index(), 2);
}

#[test]
fn large_clock_jump_catches_up_in_one_tick() {
    let mut s = Session::into_mirror();
    s.frame(Some(&face_with_ratio(0.1)));
    s.advance(ms(60_000));
    assert_eq!(s.m.tip_index(), 3);
}

#[test]
fn open_mouth_on_bait_fires_and_resets() {
    let mut s = Session::into_bait();
    let v = s.frame(Some(&face_with_ratio(0.5)));
    assert!(v.mouth_open);
    assert_eq!(s.m.phase(), ApplicationPhase::ScareTriggered);
    assert!(!s.m.camera_ready());
    assert_eq!(s.count(Command::PlayScareSound), 1);
    assert_eq!(s.count(Command::ShowScare), 1);

    s.advance(ms(2999));
    assert_eq!(s.m.phase(), ApplicationPhase::ScareTriggered);
    s.advance(ms(1));
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
    assert_eq!(s.m.tip_index(), 0);
    assert!(!s.m.camera_ready(), "recalibration required after the scare");
    assert_eq!(s.count(Command::HideScare), 1);
}

#[test]
fn open_mouth_before_bait_does_nothing() {
    let mut s = Session::into_mirror();
    s.frame(Some(&face_with_ratio(0.1)));
    s.advance(TIP_ROTATION_INTERVAL);
    assert_eq!(s.m.tip_index(), 1);

    let v = s.frame(Some(&face_with_ratio(0.9)));
    assert!(v.mouth_open);
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
    assert_eq!(s.count(Command::PlayScareSound), 0);
}

#[test]
fn repeated_triggers_fire_once() {
    let mut s = Session::into_bait();
    for _ in 0..10 {
        s.frame(Some(&face_with_ratio(0.8)));
        s.advance(ms(16));
    }
    assert_eq!(s.m.phase(), ApplicationPhase::ScareTriggered);
    assert_eq!(s.m.scare_count(), 1);
    assert_eq!(s.count(Command::PlayScareSound), 1);
    assert_eq!(s.count(Command::ShowScare), 1);

    s.run_for(SCARE_RESET_DELAY);
    assert_eq!(s.count(Command::HideScare), 1);
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
}

#[test]
fn tracking_is_paired_across_scare_round_trip() {
    let mut s = Session::into_bait();
    s.frame(Some(&face_with_ratio(0.6)));
    s.run_for(SCARE_RESET_DELAY);

    let tracking: Vec<_> = s
        .log
        .iter()
        .filter(|c| matches!(c, Command::StartTracking | Command::StopTracking))
        .copied()
        .collect();
    assert_eq!(
        tracking,
        vec![
            Command::StartTracking,
            Command::StopTracking,
            Command::StartTracking
        ]
    );
}

#[test]
fn full_second_cycle_requires_recalibration() {
    let mut s = Session::into_bait();
    s.frame(Some(&face_with_ratio(0.6)));
    s.run_for(SCARE_RESET_DELAY);
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);

    // Open mouth right after reset is on tip 0 and must not fire.
    s.frame(Some(&face_with_ratio(0.9)));
    assert_eq!(s.m.phase(), ApplicationPhase::MirrorActive);
    assert!(s.m.camera_ready());

    s.run_for(TIP_ROTATION_INTERVAL * 3);
    assert_eq!(s.m.tip_index(), 3);
    s.frame(Some(&face_with_ratio(0.9)));
    assert_eq!(s.m.phase(), ApplicationPhase::ScareTriggered);
    assert_eq!(s.m.scare_count(), 2);
}

#[test]
fn scare_only_enters_from_and_returns_to_mirror() {
    let mut s = Session::into_bait();
    s.frame(Some(&face_with_ratio(0.6)));
    s.run_for(SCARE_RESET_DELAY);
    s.frame(Some(&face_with_ratio(0.1)));
    s.run_for(TIP_ROTATION_INTERVAL * 3);
    s.frame(Some(&face_with_ratio(0.6)));
    s.run_for(SCARE_RESET_DELAY);

    for pair in s.phases.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        assert!(from.can_transition_to(to), "{from} -> {to}");
        if to == ApplicationPhase::ScareTriggered {
            assert_eq!(from, ApplicationPhase::MirrorActive);
        }
        if from == ApplicationPhase::ScareTriggered {
            assert_eq!(to, ApplicationPhase::MirrorActive);
        }
    }
    assert_eq!(s.m.scare_count(), 2);
}

#[test]
fn frames_during_scare_are_ignored() {
    let mut s = Session::into_bait();
    s.frame(Some(&face_with_ratio(0.6)));
    let before = s.log.len();
    s.frame(Some(&face_with_ratio(0.1)));
    s.frame(None);
    assert_eq!(s.log.len(), before);
    assert!(!s.m.camera_ready());
}

#[test]
fn tracking_failure_is_terminal_and_stops_tips() {
    let mut s = Session::into_mirror();
    s.frame(Some(&face_with_ratio(0.1)));
    assert!(s.m.tip_rotation_running());

    let mut out = Commands::new();
    s.m.tracking_failed("camera permission denied", &mut out);
    s.record(out);
    assert_eq!(s.m.phase(), ApplicationPhase::TrackingUnavailable);
    assert_eq!(s.m.status(), "tracking unavailable");
    assert!(!s.m.camera_ready());
    assert!(!s.m.tip_rotation_running());
    assert_eq!(s.count(Command::StopTracking), 1);

    s.run_for(ms(10_000));
    s.frame(Some(&face_with_ratio(0.9)));
    assert!(!s.start());
    assert_eq!(s.m.phase(), ApplicationPhase::TrackingUnavailable);
    assert_eq!(s.m.tip_index(), 0);
}

#[test]
fn snapshot_reflects_machine() {
    let mut s = Session::into_bait();
    s.frame(Some(&face_with_ratio(0.3)));
    let snap = s.m.snapshot();
    assert_eq!(snap.phase, ApplicationPhase::MirrorActive);
    assert_eq!(snap.tip_index, 3);
    assert_eq!(snap.tip_count, 4);
    assert!(snap.is_bait_shown());
    assert!(snap.camera_ready);
    assert!(snap.assets_ready);
    assert!(!snap.can_start());
    let ratio = snap.mouth_ratio.unwrap();
    assert!((ratio - 0.3).abs() < 1e-3);
}
