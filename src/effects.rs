use crate::assets::{self, ScareAssets};
use crate::camera::Tracking;
use crate::overlay;
use instant::Instant;
use mirror_core::{Command, Commands, FaceLandmarks, ScareMachine};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Session clock shared by the frame loop and the tracker callback.
#[derive(Clone, Copy)]
pub struct SessionClock {
    started: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Everything needed to carry out machine commands.
///
/// The machine is only borrowed inside the methods here, never across an
/// `apply`, so commands that report back into it (tracker failure) can borrow
/// it again.
#[derive(Clone)]
pub struct Effects {
    pub machine: Rc<RefCell<ScareMachine>>,
    pub tracking: Rc<RefCell<Option<Rc<Tracking>>>>,
    pub latest_face: Rc<RefCell<Option<FaceLandmarks>>>,
    pub assets: ScareAssets,
    pub document: web::Document,
    pub clock: SessionClock,
}

impl Effects {
    pub fn apply(&self, commands: Commands) {
        for cmd in commands {
            log::debug!("[effects] {:?}", cmd);
            match cmd {
                Command::UnlockAudio => assets::unlock_for_autoplay(&self.assets.audio),
                Command::StartTracking => self.start_tracking(),
                Command::StopTracking => self.stop_tracking(),
                Command::PlayScareSound => assets::play_scare(&self.assets.audio),
                Command::ShowScare => overlay::show_scare(&self.document),
                Command::HideScare => {
                    overlay::hide_scare(&self.document);
                    assets::stop_scare(&self.assets.audio);
                }
            }
        }
    }

    /// Start button / key. Runs inside the user gesture so the audio unlock
    /// is honored by the browser.
    pub fn request_start(&self) {
        let mut out = Commands::new();
        let accepted = self
            .machine
            .borrow_mut()
            .request_start(self.clock.now(), &mut out);
        if accepted {
            overlay::hide(&self.document);
        }
        self.apply(out);
    }

    /// Per-frame tracker callback.
    pub fn handle_frame(&self, face: Option<FaceLandmarks>) {
        let mut out = Commands::new();
        let verdict = self
            .machine
            .borrow_mut()
            .on_frame(self.clock.now(), face.as_ref(), &mut out);
        if let Some(r) = verdict.ratio {
            log::trace!("[gesture] ratio {:.3} open={}", r, verdict.mouth_open);
        }
        *self.latest_face.borrow_mut() = face;
        self.apply(out);
    }

    /// Run due deadlines; called once per animation frame.
    pub fn tick(&self) {
        let mut out = Commands::new();
        self.machine.borrow_mut().tick(self.clock.now(), &mut out);
        self.apply(out);
    }

    fn start_tracking(&self) {
        self.latest_face.borrow_mut().take();
        let tracking = self.tracking.borrow().clone();
        let Some(tracking) = tracking else {
            self.report_tracking_failure("face tracker is not loaded");
            return;
        };
        let fx = self.clone();
        spawn_local(async move {
            if let Err(e) = tracking.start().await {
                fx.report_tracking_failure(&format!("{:#}", e));
            }
        });
    }

    fn stop_tracking(&self) {
        if let Some(tracking) = self.tracking.borrow().as_ref() {
            tracking.stop();
        }
    }

    fn report_tracking_failure(&self, reason: &str) {
        let mut out = Commands::new();
        self.machine.borrow_mut().tracking_failed(reason, &mut out);
        self.apply(out);
    }
}
