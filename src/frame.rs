use crate::effects::Effects;
use crate::overlay;
use crate::render::Renderer;
use mirror_core::MirrorSnapshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub fx: Effects,
    pub renderer: Option<Renderer>,
    pub video: web::HtmlVideoElement,
    pub last_snapshot: Option<MirrorSnapshot>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        self.fx.tick();

        let snap = self.fx.machine.borrow().snapshot();
        if let Some(r) = &self.renderer {
            let t_sec = self.fx.clock.now().as_secs_f32();
            let face = self.fx.latest_face.borrow();
            r.draw(&self.video, face.as_ref(), &snap, t_sec);
        }

        // DOM writes only when something visible changed.
        if self.last_snapshot.as_ref() != Some(&snap) {
            overlay::update_hud(&self.fx.document, &snap);
            self.last_snapshot = Some(snap);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
