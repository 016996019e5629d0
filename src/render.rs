use crate::constants::*;
use crate::input;
use mirror_core::{ApplicationPhase, FaceLandmarks, MirrorSnapshot};
use wasm_bindgen::JsCast;
use web_sys as web;

type Rect = (f32, f32, f32, f32);

/// 2D-canvas renderer for the mirrored feed and the tracking overlay.
pub struct Renderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    pub fn draw(
        &self,
        video: &web::HtmlVideoElement,
        face: Option<&FaceLandmarks>,
        snap: &MirrorSnapshot,
        t_sec: f32,
    ) {
        let w = self.canvas.width() as f32;
        let h = self.canvas.height() as f32;
        self.ctx.set_fill_style_str(BACKDROP_COLOR);
        self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
        if !snap.phase.shows_mirror() {
            return;
        }

        let rect = input::cover_rect(
            video.video_width() as f32,
            video.video_height() as f32,
            w,
            h,
        );
        self.draw_mirrored_video(video, rect);

        // The scare freezes the overlay; only the live mirror gets graphics.
        if snap.phase != ApplicationPhase::MirrorActive {
            return;
        }
        if let Some(face) = face {
            self.draw_landmarks(face, rect);
            self.draw_mouth_box(face, rect, snap.is_bait_shown());
        }
        if snap.camera_ready {
            let y = input::scan_line_y(t_sec, SCAN_PERIOD_SEC, h);
            self.ctx.set_fill_style_str(SCAN_LINE_COLOR);
            self.ctx.fill_rect(0.0, (y - 1.0) as f64, w as f64, 2.0);
        }
    }

    fn draw_mirrored_video(&self, video: &web::HtmlVideoElement, rect: Rect) {
        let (x, y, w, h) = rect;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.ctx.save();
        _ = self.ctx.translate((x + w) as f64, y as f64);
        _ = self.ctx.scale(-1.0, 1.0);
        if let Err(e) =
            self.ctx
                .draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, w as f64, h as f64)
        {
            log::trace!("[render] video not drawable yet: {:?}", e);
        }
        self.ctx.restore();
    }

    fn draw_landmarks(&self, face: &FaceLandmarks, rect: Rect) {
        self.ctx.set_fill_style_str(LANDMARK_COLOR);
        self.ctx.begin_path();
        for p in face.points().iter().step_by(LANDMARK_STRIDE) {
            let c = input::landmark_to_canvas(*p, rect);
            self.ctx.move_to(c.x as f64 + LANDMARK_RADIUS_PX, c.y as f64);
            _ = self.ctx.arc(
                c.x as f64,
                c.y as f64,
                LANDMARK_RADIUS_PX,
                0.0,
                std::f64::consts::TAU,
            );
        }
        self.ctx.fill();
    }

    fn draw_mouth_box(&self, face: &FaceLandmarks, rect: Rect, bait_shown: bool) {
        let Some((min, max)) = face.mouth_bounds() else {
            return;
        };
        let (min, max) = input::padded_box(min, max, MOUTH_BOX_PAD);
        // Mirroring swaps left and right, so re-sort the corners.
        let a = input::landmark_to_canvas(min, rect);
        let b = input::landmark_to_canvas(max, rect);
        let lo = a.min(b);
        let size = a.max(b) - lo;
        self.ctx.set_stroke_style_str(if bait_shown {
            MOUTH_BOX_COLOR
        } else {
            MOUTH_BOX_IDLE_COLOR
        });
        self.ctx.set_line_width(2.0);
        self.ctx
            .stroke_rect(lo.x as f64, lo.y as f64, size.x as f64, size.y as f64);
    }
}
