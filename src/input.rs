use glam::Vec2;

/// Keyboard shortcuts the mirror understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Start,
    ToggleDebug,
    ToggleFullscreen,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "Enter" | " " => Some(KeyAction::Start),
        "d" | "D" => Some(KeyAction::ToggleDebug),
        "f" | "F" => Some(KeyAction::ToggleFullscreen),
        _ => None,
    }
}

/// Destination rect `(x, y, w, h)` that covers `dst` with `src` while keeping
/// its aspect ratio (CSS `object-fit: cover`).
#[inline]
pub fn cover_rect(src_w: f32, src_h: f32, dst_w: f32, dst_h: f32) -> (f32, f32, f32, f32) {
    if src_w <= 0.0 || src_h <= 0.0 {
        return (0.0, 0.0, dst_w, dst_h);
    }
    let scale = (dst_w / src_w).max(dst_h / src_h);
    let w = src_w * scale;
    let h = src_h * scale;
    ((dst_w - w) * 0.5, (dst_h - h) * 0.5, w, h)
}

/// Map a normalized, unmirrored landmark into canvas pixels of a mirrored
/// image drawn into `rect`.
#[inline]
pub fn landmark_to_canvas(p: Vec2, rect: (f32, f32, f32, f32)) -> Vec2 {
    let (x, y, w, h) = rect;
    Vec2::new(x + (1.0 - p.x) * w, y + p.y * h)
}

/// Vertical scan line position in `[0, height]`, sweeping down then up.
#[inline]
pub fn scan_line_y(t_sec: f32, period_sec: f32, height: f32) -> f32 {
    if period_sec <= 0.0 {
        return 0.0;
    }
    let phase = (t_sec / period_sec).rem_euclid(1.0);
    let tri = if phase < 0.5 {
        phase * 2.0
    } else {
        2.0 - phase * 2.0
    };
    tri * height
}

/// Grow a normalized box by `pad` on every side.
#[inline]
pub fn padded_box(min: Vec2, max: Vec2, pad: f32) -> (Vec2, Vec2) {
    (min - Vec2::splat(pad), max + Vec2::splat(pad))
}
