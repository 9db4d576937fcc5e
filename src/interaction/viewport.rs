use eframe::egui::{Pos2, Vec2, pos2, vec2};

/// Screen = content * scale + translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

/// The visible canvas: its size in screen pixels (origin at the top-left
/// corner) and the pan/zoom applied to content at render time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
    pub transform: ViewTransform,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: vec2(width, height),
            transform: ViewTransform::default(),
        }
    }

    /// A viewport whose center shows the content origin.
    pub fn centered(width: f32, height: f32) -> Self {
        Self {
            size: vec2(width, height),
            transform: ViewTransform {
                translate: vec2(width, height) * 0.5,
                scale: 1.0,
            },
        }
    }

    /// Keeps the content point under the old center under the new one.
    pub fn resize(&mut self, width: f32, height: f32) {
        let new_size = vec2(width, height);
        self.transform.translate += (new_size - self.size) * 0.5;
        self.size = new_size;
    }

    pub fn screen_to_content(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.transform.translate) / self.transform.scale
    }

    pub fn content_to_screen(&self, content: Vec2) -> Pos2 {
        (content * self.transform.scale + self.transform.translate).to_pos2()
    }

    pub fn clamp_screen(&self, screen: Pos2) -> Pos2 {
        pos2(
            screen.x.clamp(0.0, self.size.x.max(0.0)),
            screen.y.clamp(0.0, self.size.y.max(0.0)),
        )
    }

    pub fn pan_to(&mut self, translate: Vec2) {
        self.transform.translate = translate;
    }

    /// Zooms by a wheel delta, keeping the content point under `anchor` fixed
    /// on screen. Non-finite input and limits that do not form a positive
    /// range leave the view untouched.
    pub fn zoom_at(&mut self, anchor: Pos2, delta: f32, sensitivity: f32, min: f32, max: f32) -> bool {
        if !delta.is_finite() || !sensitivity.is_finite() || !valid_zoom_range(min, max) {
            return false;
        }

        let content_before = self.screen_to_content(anchor);
        let factor = (1.0 + (delta * sensitivity)).clamp(0.85, 1.15);
        self.transform.scale = (self.transform.scale * factor).clamp(min, max);
        self.transform.translate = anchor.to_vec2() - (content_before * self.transform.scale);
        true
    }
}

pub(super) fn valid_zoom_range(min: f32, max: f32) -> bool {
    min.is_finite() && min > 0.0 && !max.is_nan() && min <= max
}
