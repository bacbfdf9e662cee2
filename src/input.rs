use epley_core::{Ear, Perspective, TiltKey};
use glam::Vec2;

/// Letterboxed mapping between the square simulation world and canvas pixels.
///
/// The world is scaled uniformly to fit the canvas and centered on the
/// leftover axis, so taps and drawing share one transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl ViewTransform {
    pub fn fit(world: Vec2, canvas_px: Vec2) -> Self {
        let world = world.max(Vec2::splat(1.0));
        let canvas = canvas_px.max(Vec2::splat(1.0));
        let scale = (canvas.x / world.x).min(canvas.y / world.y);
        let offset = (canvas - world * scale) * 0.5;
        Self { scale, offset }
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }

    #[inline]
    pub fn length_to_screen(&self, world_len: f32) -> f32 {
        world_len * self.scale
    }
}

/// CSS-pixel offset within an element to backing-store pixels.
#[inline]
pub fn css_to_backing_px(css: Vec2, css_size: Vec2, backing_size: Vec2) -> Vec2 {
    if css_size.x <= 0.0 || css_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    css / css_size * backing_size
}

/// What a key press means to the trainer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Ear(Ear),
    Perspective(Perspective),
    Tilt(TiltKey),
    Reset,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "l" | "L" => Some(KeyAction::Ear(Ear::Left)),
        "r" | "R" => Some(KeyAction::Ear(Ear::Right)),
        "p" | "P" => Some(KeyAction::Perspective(Perspective::Patient)),
        "c" | "C" => Some(KeyAction::Perspective(Perspective::Clinician)),
        "ArrowUp" => Some(KeyAction::Tilt(TiltKey::Up)),
        "ArrowDown" => Some(KeyAction::Tilt(TiltKey::Down)),
        "ArrowLeft" => Some(KeyAction::Tilt(TiltKey::Left)),
        "ArrowRight" => Some(KeyAction::Tilt(TiltKey::Right)),
        " " | "Spacebar" => Some(KeyAction::Reset),
        _ => None,
    }
}
