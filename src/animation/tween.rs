use glam::Vec2;

use super::easing::Easing;

/// Values that can be linearly blended
pub trait Interpolate: Copy {
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Eased interpolation from `from` to `to` over `duration` milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    start: f64,
    duration: f64,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Linear progress in [0, 1]; zero-length tweens are complete immediately
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, now: f64) -> T {
        self.from.interpolate(self.to, self.easing.apply(self.progress(now)))
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }
}
