//! Time-based animation: easing curves, tweens and the randomized spotlight
//! scheduler.

mod easing;
mod random;
mod scheduler;
mod tween;

pub use easing::Easing;
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use scheduler::{ConeParams, LightAnimator, LightCycle, StopToken};
pub use tween::{Interpolate, Tween};
