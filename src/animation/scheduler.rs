//! Randomized, self-repeating spotlight animation.
//!
//! Each light runs an independent cycle: pick a new hue, cone angle, penumbra
//! and (x, z) position, ease towards them, and fire again a fixed interval
//! later. The first cycle of every light is delayed by a random stagger so the
//! lights never move in lockstep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec2;

use super::random::RandomSource;
use super::tween::{Interpolate, Tween};
use crate::config::AnimationConfig;
use crate::light::SpotLight;
use crate::math::Color;

/// Shared cancellation flag for the animation schedule
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    cancelled: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cone shape animated as a unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeParams {
    pub angle: f32,
    pub penumbra: f32,
}

impl Interpolate for ConeParams {
    fn interpolate(self, to: Self, t: f32) -> Self {
        Self {
            angle: self.angle.interpolate(to.angle, t),
            penumbra: self.penumbra.interpolate(to.penumbra, t),
        }
    }
}

/// Targets sampled by one animation cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCycle {
    pub light: usize,
    pub fired_at: f64,
    pub hue: f32,
    pub angle: f32,
    pub penumbra: f32,
    /// Target (x, z) position
    pub position: Vec2,
    pub cone_duration: f64,
    pub position_duration: f64,
}

#[derive(Debug, Clone, Default)]
struct LightTrack {
    next_fire: f64,
    cycles: u64,
    cone: Option<Tween<ConeParams>>,
    position: Option<Tween<Vec2>>,
    last: Option<LightCycle>,
}

/// Drives the animation cycles of a fixed set of spotlights
#[derive(Debug, Clone)]
pub struct LightAnimator {
    config: AnimationConfig,
    tracks: Vec<LightTrack>,
    stop: StopToken,
}

impl LightAnimator {
    /// Schedule the first cycle of `light_count` lights, each after its own
    /// random stagger from `now`
    pub fn start(
        light_count: usize,
        now: f64,
        config: AnimationConfig,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let tracks = (0..light_count)
            .map(|_| LightTrack {
                next_fire: now + f64::from(config.stagger_ms.sample(rng.next_f32())),
                ..LightTrack::default()
            })
            .collect();

        Self {
            config,
            tracks,
            stop: StopToken::new(),
        }
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub fn light_count(&self) -> usize {
        self.tracks.len()
    }

    /// Time of the next scheduled cycle for a light; None once stopped
    pub fn next_fire(&self, light: usize) -> Option<f64> {
        if self.is_stopped() {
            return None;
        }
        self.tracks.get(light).map(|t| t.next_fire)
    }

    pub fn cycles(&self, light: usize) -> u64 {
        self.tracks.get(light).map_or(0, |t| t.cycles)
    }

    pub fn last_cycle(&self, light: usize) -> Option<&LightCycle> {
        self.tracks.get(light).and_then(|t| t.last.as_ref())
    }

    pub fn is_animating(&self, light: usize) -> bool {
        self.tracks
            .get(light)
            .is_some_and(|t| t.cone.is_some() || t.position.is_some())
    }

    /// Run every cycle that is due at `now`, in light order
    pub fn fire_due(
        &mut self,
        now: f64,
        lights: &mut [SpotLight],
        rng: &mut dyn RandomSource,
    ) -> Vec<LightCycle> {
        if self.is_stopped() {
            return Vec::new();
        }

        let interval = f64::from(self.config.interval_ms);
        let mut fired = Vec::new();

        for index in 0..self.tracks.len().min(lights.len()) {
            if now < self.tracks[index].next_fire {
                continue;
            }

            fired.push(self.invoke(index, now, &mut lights[index], rng));

            // Fixed delay after the cycle actually ran
            self.tracks[index].next_fire = now + interval;
        }

        fired
    }

    /// One animation cycle for one light: recolor now, start tweens towards
    /// freshly sampled targets
    pub fn invoke(
        &mut self,
        index: usize,
        now: f64,
        light: &mut SpotLight,
        rng: &mut dyn RandomSource,
    ) -> LightCycle {
        let config = &self.config;

        let hue = rng.next_f32();
        light.color = Color::from_hsl(hue, config.saturation, config.lightness);

        let angle = config.angle.sample(rng.next_f32());
        let penumbra = config.penumbra.sample(rng.next_f32());
        let position = Vec2::new(
            config.position.sample(rng.next_f32()),
            config.position.sample(rng.next_f32()),
        );
        let cone_duration = f64::from(config.duration_ms.sample(rng.next_f32()));
        let position_duration = f64::from(config.duration_ms.sample(rng.next_f32()));

        let cycle = LightCycle {
            light: index,
            fired_at: now,
            hue,
            angle,
            penumbra,
            position,
            cone_duration,
            position_duration,
        };

        let current_cone = ConeParams {
            angle: light.angle,
            penumbra: light.penumbra,
        };
        let current_position = Vec2::new(light.position.x, light.position.z);

        if let Some(track) = self.tracks.get_mut(index) {
            track.cone = Some(Tween::new(
                current_cone,
                ConeParams { angle, penumbra },
                now,
                cone_duration,
                config.easing,
            ));
            track.position = Some(Tween::new(
                current_position,
                position,
                now,
                position_duration,
                config.easing,
            ));
            track.cycles += 1;
            track.last = Some(cycle);
        }

        log::debug!(
            "light {index}: hue {hue:.3}, angle {angle:.3}, penumbra {penumbra:.3}, \
             position ({:.2}, {:.2})",
            position.x,
            position.y
        );

        cycle
    }

    /// Write the current tween values into the lights; finished tweens are
    /// applied once more at their target and dropped
    pub fn apply_tweens(&mut self, now: f64, lights: &mut [SpotLight]) {
        for (track, light) in self.tracks.iter_mut().zip(lights.iter_mut()) {
            if let Some(tween) = track.cone {
                let cone = tween.value_at(now);
                light.angle = cone.angle;
                light.penumbra = cone.penumbra;
                if tween.is_finished(now) {
                    track.cone = None;
                }
            }

            if let Some(tween) = track.position {
                let xz = tween.value_at(now);
                light.position.x = xz.x;
                light.position.z = xz.y;
                if tween.is_finished(now) {
                    track.position = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequenceRandom;
    use glam::Vec3;

    fn light() -> SpotLight {
        let mut light = SpotLight::new(Color::WHITE);
        light.position = Vec3::new(3.0, 5.0, 3.0);
        light.angle = std::f32::consts::PI / 8.0;
        light.penumbra = 1.0;
        light
    }

    #[test]
    fn test_stagger_is_drawn_per_light() {
        let mut rng = SequenceRandom::new([0.0, 0.5, 0.999]);
        let animator = LightAnimator::start(3, 1000.0, AnimationConfig::default(), &mut rng);

        assert_eq!(animator.next_fire(0), Some(1000.0));
        assert_eq!(animator.next_fire(1), Some(3500.0));
        let last = animator.next_fire(2).unwrap();
        assert!(last > 5990.0 && last < 6000.0);
    }

    #[test]
    fn test_nothing_fires_before_stagger() {
        let mut rng = SequenceRandom::new([0.5]);
        let mut animator = LightAnimator::start(1, 0.0, AnimationConfig::default(), &mut rng);
        let mut lights = [light()];

        assert!(animator.fire_due(2499.0, &mut lights, &mut rng).is_empty());
        assert_eq!(animator.fire_due(2500.0, &mut lights, &mut rng).len(), 1);
        assert_eq!(animator.next_fire(0), Some(7500.0));
    }

    #[test]
    fn test_stall_fires_once_then_waits_full_interval() {
        let mut rng = SequenceRandom::new([0.0]);
        let mut animator = LightAnimator::start(1, 0.0, AnimationConfig::default(), &mut rng);
        let mut lights = [light()];

        animator.fire_due(0.0, &mut lights, &mut rng);
        let fired = animator.fire_due(23_000.0, &mut lights, &mut rng);
        assert_eq!(fired.len(), 1);
        assert_eq!(animator.next_fire(0), Some(28_000.0));
    }

    #[test]
    fn test_tweens_move_light_and_finish() {
        let mut rng = SequenceRandom::new([0.0]);
        let mut animator = LightAnimator::start(1, 0.0, AnimationConfig::default(), &mut rng);
        let mut lights = [light()];

        // Every draw is 0: angle 0.1, penumbra 0, position (-5, -5), 2000ms
        let mut cycle_rng = SequenceRandom::new([0.0]);
        animator.fire_due(0.0, &mut lights, &mut cycle_rng);
        assert!(animator.is_animating(0));

        animator.apply_tweens(1000.0, &mut lights);
        assert!(lights[0].angle < std::f32::consts::PI / 8.0);
        assert!(lights[0].angle > 0.1);

        animator.apply_tweens(2000.0, &mut lights);
        assert!(!animator.is_animating(0));
        assert!((lights[0].angle - 0.1).abs() < 1e-6);
        assert_eq!(lights[0].penumbra, 0.0);
        assert_eq!(lights[0].position, Vec3::new(-5.0, 5.0, -5.0));
    }

    #[test]
    fn test_stop_token_halts_new_cycles() {
        let mut rng = SequenceRandom::new([0.0]);
        let mut animator = LightAnimator::start(2, 0.0, AnimationConfig::default(), &mut rng);
        let mut lights = [light(), light()];

        animator.stop_token().cancel();
        assert!(animator.is_stopped());
        assert!(animator.fire_due(10_000.0, &mut lights, &mut rng).is_empty());
        assert_eq!(animator.next_fire(0), None);
        assert_eq!(animator.cycles(0), 0);
    }
}
