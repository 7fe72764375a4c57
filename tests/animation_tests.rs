use glam::{Vec2, Vec3};
use liminal::animation::{LightAnimator, RandomSource, SeededRandom, SequenceRandom};
use liminal::config::AnimationConfig;
use liminal::light::SpotLight;
use liminal::math::Color;

fn spotlight() -> SpotLight {
    let mut light = SpotLight::new(Color::WHITE);
    light.position = Vec3::new(3.0, 5.0, 3.0);
    light.angle = std::f32::consts::PI / 8.0;
    light.penumbra = 1.0;
    light
}

/// Animator whose first cycle is due at t = 0
fn animator(lights: usize) -> LightAnimator {
    let mut stagger = SequenceRandom::new([0.0]);
    LightAnimator::start(lights, 0.0, AnimationConfig::default(), &mut stagger)
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_cycle_targets_stay_in_range() {
    for seed in 0..200 {
        let mut rng = SeededRandom::from_seed(seed);
        let mut animator = animator(1);
        let mut light = spotlight();
        let cycle = animator.invoke(0, 0.0, &mut light, &mut rng);

        assert!((0.0..1.0).contains(&cycle.hue), "seed {seed}: hue {}", cycle.hue);
        assert!((0.1..0.8).contains(&cycle.angle), "seed {seed}: angle {}", cycle.angle);
        assert!((0.0..1.0).contains(&cycle.penumbra));
        assert!((-5.0..5.0).contains(&cycle.position.x));
        assert!((-5.0..5.0).contains(&cycle.position.y));
        assert!((2000.0..5000.0).contains(&cycle.cone_duration));
        assert!((2000.0..5000.0).contains(&cycle.position_duration));
    }
}

#[test]
fn test_initial_stagger_within_interval() {
    for seed in 0..50 {
        let mut rng = SeededRandom::from_seed(seed);
        let animator = LightAnimator::start(3, 100.0, AnimationConfig::default(), &mut rng);
        for light in 0..3 {
            let due = animator.next_fire(light).unwrap();
            assert!((100.0..5100.0).contains(&due));
        }
    }
}

// ============================================================================
// Rescheduling on a manual clock
// ============================================================================

#[test]
fn test_reschedules_after_interval() {
    let mut animator = animator(1);
    let mut lights = [spotlight()];
    let mut rng = SequenceRandom::new([
        0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, // first cycle
        0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, // second cycle
    ]);

    assert_eq!(animator.fire_due(0.0, &mut lights, &mut rng).len(), 1);
    let first = *animator.last_cycle(0).unwrap();

    for now in [1000.0, 2500.0, 4999.0] {
        animator.apply_tweens(now, &mut lights);
        assert!(animator.fire_due(now, &mut lights, &mut rng).is_empty());
    }

    let fired = animator.fire_due(5000.0, &mut lights, &mut rng);
    assert_eq!(fired.len(), 1);
    assert_eq!(animator.cycles(0), 2);

    let second = fired[0];
    assert_eq!(second.fired_at, 5000.0);
    assert_ne!(second.hue, first.hue);
    assert_ne!(second.angle, first.angle);
    assert_ne!(second.position, first.position);
    assert_eq!(animator.next_fire(0), Some(10_000.0));
}

#[test]
fn test_late_cycle_waits_full_interval() {
    // Cycles run on frame boundaries, so the first one lands after its deadline
    let mut animator = animator(1);
    let mut lights = [spotlight()];
    let mut rng = SequenceRandom::new([0.5]);

    assert_eq!(animator.fire_due(16.0, &mut lights, &mut rng).len(), 1);
    assert_eq!(animator.next_fire(0), Some(5016.0));

    assert!(animator.fire_due(5000.0, &mut lights, &mut rng).is_empty());
    let fired = animator.fire_due(5016.0, &mut lights, &mut rng);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].fired_at, 5016.0);
    assert_eq!(animator.next_fire(0), Some(10_016.0));
}

#[test]
fn test_interval_is_independent_of_tween_duration() {
    // Durations at their maximum still reschedule 5000ms later
    let mut animator = animator(1);
    let mut lights = [spotlight()];
    let mut rng = SequenceRandom::new([0.5, 0.5, 0.5, 0.5, 0.5, 0.999, 0.999]);

    animator.fire_due(0.0, &mut lights, &mut rng);
    assert_eq!(animator.next_fire(0), Some(5000.0));
    animator.apply_tweens(4990.0, &mut lights);
    assert!(animator.is_animating(0));
}

#[test]
fn test_new_cycle_starts_from_current_values() {
    let mut animator = animator(1);
    let mut lights = [spotlight()];
    let mut rng = SequenceRandom::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.999, 0.999]);

    animator.fire_due(0.0, &mut lights, &mut rng);
    animator.apply_tweens(1000.0, &mut lights);
    let mid_angle = lights[0].angle;
    assert!(mid_angle > 0.1 && mid_angle < std::f32::consts::PI / 8.0);

    animator.invoke(0, 1000.0, &mut lights[0], &mut rng);
    animator.apply_tweens(1000.0, &mut lights);
    assert!((lights[0].angle - mid_angle).abs() < 1e-6);
}

// ============================================================================
// End-to-end cycle
// ============================================================================

#[test]
fn test_cycle_from_fixed_sequence() {
    let mut animator = animator(1);
    let mut light = spotlight();
    let mut rng = SequenceRandom::new([0.2, 0.5, 0.9, 0.1, 0.3, 0.0, 0.0]);

    let cycle = animator.invoke(0, 0.0, &mut light, &mut rng);

    assert_eq!(cycle.hue, 0.2);
    assert_eq!(light.color, Color::from_hsl(0.2, 1.0, 0.5));
    assert!((cycle.angle - 0.45).abs() < 1e-6);
    assert!((cycle.penumbra - 0.9).abs() < 1e-6);
    assert!((cycle.position - Vec2::new(-4.0, -2.0)).length() < 1e-5);
    assert_eq!(cycle.cone_duration, 2000.0);

    // Color changes immediately, the cone only through the tween
    assert_eq!(light.angle, std::f32::consts::PI / 8.0);

    let mut lights = [light];
    animator.apply_tweens(2000.0, &mut lights);
    assert!((lights[0].angle - 0.45).abs() < 1e-6);
    assert!((lights[0].penumbra - 0.9).abs() < 1e-6);
    assert!((lights[0].position.x + 4.0).abs() < 1e-5);
    assert!((lights[0].position.z + 2.0).abs() < 1e-5);
    assert_eq!(lights[0].position.y, 5.0);
}

#[test]
fn test_low_angle_fraction() {
    let mut animator = animator(1);
    let mut light = spotlight();
    let mut rng = SequenceRandom::new([0.2, 0.2, 0.9, 0.1]);

    let cycle = animator.invoke(0, 0.0, &mut light, &mut rng);
    assert!((cycle.angle - 0.24).abs() < 1e-6);
}

#[test]
fn test_draw_order_is_fixed() {
    let mut animator = animator(1);
    let mut light = spotlight();
    let mut rng = SequenceRandom::new([0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);

    let cycle = animator.invoke(0, 0.0, &mut light, &mut rng);
    assert_eq!(rng.drawn(), 7);
    assert!((cycle.cone_duration - 3500.0).abs() < 1e-3);
    assert!((cycle.position_duration - 3800.0).abs() < 1e-3);
    assert_eq!(rng.next_f32(), 0.7);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_stop_token_lets_in_flight_tweens_finish() {
    let mut animator = animator(1);
    let mut lights = [spotlight()];
    let mut rng = SequenceRandom::new([0.5, 0.5, 0.5, 0.5, 0.5, 0.0, 0.0]);

    animator.fire_due(0.0, &mut lights, &mut rng);
    animator.stop_token().cancel();

    animator.apply_tweens(2000.0, &mut lights);
    assert!((lights[0].angle - 0.45).abs() < 1e-6);
    assert!(animator.fire_due(5000.0, &mut lights, &mut rng).is_empty());
    assert_eq!(animator.cycles(0), 1);
}
