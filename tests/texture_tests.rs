use glam::{Vec2, Vec3};
use liminal::core::Rgba;
use liminal::material::PhysicalMaterial;
use liminal::texture::{checkerboard_canvas, generate_checkerboard_texture, WrapMode, CHECKER_SIZE};

#[test]
fn test_repeat_factor_is_stored_exactly() {
    for repeat in [Vec2::new(100.0, 100.0), Vec2::new(1.0, 3.5), Vec2::new(0.25, 7.0)] {
        let texture = generate_checkerboard_texture(repeat);
        assert_eq!(texture.repeat, repeat);
        assert_eq!(texture.wrap_s, WrapMode::Repeat);
        assert_eq!(texture.wrap_t, WrapMode::Repeat);
    }
}

#[test]
fn test_bitmap_quadrants() {
    let texture = generate_checkerboard_texture(Vec2::new(100.0, 100.0));
    let image = texture.image();

    assert_eq!(image.dimensions(), (CHECKER_SIZE, CHECKER_SIZE));
    assert_eq!(image.pixel(0, 0), Some(Rgba::WHITE));
    assert_eq!(image.pixel(100, 100), Some(Rgba::WHITE));
    assert_eq!(image.pixel(70, 0), Some(Rgba::BLACK));
    assert_eq!(image.pixel(0, 70), Some(Rgba::BLACK));
}

#[test]
fn test_canvas_matches_texture_image() {
    let canvas = checkerboard_canvas();
    let texture = generate_checkerboard_texture(Vec2::ONE);
    assert_eq!(canvas.pixels(), texture.image().pixels());
}

#[test]
fn test_ground_tiles_repeat_across_plane() {
    // 100 repeats: one tile spans 1/100 of the ground in each direction
    let texture = generate_checkerboard_texture(Vec2::new(100.0, 100.0));
    assert_eq!(texture.sample(Vec2::new(0.001, 0.001)), Rgba::WHITE);
    assert_eq!(texture.sample(Vec2::new(0.006, 0.001)), Rgba::BLACK);
    assert_eq!(texture.sample(Vec2::new(0.011, 0.001)), Rgba::WHITE);
    assert_eq!(texture.sample(Vec2::new(0.506, 0.506)), Rgba::WHITE);
}

#[test]
fn test_ground_material_modulates_by_checker() {
    let material = PhysicalMaterial {
        map: Some(generate_checkerboard_texture(Vec2::ONE)),
        ..Default::default()
    };
    // uv v points up, so (0.1, 0.9) lands in the top-left quadrant
    assert_eq!(material.albedo(Vec2::new(0.1, 0.9)), Vec3::ONE);
    assert_eq!(material.albedo(Vec2::new(0.1, 0.1)), Vec3::ZERO);
}
