use std::path::PathBuf;

use liminal::headless::render_to_png;
use liminal::AppConfig;

fn small_config(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.window.width = 64;
    config.window.height = 48;
    config.render.scale = 1.0;
    config.render.shadow_map_size = 64;
    config.scene.model = None;
    config.scene.seed = Some(seed);
    config
}

fn output_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("liminal-{}-{}.png", name, std::process::id()))
}

#[test]
fn test_headless_writes_png() {
    let path = output_path("size");
    render_to_png(&small_config(1), 3, &path).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (64, 48));
    assert!(image.pixels().all(|p| p[3] == 255));
    assert!(image.pixels().any(|p| p[0] > 0 || p[1] > 0 || p[2] > 0));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_same_seed_renders_identical_frames() {
    let first = output_path("seed-a");
    let second = output_path("seed-b");
    render_to_png(&small_config(42), 5, &first).unwrap();
    render_to_png(&small_config(42), 5, &second).unwrap();

    let a = image::open(&first).unwrap().to_rgba8();
    let b = image::open(&second).unwrap().to_rgba8();
    assert_eq!(a.as_raw(), b.as_raw());

    std::fs::remove_file(&first).ok();
    std::fs::remove_file(&second).ok();
}

#[test]
fn test_unwritable_output_is_an_error() {
    let path = PathBuf::from("/nonexistent-dir/liminal.png");
    let err = render_to_png(&small_config(1), 1, &path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to write"));
}
