use anyhow::anyhow;
use glam::Vec3;
use liminal::animation::SequenceRandom;
use liminal::geometry::Geometry;
use liminal::light::LightTarget;
use liminal::loaders::Pending;
use liminal::material::PhysicalMaterial;
use liminal::mesh::{Mesh, Model, Transform};
use liminal::scene::{AssetStatus, CUBE_SPIN};
use liminal::{AppConfig, Scene};

fn scene_with(values: &[f32]) -> Scene {
    let rng = Box::new(SequenceRandom::new(values.to_vec()));
    Scene::with_random(&AppConfig::default(), 16.0 / 9.0, rng).unwrap()
}

fn model() -> Model {
    Model {
        name: "statue".to_string(),
        transform: Transform::default(),
        meshes: vec![Mesh::new(
            "body",
            Geometry::box_geometry(10.0, 40.0, 10.0),
            PhysicalMaterial::default(),
        )],
    }
}

// ============================================================================
// Model loading
// ============================================================================

#[test]
fn test_model_completion_retargets_lights() {
    let mut scene = scene_with(&[0.5]);
    scene.load_model_with(Pending::ready("statue", Ok(model())));
    assert_eq!(scene.model_status(), &AssetStatus::Loading);
    assert_eq!(scene.draw_items().len(), 2);

    scene.update(0.0);

    assert_eq!(scene.model_status(), &AssetStatus::Ready);
    for light in &scene.lights {
        assert_eq!(light.target, LightTarget::Model);
        assert_eq!(scene.light_target(light), Vec3::new(0.0, 1.0, 0.0));
    }

    let model = scene.model().unwrap();
    assert_eq!(model.transform.scale, Vec3::splat(0.03));
    assert!(model.meshes.iter().all(|m| m.cast_shadow && m.receive_shadow));
    assert_eq!(scene.draw_items().len(), 3);
}

#[test]
fn test_model_failure_leaves_scene_running() {
    let mut scene = scene_with(&[0.5]);
    scene.load_model_with(Pending::ready("statue", Err(anyhow!("file not found"))));

    scene.update(0.0);
    assert!(matches!(
        scene.model_status(),
        AssetStatus::Failed(msg) if msg.contains("file not found")
    ));
    assert!(scene.model().is_none());
    for light in &scene.lights {
        assert_eq!(light.target, LightTarget::Point(Vec3::ZERO));
    }

    let rotation = scene.cube.transform.rotation;
    scene.update(16.0);
    assert_eq!(scene.frames(), 2);
    assert!((scene.cube.transform.rotation - (rotation + CUBE_SPIN)).length() < 1e-6);
}

#[test]
fn test_missing_model_file_fails_to_load() {
    let mut config = AppConfig::default();
    config.scene.model = Some("does/not/exist.glb".into());
    config.scene.seed = Some(11);

    let mut scene = Scene::build(&config, 1.0).unwrap();
    assert_eq!(scene.model_status(), &AssetStatus::Loading);
    scene.wait_for_assets();

    match scene.model_status() {
        AssetStatus::Failed(msg) => assert!(msg.contains("exist.glb"), "{msg}"),
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(scene.background_status(), &AssetStatus::None);
}

#[test]
fn test_missing_skybox_fails_to_load() {
    let mut config = AppConfig::default();
    config.scene.model = None;
    config.scene.skybox = Some("does/not/exist".into());
    config.scene.seed = Some(11);

    let mut scene = Scene::build(&config, 1.0).unwrap();
    scene.wait_for_assets();
    assert!(matches!(scene.background_status(), AssetStatus::Failed(_)));
    assert!(scene.background().is_none());
}

// ============================================================================
// Frame update
// ============================================================================

#[test]
fn test_first_cycles_fire_after_stagger() {
    // Three hues, then staggers of 0, 2500 and 2500ms
    let mut scene = scene_with(&[0.0, 0.0, 0.0, 0.0, 0.5, 0.5]);

    scene.update(0.0);
    assert_eq!(scene.animator().cycles(0), 1);
    assert_eq!(scene.animator().cycles(1), 0);

    scene.update(2500.0);
    assert_eq!(scene.animator().cycles(1), 1);
    assert_eq!(scene.animator().cycles(2), 1);
    assert_eq!(scene.animator().next_fire(0), Some(5000.0));
}

#[test]
fn test_stop_token_freezes_schedule() {
    let mut scene = scene_with(&[0.0]);
    scene.animator().stop_token().cancel();

    for frame in 0..10 {
        scene.update(frame as f64 * 1000.0);
    }
    for light in 0..3 {
        assert_eq!(scene.animator().cycles(light), 0);
    }
    assert_eq!(scene.frames(), 10);
}

#[test]
fn test_resize_updates_camera_aspect() {
    let mut scene = scene_with(&[0.5]);
    scene.resize(800, 400);
    assert_eq!(scene.camera.aspect, 2.0);
    scene.resize(0, 400);
    assert_eq!(scene.camera.aspect, 2.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = AppConfig::default();
    config.scene.ground_repeat = [-1.0, 100.0];
    let rng = Box::new(SequenceRandom::new([0.5]));
    assert!(Scene::with_random(&config, 1.0, rng).is_err());
}
