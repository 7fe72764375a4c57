//! The scene context: everything the frame loop mutates, in one place.

use std::f32::consts::{FRAC_PI_2, PI};

use anyhow::Result;
use glam::{Mat4, Vec2, Vec3};

use crate::animation::{LightAnimator, RandomSource, SeededRandom};
use crate::camera::PerspectiveCamera;
use crate::config::AppConfig;
use crate::controls::OrbitControls;
use crate::geometry::Geometry;
use crate::light::{AmbientLight, Fog, LightTarget, SpotLight};
use crate::loaders::{load_cubemap, load_model, Pending};
use crate::material::PhysicalMaterial;
use crate::math::Color;
use crate::mesh::{Mesh, Model, Transform};
use crate::texture::{generate_checkerboard_texture, Cubemap};

pub const LIGHT_POSITIONS: [Vec3; 3] = [
    Vec3::new(3.0, 5.0, 3.0),
    Vec3::new(-3.0, 5.0, -3.0),
    Vec3::new(-3.0, 5.0, 3.0),
];

/// Per-frame cube spin in radians around x, y and z
pub const CUBE_SPIN: Vec3 = Vec3::new(0.01, 0.015, 0.02);

const MODEL_SCALE: f32 = 0.03;
const MODEL_HEIGHT: f32 = 1.0;

/// Progress of an asynchronously loaded asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    /// Not configured
    None,
    Loading,
    Ready,
    Failed(String),
}

/// Something the renderer draws this frame
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub geometry: &'a Geometry,
    pub material: &'a PhysicalMaterial,
    pub model: Mat4,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

pub struct Scene {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub ambient: AmbientLight,
    pub fog: Fog,
    pub lights: Vec<SpotLight>,
    pub ground: Mesh,
    pub cube: Mesh,
    model: Option<Model>,
    background: Option<Cubemap>,
    model_status: AssetStatus,
    background_status: AssetStatus,
    pending_model: Option<Pending<Model>>,
    pending_background: Option<Pending<Cubemap>>,
    animator: LightAnimator,
    rng: Box<dyn RandomSource + Send>,
    frames: u64,
}

fn build_light(position: Vec3, rng: &mut dyn RandomSource) -> SpotLight {
    let mut light = SpotLight::new(Color::from_hsl(rng.next_f32(), 1.0, 0.5));
    light.position = position;
    light.angle = PI / 8.0;
    light.cast_shadow = true;
    light.decay = 2.0;
    light.intensity = 100.0;
    light.penumbra = 1.0;
    light
}

impl Scene {
    /// Build the scene and start loading the configured assets
    pub fn build(config: &AppConfig, aspect: f32) -> Result<Self> {
        let rng: Box<dyn RandomSource + Send> = match config.scene.seed {
            Some(seed) => Box::new(SeededRandom::from_seed(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        let mut scene = Self::with_random(config, aspect, rng)?;

        if let Some(path) = config.scene.model.clone() {
            let label = path.display().to_string();
            scene.load_model_with(Pending::spawn(label, move || load_model(&path)));
        }
        if let Some(dir) = config.scene.skybox.clone() {
            let label = dir.display().to_string();
            scene.load_background_with(Pending::spawn(label, move || load_cubemap(&dir)));
        }

        Ok(scene)
    }

    /// Build the scene with an explicit random source and no asset loads
    pub fn with_random(
        config: &AppConfig,
        aspect: f32,
        mut rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self> {
        config.validate()?;

        let mut camera = PerspectiveCamera::new(75.0, aspect, 0.1, 1000.0);
        camera.position = Vec3::new(0.0, 5.0, 5.0);

        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.auto_rotate = true;
        controls.enable_damping = true;
        controls.damping_factor = 0.05;
        controls.update(&mut camera);

        let mut lights: Vec<SpotLight> = LIGHT_POSITIONS
            .iter()
            .map(|&position| build_light(position, rng.as_mut()))
            .collect();
        for light in &mut lights {
            light.shadow.map_size = config.render.shadow_map_size;
        }

        let [rx, ry] = config.scene.ground_repeat;
        let ground_material = PhysicalMaterial {
            map: Some(generate_checkerboard_texture(Vec2::new(rx, ry))),
            metalness: 0.5,
            clearcoat: 1.0,
            ..Default::default()
        };
        let mut ground = Mesh::new(
            "ground",
            Geometry::box_geometry(100.0, 100.0, 0.1),
            ground_material,
        );
        ground.receive_shadow = true;
        ground.transform.rotation.x = -FRAC_PI_2;

        let cube_material = PhysicalMaterial {
            color: Color::from_hex(0xffffff),
            metalness: 0.25,
            roughness: 0.25,
            clearcoat: 1.0,
            transparent: true,
            transmission: 1.0,
            ..Default::default()
        };
        let mut cube = Mesh::new("cube", Geometry::box_geometry(1.0, 1.0, 1.0), cube_material);
        cube.transform.position = Vec3::new(2.0, 2.0, -2.0);
        cube.cast_shadow = true;
        cube.receive_shadow = true;

        let animator =
            LightAnimator::start(lights.len(), 0.0, config.animation.clone(), rng.as_mut());

        Ok(Self {
            camera,
            controls,
            ambient: AmbientLight::new(Color::from_hex(0x202020)),
            fog: Fog::new(Color::from_hex(0x000000), 1.0, 100.0),
            lights,
            ground,
            cube,
            model: None,
            background: None,
            model_status: AssetStatus::None,
            background_status: AssetStatus::None,
            pending_model: None,
            pending_background: None,
            animator,
            rng,
            frames: 0,
        })
    }

    pub fn load_model_with(&mut self, pending: Pending<Model>) {
        self.pending_model = Some(pending);
        self.model_status = AssetStatus::Loading;
    }

    pub fn load_background_with(&mut self, pending: Pending<Cubemap>) {
        self.pending_background = Some(pending);
        self.background_status = AssetStatus::Loading;
    }

    /// Advance one frame at timestamp `ts` (milliseconds)
    pub fn update(&mut self, ts: f64) {
        self.poll_assets();

        self.animator.fire_due(ts, &mut self.lights, self.rng.as_mut());

        self.cube.transform.rotation += CUBE_SPIN;

        self.controls.update(&mut self.camera);

        self.animator.apply_tweens(ts, &mut self.lights);

        self.frames += 1;
    }

    fn poll_assets(&mut self) {
        let model = self.pending_model.as_mut().and_then(Pending::try_take);
        if let Some(result) = model {
            self.pending_model = None;
            self.finish_model(result);
        }
        let background = self.pending_background.as_mut().and_then(Pending::try_take);
        if let Some(result) = background {
            self.pending_background = None;
            self.finish_background(result);
        }
    }

    /// Block until every pending asset has finished loading
    pub fn wait_for_assets(&mut self) {
        if let Some(result) = self.pending_model.take().and_then(|mut p| p.wait()) {
            self.finish_model(result);
        }
        if let Some(result) = self.pending_background.take().and_then(|mut p| p.wait()) {
            self.finish_background(result);
        }
    }

    fn finish_model(&mut self, result: Result<Model>) {
        match result {
            Ok(mut model) => {
                model.transform.scale = Vec3::splat(MODEL_SCALE);
                model.transform.position.y = MODEL_HEIGHT;
                model.set_shadows(true, true);
                for light in &mut self.lights {
                    light.target = LightTarget::Model;
                }
                log::info!("Model {} added to the scene", model.name);
                self.model = Some(model);
                self.model_status = AssetStatus::Ready;
            }
            Err(e) => {
                log::error!("Failed to load model: {:#}", e);
                self.model_status = AssetStatus::Failed(format!("{:#}", e));
            }
        }
    }

    fn finish_background(&mut self, result: Result<Cubemap>) {
        match result {
            Ok(cubemap) => {
                self.background = Some(cubemap);
                self.background_status = AssetStatus::Ready;
            }
            Err(e) => {
                log::error!("Failed to load background: {:#}", e);
                self.background_status = AssetStatus::Failed(format!("{:#}", e));
            }
        }
    }

    /// Recompute the camera aspect for a new output size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// World-space point a light is aimed at
    pub fn light_target(&self, light: &SpotLight) -> Vec3 {
        match light.target {
            LightTarget::Point(point) => point,
            LightTarget::Model => self
                .model
                .as_ref()
                .map_or(Vec3::ZERO, |model| model.transform.position),
        }
    }

    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        for mesh in [&self.ground, &self.cube] {
            items.push(DrawItem {
                geometry: &mesh.geometry,
                material: &mesh.material,
                model: mesh.transform.matrix(),
                cast_shadow: mesh.cast_shadow,
                receive_shadow: mesh.receive_shadow,
            });
        }
        if let Some(model) = &self.model {
            let root = model.transform.matrix();
            items.extend(model.meshes.iter().map(|mesh| DrawItem {
                geometry: &mesh.geometry,
                material: &mesh.material,
                model: root * mesh.transform.matrix(),
                cast_shadow: mesh.cast_shadow,
                receive_shadow: mesh.receive_shadow,
            }));
        }
        items
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn background(&self) -> Option<&Cubemap> {
        self.background.as_ref()
    }

    pub fn model_status(&self) -> &AssetStatus {
        &self.model_status
    }

    pub fn background_status(&self) -> &AssetStatus {
        &self.background_status
    }

    pub fn animator(&self) -> &LightAnimator {
        &self.animator
    }

    /// Frames advanced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequenceRandom;

    fn scene() -> Scene {
        let rng = Box::new(SequenceRandom::new([0.5]));
        Scene::with_random(&AppConfig::default(), 1.0, rng).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let scene = scene();
        assert_eq!(scene.lights.len(), 3);
        for (light, &position) in scene.lights.iter().zip(LIGHT_POSITIONS.iter()) {
            assert_eq!(light.position, position);
            assert_eq!(light.angle, PI / 8.0);
            assert_eq!(light.penumbra, 1.0);
            assert_eq!(light.intensity, 100.0);
            assert!(light.cast_shadow);
            assert_eq!(light.target, LightTarget::Point(Vec3::ZERO));
        }
        assert_eq!(scene.cube.transform.position, Vec3::new(2.0, 2.0, -2.0));
        assert_eq!(scene.model_status(), &AssetStatus::None);
        assert_eq!(scene.draw_items().len(), 2);
    }

    #[test]
    fn test_cube_spins_every_frame() {
        let mut scene = scene();
        scene.update(16.0);
        scene.update(32.0);
        assert!((scene.cube.transform.rotation - CUBE_SPIN * 2.0).length() < 1e-6);
        assert_eq!(scene.frames(), 2);
    }

    #[test]
    fn test_initial_light_color_uses_first_draws() {
        let scene = scene();
        let expected = Color::from_hsl(0.5, 1.0, 0.5);
        assert_eq!(scene.lights[0].color, expected);
    }
}
