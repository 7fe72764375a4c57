//! Orbit camera controls: the camera circles a target point, with optional
//! auto-rotation and inertial damping.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::{Button, Controller};

const EPS: f32 = 1e-6;

/// Radius, polar angle from +Y and azimuth around +Y measured from +Z
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_vec(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_vec(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    None,
    Rotate,
    Pan,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// Full turns per minute at 60 updates per second, halved
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Pixels panned per frame while an arrow key is held
    pub key_pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    state: DragState,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            key_pan_speed: 7.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            state: DragState::None,
        }
    }

    fn auto_rotation_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    pub fn dolly_in(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        self.scale /= factor;
    }

    fn zoom_factor(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Pan by a screen-space offset in pixels
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let distance =
            (camera.position - self.target).length() * (camera.fov_radians() / 2.0).tan();
        let right = camera.right();
        let up = right.cross(camera.forward()).normalize_or_zero();

        self.pan_offset += right * (-2.0 * dx * distance / viewport_height);
        self.pan_offset += up * (2.0 * dy * distance / viewport_height);
    }

    /// Translate held buttons, pointer motion and wheel into pending motion
    pub fn handle_input(
        &mut self,
        controller: &dyn Controller,
        camera: &PerspectiveCamera,
        viewport_height: f32,
    ) {
        let (dx, dy) = controller.pointer_delta();

        self.state = if controller.is_down(Button::MouseLeft) {
            DragState::Rotate
        } else if controller.is_down(Button::MouseRight) {
            DragState::Pan
        } else {
            DragState::None
        };

        match self.state {
            DragState::Rotate if viewport_height > 0.0 => {
                self.rotate_left(TAU * dx / viewport_height * self.rotate_speed);
                self.rotate_up(TAU * dy / viewport_height * self.rotate_speed);
            }
            DragState::Pan => self.pan(dx, dy, camera, viewport_height),
            _ => {}
        }

        let scroll = controller.scroll_delta();
        if scroll > 0.0 {
            self.dolly_in(self.zoom_factor());
        } else if scroll < 0.0 {
            self.dolly_out(self.zoom_factor());
        }

        let step = self.key_pan_speed;
        for &button in controller.get_down_keys() {
            match button {
                Button::ArrowUp => self.pan(0.0, step, camera, viewport_height),
                Button::ArrowDown => self.pan(0.0, -step, camera, viewport_height),
                Button::ArrowLeft => self.pan(step, 0.0, camera, viewport_height),
                Button::ArrowRight => self.pan(-step, 0.0, camera, viewport_height),
                _ => {}
            }
        }
    }

    /// Apply pending motion to the camera; returns true if the camera moved
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_vec(offset);

        if self.auto_rotate && self.state == DragState::None {
            self.rotate_left(self.auto_rotation_angle());
        }

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.delta.theta * factor;
        spherical.phi += self.delta.phi * factor;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * factor;

        let previous = camera.position;
        camera.position = self.target + spherical.to_vec();
        camera.target = self.target;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta.theta *= keep;
            self.delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > EPS
    }
}
