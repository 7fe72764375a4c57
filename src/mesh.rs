use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::Geometry;
use crate::material::PhysicalMaterial;
use crate::math::Aabb;

/// Position, XYZ Euler rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in X, Y, Z order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: PhysicalMaterial,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: PhysicalMaterial) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
            material,
            transform: Transform::default(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn world_bounds(&self, parent: &Mat4) -> Aabb {
        self.geometry
            .bounds()
            .transformed(&(*parent * self.transform.matrix()))
    }
}

/// A group of meshes sharing one root transform, as loaded from a model file
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.triangle_count()).sum()
    }

    pub fn bounds(&self) -> Aabb {
        let root = self.transform.matrix();
        self.meshes
            .iter()
            .fold(Aabb::empty(), |acc, mesh| acc.union(&mesh.world_bounds(&root)))
    }

    /// Set shadow flags on every mesh of the model
    pub fn set_shadows(&mut self, cast: bool, receive: bool) {
        for mesh in &mut self.meshes {
            mesh.cast_shadow = cast;
            mesh.receive_shadow = receive;
        }
    }
}
