use glam::{Mat4, Vec3};

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any point extends
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |bounds, p| bounds.extend(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&self, point: Vec3) -> Aabb {
        Aabb {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(self.corners().iter().map(|c| matrix.transform_point3(*c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let bounds = Aabb::from_points([
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
        ]);
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.center(), Vec3::ZERO);
    }

    #[test]
    fn test_aabb_empty() {
        assert!(Aabb::empty().is_empty());
        assert!(!Aabb::empty().extend(Vec3::ONE).is_empty());
    }

    #[test]
    fn test_aabb_union_contained() {
        let outer = Aabb::new(Vec3::ZERO, Vec3::splat(5.0));
        let inner = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        assert_eq!(outer.union(&inner), outer);
    }

    #[test]
    fn test_aabb_transformed_scale_translate() {
        let unit = Aabb::new(Vec3::splat(-1.0), Vec3::ONE);
        let matrix = Mat4::from_translation(Vec3::Y) * Mat4::from_scale(Vec3::splat(0.5));
        let moved = unit.transformed(&matrix);
        assert!((moved.min - Vec3::new(-0.5, 0.5, -0.5)).length() < 1e-6);
        assert!((moved.max - Vec3::new(0.5, 1.5, 0.5)).length() < 1e-6);
    }
}
