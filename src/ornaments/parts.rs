//! Composite figures built from unit primitives

use crate::math::{Quat, Vec3};
use super::{Instance, Shape};

/// One primitive of a composite figure, relative to the figure's origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub shape: Shape,
    pub offset: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub color: Vec3,
}

impl Part {
    fn new(shape: Shape, scale: Vec3, color: u32) -> Self {
        Self {
            shape,
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale,
            color: Vec3::from_hex(color),
        }
    }

    pub fn sphere(radius: f32, color: u32) -> Self {
        Self::new(Shape::Sphere, Vec3::splat(radius), color)
    }

    /// Stretched sphere, also standing in for capsules
    pub fn ellipsoid(radii: Vec3, color: u32) -> Self {
        Self::new(Shape::Sphere, radii, color)
    }

    pub fn cuboid(width: f32, height: f32, depth: f32, color: u32) -> Self {
        Self::new(Shape::Box, Vec3::new(width, height, depth), color)
    }

    pub fn cylinder(radius: f32, height: f32, color: u32) -> Self {
        Self::new(Shape::Cylinder, Vec3::new(radius, height, radius), color)
    }

    pub fn cone(radius: f32, height: f32, color: u32) -> Self {
        Self::new(Shape::Cone, Vec3::new(radius, height, radius), color)
    }

    pub fn torus(radius: f32, color: u32) -> Self {
        Self::new(Shape::Torus, Vec3::splat(radius), color)
    }

    pub fn ring(radius: f32, color: u32) -> Self {
        Self::new(Shape::Ring, Vec3::splat(radius), color)
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.offset = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler_xyz(x, y, z);
        self
    }

    /// Multiply the existing scale per axis
    pub fn stretched(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = self.scale.mul_elem(&Vec3::new(x, y, z));
        self
    }

    /// Re-express this part as if it sat inside a sub-group with the given transform
    pub fn within(mut self, offset: Vec3, rotation: Quat, scale: f32) -> Self {
        self.offset = offset + rotation.rotate(self.offset.scale(scale));
        self.rotation = rotation * self.rotation;
        self.scale = self.scale.scale(scale);
        self
    }

    /// Place this part under a figure transform
    pub fn instance(&self, position: Vec3, rotation: Quat, scale: f32) -> Instance {
        Instance {
            shape: self.shape,
            position: position + rotation.rotate(self.offset.scale(scale)),
            rotation: rotation * self.rotation,
            scale: self.scale.scale(scale),
            color: self.color,
        }
    }
}

/// Emit every part of a figure placed at `position`
pub fn emit_figure(parts: &[Part], position: Vec3, rotation: Quat, scale: f32, out: &mut Vec<Instance>) {
    out.extend(parts.iter().map(|p| p.instance(position, rotation, scale)));
}

/// Apply a sub-group transform to a batch of parts
pub fn group(parts: Vec<Part>, offset: Vec3, rotation: Quat, scale: f32) -> Vec<Part> {
    parts
        .into_iter()
        .map(|p| p.within(offset, rotation, scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_part_instance_follows_figure() {
        let ear = Part::sphere(0.2, 0x111111).at(0.5, 0.0, 0.0);
        let inst = ear.instance(Vec3::new(0.0, 1.0, 0.0), Quat::rotation_y(FRAC_PI_2), 2.0);
        // +X offset turns to -Z under a quarter turn about Y, doubled by scale
        assert!(inst.position.distance(&Vec3::new(0.0, 1.0, -1.0)) < 1e-5);
        assert!((inst.scale.x - 0.4).abs() < 1e-6);
        assert_eq!(inst.shape, Shape::Sphere);
    }

    #[test]
    fn test_group_nesting() {
        let parts = group(
            vec![Part::sphere(0.1, 0x000000).at(1.0, 0.0, 0.0)],
            Vec3::new(0.0, 2.0, 0.0),
            Quat::IDENTITY,
            0.5,
        );
        assert_eq!(parts[0].offset, Vec3::new(0.5, 2.0, 0.0));
        assert_eq!(parts[0].scale, Vec3::splat(0.05));
    }

    #[test]
    fn test_hex_color() {
        let part = Part::cuboid(1.0, 1.0, 1.0, 0xFF0000);
        assert_eq!(part.color, Vec3::new(1.0, 0.0, 0.0));
    }
}
