use std::f32::consts::FRAC_PI_4;
use crate::math::{lerp, Quat, Vec3};
use super::parts::{emit_figure, group, Part};
use super::{Frame, Instance, Population};

const WHITE: u32 = 0xFFFFFF;
const BLACK: u32 = 0x000000;
const GROUP_SCALE: f32 = 1.3;
const BASE_HEIGHT: f32 = 7.0;

/// Bunny mascot head on top of the tree.
///
/// Grows with raw (uneased) progress so it vanishes entirely in chaos.
pub struct Topper {
    parts: Vec<Part>,
    position: Vec3,
    rotation: Quat,
    scale: f32,
}

impl Topper {
    pub fn new() -> Self {
        Self {
            parts: mascot_parts(),
            position: Vec3::new(0.0, BASE_HEIGHT, 0.0),
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for Topper {
    fn default() -> Self {
        Self::new()
    }
}

fn mascot_parts() -> Vec<Part> {
    let mut parts = vec![Part::sphere(0.9, WHITE)];

    // Long ears
    parts.extend(group(
        vec![
            Part::sphere(0.26, WHITE).stretched(1.0, 3.2, 1.0).at(-0.45, 0.6, 0.0).rotated(0.0, 0.0, -0.05),
            Part::sphere(0.26, WHITE).stretched(1.0, 3.2, 1.0).at(0.45, 0.6, 0.0).rotated(0.0, 0.0, 0.05),
        ],
        Vec3::new(0.0, 0.6, 0.0),
        Quat::IDENTITY,
        1.0,
    ));

    // Crossed mouth strokes
    let mouth = group(
        vec![
            Part::ellipsoid(Vec3::new(0.05, 0.225, 0.05), BLACK).rotated(0.0, 0.0, FRAC_PI_4),
            Part::ellipsoid(Vec3::new(0.05, 0.225, 0.05), BLACK).rotated(0.0, 0.0, -FRAC_PI_4),
        ],
        Vec3::new(0.0, -0.15, 0.05),
        Quat::IDENTITY,
        0.7,
    );

    let mut face = vec![
        Part::sphere(0.08, BLACK).at(-0.38, 0.1, 0.0).rotated(0.0, -0.1, 0.0),
        Part::sphere(0.08, BLACK).at(0.38, 0.1, 0.0).rotated(0.0, 0.1, 0.0),
    ];
    face.extend(mouth);
    parts.extend(group(face, Vec3::new(0.0, -0.1, 0.82), Quat::rotation_x(0.08), 1.0));

    parts
}

impl Population for Topper {
    fn animate(&mut self, frame: &Frame) {
        let t = frame.time;
        self.scale = lerp(0.0, 1.0, frame.progress);
        self.position = Vec3::new(0.0, BASE_HEIGHT + t.sin() * 0.1, 0.0);
        self.rotation = Quat::rotation_y((t * 0.5).sin() * 0.05);
    }

    fn emit_instances(&self, out: &mut Vec<Instance>) {
        if self.scale <= 0.0 {
            return;
        }
        emit_figure(&self.parts, self.position, self.rotation, self.scale * GROUP_SCALE, out);
    }

    fn len(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::CameraPose;

    #[test]
    fn test_scale_tracks_raw_progress() {
        let mut topper = Topper::new();
        topper.animate(&Frame::new(0.5, 0.0, 0.016, CameraPose::default()));
        assert_eq!(topper.scale(), 0.5);
        topper.animate(&Frame::new(1.0, 0.0, 0.016, CameraPose::default()));
        assert_eq!(topper.scale(), 1.0);
    }

    #[test]
    fn test_hidden_in_chaos() {
        let mut topper = Topper::new();
        topper.animate(&Frame::new(0.0, 1.0, 0.016, CameraPose::default()));
        let mut out = Vec::new();
        topper.emit_instances(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_floats_near_base_height() {
        let mut topper = Topper::new();
        for i in 0..100 {
            topper.animate(&Frame::new(1.0, i as f32 * 0.1, 0.016, CameraPose::default()));
            assert!((topper.position().y - BASE_HEIGHT).abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn test_mascot_parts() {
        let topper = Topper::new();
        let mut out = Vec::new();
        topper.emit_instances(&mut out);
        // Head, two ears, two eyes, two mouth strokes
        assert_eq!(out.len(), 7);
    }
}
