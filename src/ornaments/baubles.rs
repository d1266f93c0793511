use std::f32::consts::{PI, TAU};
use rand::Rng;
use crate::config::BaubleCounts;
use crate::distribution::{push_outward, uniform_cone_point, uniform_sphere_point, ConeParams};
use crate::math::{Quat, Vec3};
use super::{Frame, Instance, OrnamentItem, Population, Shape};

const PALETTE: [u32; 4] = [
    0xFFD700, // gold
    0xC41E3A, // cardinal red
    0xFFFFFF, // silver
    0xB8860B, // dark goldenrod
];
const LIGHT_COLOR: u32 = 0xFFFACD;
const LIGHT_INTENSITY: f32 = 1.5;
const LIGHT_SCALE: f32 = 0.15;
const CHAOS_RADIUS: f32 = 18.0;
const OUTWARD_PUSH: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaubleKind {
    Ball,
    Box,
    Light,
}

impl BaubleKind {
    /// Cone the kind hangs on. Lights stay lower so they do not bloom over the topper.
    pub fn cone(self) -> ConeParams {
        let height = match self {
            BaubleKind::Light => 6.0,
            _ => 7.5,
        };
        ConeParams::new(height, 4.2).with_offset(-3.5)
    }

    pub fn shape(self) -> Shape {
        match self {
            BaubleKind::Box => Shape::Box,
            BaubleKind::Ball | BaubleKind::Light => Shape::Sphere,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bauble {
    pub kind: BaubleKind,
    /// Euler XYZ base rotation
    pub rotation: Vec3,
    pub scale: f32,
    pub color: Vec3,
    pub phase: f32,
}

#[derive(Debug, Clone, Copy)]
struct Pose {
    position: Vec3,
    rotation: Quat,
    scale: f32,
}

/// Instanced balls, gift boxes and fairy lights
pub struct Baubles {
    items: Vec<OrnamentItem<Bauble>>,
    poses: Vec<Pose>,
}

impl Baubles {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, counts: BaubleCounts) -> Self {
        let mut items = Vec::with_capacity(counts.balls + counts.boxes + counts.lights);
        for (kind, count) in [
            (BaubleKind::Ball, counts.balls),
            (BaubleKind::Box, counts.boxes),
            (BaubleKind::Light, counts.lights),
        ] {
            for i in 0..count {
                let id = items.len();
                items.push(Self::generate(rng, id, i, kind));
            }
        }

        let poses = items
            .iter()
            .map(|item| Pose {
                position: item.target,
                rotation: Quat::IDENTITY,
                scale: item.attrs.scale,
            })
            .collect();

        Self { items, poses }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R, id: usize, index: usize, kind: BaubleKind) -> OrnamentItem<Bauble> {
        let target = push_outward(uniform_cone_point(rng, &kind.cone()), OUTWARD_PUSH);
        let chaos = uniform_sphere_point(rng, CHAOS_RADIUS);

        let scale = match kind {
            BaubleKind::Light => LIGHT_SCALE,
            _ => rng.gen_range(0.2..0.5),
        };
        let rotation = Vec3::new(rng.gen_range(0.0..PI), rng.gen_range(0.0..PI), 0.0);
        let color = match kind {
            BaubleKind::Light => Vec3::from_hex(LIGHT_COLOR).scale(LIGHT_INTENSITY),
            _ => Vec3::from_hex(PALETTE[rng.gen_range(0..PALETTE.len())]),
        };
        // Index-derived phases keep neighbours out of step
        let phase = match kind {
            BaubleKind::Light => index as f32 * 10.0,
            _ => index as f32,
        };

        OrnamentItem::new(id, chaos, target, Bauble { kind, rotation, scale, color, phase })
    }

    pub fn items(&self) -> &[OrnamentItem<Bauble>] {
        &self.items
    }

    pub fn count(&self, kind: BaubleKind) -> usize {
        self.items.iter().filter(|i| i.attrs.kind == kind).count()
    }

    /// Current position of item `id`
    pub fn position(&self, id: usize) -> Option<Vec3> {
        self.poses.get(id).map(|p| p.position)
    }

    pub fn scale(&self, id: usize) -> Option<f32> {
        self.poses.get(id).map(|p| p.scale)
    }

    fn pose(item: &OrnamentItem<Bauble>, frame: &Frame) -> Pose {
        let b = &item.attrs;
        let t = frame.time;
        let position = item.resolve(frame.eased);

        let (rotation, scale) = match b.kind {
            BaubleKind::Ball => (
                Quat::from_euler_xyz(b.rotation.x + t * 0.1, b.rotation.y + t * 0.2, b.rotation.z),
                b.scale * (0.8 + 0.2 * (t + b.phase).sin()),
            ),
            BaubleKind::Box => (
                Quat::from_euler_xyz(b.rotation.x, b.rotation.y + frame.eased * TAU, b.rotation.z),
                b.scale,
            ),
            BaubleKind::Light => {
                let twinkle = (t * 3.0 + b.phase).sin() * 0.5 + 0.5;
                (Quat::IDENTITY, b.scale * (0.5 + twinkle))
            }
        };

        Pose { position, rotation, scale }
    }
}

impl Population for Baubles {
    fn animate(&mut self, frame: &Frame) {
        for (item, pose) in self.items.iter().zip(self.poses.iter_mut()) {
            *pose = Self::pose(item, frame);
        }
    }

    fn emit_instances(&self, out: &mut Vec<Instance>) {
        out.extend(self.items.iter().zip(self.poses.iter()).map(|(item, pose)| Instance {
            shape: item.attrs.kind.shape(),
            position: pose.position,
            rotation: pose.rotation,
            scale: Vec3::splat(pose.scale),
            color: item.attrs.color,
        }));
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::CameraPose;
    use rand::{rngs::StdRng, SeedableRng};

    fn baubles() -> Baubles {
        let mut rng = StdRng::seed_from_u64(9);
        Baubles::new(&mut rng, BaubleCounts::default())
    }

    #[test]
    fn test_counts_and_ids() {
        let b = baubles();
        assert_eq!(b.len(), 250);
        assert_eq!(b.count(BaubleKind::Ball), 150);
        assert_eq!(b.count(BaubleKind::Box), 40);
        assert_eq!(b.count(BaubleKind::Light), 60);
        for (i, item) in b.items().iter().enumerate() {
            assert_eq!(item.id, i);
        }
    }

    #[test]
    fn test_static_attributes() {
        let b = baubles();
        for item in b.items() {
            let attrs = &item.attrs;
            match attrs.kind {
                BaubleKind::Light => {
                    assert_eq!(attrs.scale, LIGHT_SCALE);
                    assert!(attrs.color.x > 1.0, "lights are boosted for bloom");
                }
                _ => {
                    assert!(attrs.scale >= 0.2 && attrs.scale < 0.5);
                    assert!(PALETTE.iter().any(|&c| Vec3::from_hex(c) == attrs.color));
                }
            }
            assert!(item.chaos.length() <= CHAOS_RADIUS * 1.0001);
            // Lights never hang above the 6-unit cone
            let top = attrs.kind.cone().y_offset + attrs.kind.cone().max_height();
            assert!(item.target.y <= top + 1e-4);
        }
    }

    #[test]
    fn test_formed_positions_are_targets() {
        let mut b = baubles();
        b.animate(&Frame::new(1.0, 2.0, 0.016, CameraPose::default()));
        for item in b.items() {
            assert_eq!(b.position(item.id), Some(item.target));
        }
    }

    #[test]
    fn test_light_twinkle_range() {
        let mut b = baubles();
        for step in 0..50 {
            b.animate(&Frame::new(1.0, step as f32 * 0.13, 0.016, CameraPose::default()));
            for item in b.items().iter().filter(|i| i.attrs.kind == BaubleKind::Light) {
                let s = b.scale(item.id).unwrap();
                assert!(s >= LIGHT_SCALE * 0.5 - 1e-6 && s <= LIGHT_SCALE * 1.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_lights_twinkle_out_of_step() {
        let mut b = baubles();
        b.animate(&Frame::new(1.0, 4.0, 0.016, CameraPose::default()));
        let scales: Vec<f32> = b
            .items()
            .iter()
            .filter(|i| i.attrs.kind == BaubleKind::Light)
            .map(|i| b.scale(i.id).unwrap())
            .collect();
        let lo = scales.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = scales.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(hi - lo > LIGHT_SCALE * 0.5);
    }

    #[test]
    fn test_emits_one_instance_per_item() {
        let mut b = baubles();
        b.animate(&Frame::new(0.3, 1.0, 0.016, CameraPose::default()));
        let mut out = Vec::new();
        b.emit_instances(&mut out);
        assert_eq!(out.len(), b.len());
        assert_eq!(out.iter().filter(|i| i.shape == Shape::Box).count(), 40);
    }
}
