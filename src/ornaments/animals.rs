//! Cartoon animal heads hung on the upper half of the tree

use std::f32::consts::{FRAC_PI_2, PI};
use rand::Rng;
use crate::distribution::{push_outward, uniform_sphere_point};
use crate::math::{Quat, Vec3};
use super::parts::{emit_figure, group, Part};
use super::{facing_outward, Frame, Instance, OrnamentItem, Population};

const FIGURE_SCALE: f32 = 0.55;
const CHAOS_RADIUS: f32 = 14.0;
const OUTWARD_PUSH: f32 = 0.6;

const BLACK: u32 = 0x000000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Panda,
    Lion,
    Monkey,
    Pig,
    Capybara,
    Rabbit,
    Bear,
    Tiger,
    GoldenMonkey,
    Hippo,
    Whale,
    Shark,
    PolarBear,
    Penguin,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 14] = [
        AnimalKind::Panda,
        AnimalKind::Lion,
        AnimalKind::Monkey,
        AnimalKind::Pig,
        AnimalKind::Capybara,
        AnimalKind::Rabbit,
        AnimalKind::Bear,
        AnimalKind::Tiger,
        AnimalKind::GoldenMonkey,
        AnimalKind::Hippo,
        AnimalKind::Whale,
        AnimalKind::Shark,
        AnimalKind::PolarBear,
        AnimalKind::Penguin,
    ];

    /// Primitive parts of the figure, facing +Z at unit scale
    pub fn parts(self) -> Vec<Part> {
        match self {
            AnimalKind::Panda => vec![
                Part::sphere(0.6, 0xFFFFFF),
                Part::sphere(0.2, 0x111111).at(-0.45, 0.45, 0.0),
                Part::sphere(0.2, 0x111111).at(0.45, 0.45, 0.0),
                Part::sphere(0.15, 0x111111).at(-0.2, 0.1, 0.5).rotated(0.2, 0.0, 0.0),
                Part::sphere(0.15, 0x111111).at(0.2, 0.1, 0.5).rotated(0.2, 0.0, 0.0),
                Part::sphere(0.06, 0x111111).at(0.0, -0.1, 0.55),
            ],
            AnimalKind::Lion => vec![
                Part::torus(0.6, 0xFF8C00).at(0.0, 0.0, -0.1),
                Part::sphere(0.55, 0xFFD700),
                Part::sphere(0.15, 0xFFD700).at(-0.4, 0.4, 0.0),
                Part::sphere(0.15, 0xFFD700).at(0.4, 0.4, 0.0),
                Part::sphere(0.2, 0xFFFFFF).at(0.0, -0.1, 0.45).stretched(1.0, 0.8, 0.5),
                Part::sphere(0.06, 0x333333).at(0.0, -0.05, 0.56),
            ],
            AnimalKind::Monkey => vec![
                Part::sphere(0.5, 0x8B4513),
                Part::sphere(0.2, 0xD2691E).at(-0.5, 0.1, 0.0),
                Part::sphere(0.2, 0xD2691E).at(0.5, 0.1, 0.0),
                Part::sphere(0.35, 0xF4A460).at(0.0, 0.05, 0.35),
                Part::sphere(0.05, BLACK).at(-0.12, 0.15, 0.6).stretched(1.0, 1.0, 0.5),
                Part::sphere(0.05, BLACK).at(0.12, 0.15, 0.6).stretched(1.0, 1.0, 0.5),
            ],
            AnimalKind::Pig => vec![
                Part::sphere(0.55, 0xFFB6C1),
                Part::cylinder(0.15, 0.15, 0xFF69B4).at(0.0, -0.05, 0.45).rotated(FRAC_PI_2, 0.0, 0.0),
                Part::cone(0.15, 0.3, 0xFFB6C1).at(-0.3, 0.45, 0.0).rotated(0.0, 0.0, 0.5),
                Part::cone(0.15, 0.3, 0xFFB6C1).at(0.3, 0.45, 0.0).rotated(0.0, 0.0, -0.5),
            ],
            AnimalKind::Capybara => vec![
                Part::cuboid(0.5, 0.6, 0.8, 0x8B4513).at(0.0, 0.0, 0.1),
                Part::cuboid(0.4, 0.3, 0.3, 0x5D4037).at(0.0, -0.1, 0.55),
                Part::cuboid(0.1, 0.02, 0.05, BLACK).at(-0.15, 0.1, 0.51),
                Part::cuboid(0.1, 0.02, 0.05, BLACK).at(0.15, 0.1, 0.51),
                Part::sphere(0.08, 0x5D4037).at(-0.2, 0.3, -0.1),
                Part::sphere(0.08, 0x5D4037).at(0.2, 0.3, -0.1),
            ],
            AnimalKind::Rabbit => vec![
                Part::sphere(0.5, 0xE0E0E0),
                Part::ellipsoid(Vec3::new(0.12, 0.42, 0.12), 0xE0E0E0).at(-0.2, 0.6, 0.0).rotated(0.0, 0.0, -0.1),
                Part::ellipsoid(Vec3::new(0.12, 0.42, 0.12), 0xE0E0E0).at(0.2, 0.6, 0.0).rotated(0.0, 0.0, 0.1),
                Part::sphere(0.05, 0xFF69B4).at(0.0, -0.05, 0.45),
            ],
            AnimalKind::Bear => bear(0x5D4037, 0x8D6E63, 0.18),
            AnimalKind::PolarBear => bear(0xF0F8FF, 0xE0F7FA, 0.15),
            AnimalKind::Tiger => vec![
                Part::sphere(0.6, 0xFF9800),
                Part::ring(0.58, 0x222222).rotated(FRAC_PI_2, 0.0, 0.0),
                Part::ring(0.58, 0x222222).rotated(FRAC_PI_2, 0.5, 0.0),
                Part::ring(0.4, 0x222222).at(0.0, 0.4, 0.0),
                Part::sphere(0.18, 0xFF9800).at(-0.45, 0.45, 0.0),
                Part::sphere(0.18, 0xFF9800).at(0.45, 0.45, 0.0),
                Part::sphere(0.22, 0xFFFFFF).at(0.0, -0.15, 0.45),
            ],
            AnimalKind::GoldenMonkey => vec![
                Part::sphere(0.5, 0xFFD700),
                Part::sphere(0.3, 0x87CEEB).at(0.0, 0.05, 0.35),
                Part::sphere(0.2, 0xFFA500).at(-0.5, 0.1, 0.0),
                Part::sphere(0.2, 0xFFA500).at(0.5, 0.1, 0.0),
                Part::sphere(0.04, BLACK).at(-0.1, 0.1, 0.6),
                Part::sphere(0.04, BLACK).at(0.1, 0.1, 0.6),
            ],
            AnimalKind::Hippo => vec![
                Part::sphere(0.5, 0x9FA8DA),
                Part::cuboid(0.6, 0.4, 0.5, 0xC5CAE9).at(0.0, -0.2, 0.4),
                Part::sphere(0.05, 0x5C6BC0).at(-0.15, -0.05, 0.65),
                Part::sphere(0.05, 0x5C6BC0).at(0.15, -0.05, 0.65),
                Part::sphere(0.08, 0x9FA8DA).at(-0.3, 0.45, 0.0),
                Part::sphere(0.08, 0x9FA8DA).at(0.3, 0.45, 0.0),
            ],
            AnimalKind::Whale => {
                let mut parts = vec![
                    Part::ellipsoid(Vec3::new(0.6, 0.36, 0.9), 0x03A9F4),
                    Part::ellipsoid(Vec3::new(0.54, 0.3, 0.84), 0xE1F5FE).at(0.0, -0.2, 0.0),
                ];
                parts.extend(group(
                    vec![
                        Part::cone(0.2, 0.5, 0x03A9F4).at(-0.3, 0.0, 0.0).rotated(0.0, 0.0, 0.5),
                        Part::cone(0.2, 0.5, 0x03A9F4).at(0.3, 0.0, 0.0).rotated(0.0, 0.0, -0.5),
                    ],
                    Vec3::new(0.0, 0.0, -0.8),
                    Quat::rotation_x(0.5),
                    1.0,
                ));
                parts
            }
            AnimalKind::Shark => vec![
                Part::ellipsoid(Vec3::new(0.4, 0.4, 0.9), 0xB0BEC5),
                Part::cone(0.05, 0.6, 0xB0BEC5).at(0.0, 0.4, 0.2).rotated(-0.5, 0.0, 0.0),
                Part::sphere(0.05, BLACK).at(-0.3, 0.1, 0.6),
                Part::sphere(0.05, BLACK).at(0.3, 0.1, 0.6),
            ],
            AnimalKind::Penguin => vec![
                Part::ellipsoid(Vec3::new(0.4, 0.6, 0.4), 0x212121),
                Part::ellipsoid(Vec3::new(0.3, 0.5, 0.2), 0xFFFFFF).at(0.0, 0.0, 0.25),
                Part::cone(0.08, 0.2, 0xFFC107).at(0.0, 0.3, 0.45).rotated(FRAC_PI_2, 0.0, 0.0),
                Part::sphere(0.04, BLACK).at(-0.15, 0.4, 0.38),
                Part::sphere(0.04, BLACK).at(0.15, 0.4, 0.38),
            ],
        }
    }
}

fn bear(fur: u32, snout: u32, ear: f32) -> Vec<Part> {
    vec![
        Part::sphere(0.6, fur),
        Part::sphere(0.25, snout).at(0.0, -0.15, 0.45),
        Part::sphere(0.08, 0x222222).at(0.0, -0.1, 0.65),
        Part::sphere(ear, fur).at(-0.45, 0.45, 0.0),
        Part::sphere(ear, fur).at(0.45, 0.45, 0.0),
    ]
}

/// Golden-angle spiral slot `index` of `count` on the upper tree
pub fn spiral_slot(index: usize, count: usize) -> Vec3 {
    let golden = PI * (3.0 - 5f32.sqrt());
    let y_norm = if count > 1 {
        1.0 - index as f32 / (count - 1) as f32
    } else {
        1.0
    };
    let height = 5.0 + y_norm * 4.5;
    let radius = 4.2 * (1.0 - height / 12.0);
    let theta = golden * index as f32 * 8.0;

    let on_cone = Vec3::new(theta.cos() * radius, height - 4.0, theta.sin() * radius);
    push_outward(on_cone, OUTWARD_PUSH)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub kind: AnimalKind,
    pub phase: f32,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Copy)]
struct Pose {
    position: Vec3,
    rotation: Quat,
}

/// One figure of each kind
pub struct Animals {
    items: Vec<OrnamentItem<Animal>>,
    poses: Vec<Pose>,
}

impl Animals {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_kinds(rng, &AnimalKind::ALL)
    }

    pub fn with_kinds<R: Rng + ?Sized>(rng: &mut R, kinds: &[AnimalKind]) -> Self {
        let items: Vec<_> = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let target = spiral_slot(i, kinds.len());
                let chaos = uniform_sphere_point(rng, CHAOS_RADIUS);
                let animal = Animal {
                    kind,
                    phase: rng.gen_range(0.0..100.0),
                    parts: kind.parts(),
                };
                OrnamentItem::new(i, chaos, target, animal)
            })
            .collect();

        let poses = items
            .iter()
            .map(|item| Pose {
                position: item.target,
                rotation: facing_outward(item.target),
            })
            .collect();

        Self { items, poses }
    }

    pub fn items(&self) -> &[OrnamentItem<Animal>] {
        &self.items
    }

    pub fn position(&self, id: usize) -> Option<Vec3> {
        self.poses.get(id).map(|p| p.position)
    }

    pub fn rotation(&self, id: usize) -> Option<Quat> {
        self.poses.get(id).map(|p| p.rotation)
    }
}

impl Population for Animals {
    fn animate(&mut self, frame: &Frame) {
        let t = frame.time;
        for (item, pose) in self.items.iter().zip(self.poses.iter_mut()) {
            let phase = item.attrs.phase;
            let mut position = item.resolve(frame.eased);

            let tumble = Quat::from_euler_xyz(t + phase, 0.0, t * 0.5);
            let mut rotation = frame
                .orientation
                .orient(frame.progress, facing_outward(position), tumble);

            if frame.settled() {
                position.y += (t * 2.0 + phase).sin() * 0.05;
                rotation = rotation * Quat::rotation_z((t * 1.5 + phase).sin() * 0.05);
            }

            *pose = Pose { position, rotation };
        }
    }

    fn emit_instances(&self, out: &mut Vec<Instance>) {
        for (item, pose) in self.items.iter().zip(self.poses.iter()) {
            emit_figure(&item.attrs.parts, pose.position, pose.rotation, FIGURE_SCALE, out);
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
