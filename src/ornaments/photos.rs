//! Photo frames: the only population with a per-item override of the shared progress
//!
//! A focused photo leaves the tree and flies to a point in front of the camera.
//! Every photo reaches its goal through exponential smoothing, so focusing,
//! unfocusing and morphing never snap.

use std::f32::consts::TAU;
use rand::Rng;
use crate::config::PhotoEntry;
use crate::distribution::{push_outward, uniform_sphere_point};
use crate::math::{damp_vec3, Mat4, Quat, Vec3};
use super::parts::{emit_figure, Part};
use super::{facing_outward, Frame, Instance, OrnamentItem, Population};

/// Distance in front of the camera a focused photo settles at
pub const FOCUS_DISTANCE: f32 = 8.0;
/// Follow rate (1/s); about a 0.1 lerp per frame at 60 Hz
pub const FOLLOW_RATE: f32 = 6.3;
/// Radius of the sphere used to pick a photo
pub const PICK_RADIUS: f32 = 0.9;

const GROUP_SCALE: f32 = 1.2;
const CHAOS_RADIUS: f32 = 14.0;
const OUTWARD_PUSH: f32 = 0.7;
/// Photo plane offset inside the frame
const QUAD_OFFSET: Vec3 = Vec3::new(0.0, 0.1, 0.031);

/// Single-select focus. Activating a new photo releases the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    active: Option<usize>,
}

impl FocusState {
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active == Some(id)
    }

    /// Activate `id`, or release it if it is already the active photo.
    /// Returns the new active id.
    pub fn toggle(&mut self, id: usize) -> Option<usize> {
        self.active = if self.is_active(id) { None } else { Some(id) };
        self.active
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFrame {
    pub key: String,
    pub url: String,
    pub phase: f32,
}

/// Textured quad the renderer draws with the photo's texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoQuad {
    pub id: usize,
    /// Group-local transform of the unit quad
    pub model: [f32; 16],
}

/// Target slot of photo `index` of `count`: a ring below the animals
pub fn ring_slot(index: usize, count: usize) -> Vec3 {
    let height = if count > 1 {
        2.0 + (index as f32 / (count - 1) as f32) * 2.5
    } else {
        2.0
    };
    let radius = 4.2 * (1.0 - height / 12.0);
    let theta = index as f32 / count.max(1) as f32 * TAU;

    let on_cone = Vec3::new(theta.cos() * radius, height - 4.0, theta.sin() * radius);
    push_outward(on_cone, OUTWARD_PUSH)
}

#[derive(Debug, Clone, Copy)]
struct Pose {
    position: Vec3,
    rotation: Quat,
}

pub struct Photos {
    items: Vec<OrnamentItem<PhotoFrame>>,
    poses: Vec<Pose>,
    focus: FocusState,
    frame_parts: Vec<Part>,
}

impl Photos {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, entries: &[PhotoEntry]) -> Self {
        let items: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let target = ring_slot(i, entries.len());
                let chaos = uniform_sphere_point(rng, CHAOS_RADIUS);
                let frame = PhotoFrame {
                    key: entry.id.clone(),
                    url: entry.url.clone(),
                    phase: rng.gen_range(0.0..10.0),
                };
                OrnamentItem::new(i, chaos, target, frame)
            })
            .collect();

        let poses = items
            .iter()
            .map(|item| Pose {
                position: item.target,
                rotation: facing_outward(item.target),
            })
            .collect();

        Self {
            items,
            poses,
            focus: FocusState::default(),
            frame_parts: frame_parts(),
        }
    }

    /// Place every photo directly on its interpolated position, skipping the smoothing
    pub fn settle(&mut self, eased: f32) {
        for (item, pose) in self.items.iter().zip(self.poses.iter_mut()) {
            pose.position = item.resolve(eased);
        }
    }

    pub fn items(&self) -> &[OrnamentItem<PhotoFrame>] {
        &self.items
    }

    pub fn get(&self, id: usize) -> Option<&OrnamentItem<PhotoFrame>> {
        self.items.get(id)
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    /// Toggle focus on photo `id`. Unknown ids are ignored.
    pub fn activate(&mut self, id: usize) -> Option<usize> {
        if id >= self.items.len() {
            log::debug!("ignoring activation of unknown photo {}", id);
            return self.focus.active();
        }
        let active = self.focus.toggle(id);
        log::debug!("photo focus -> {:?}", active);
        active
    }

    pub fn position(&self, id: usize) -> Option<Vec3> {
        self.poses.get(id).map(|p| p.position)
    }

    pub fn rotation(&self, id: usize) -> Option<Quat> {
        self.poses.get(id).map(|p| p.rotation)
    }

    /// (id, centre) of every photo for picking
    pub fn pick_spheres(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.poses.iter().enumerate().map(|(id, p)| (id, p.position))
    }

    /// Append the textured plane of every photo
    pub fn emit_quads(&self, out: &mut Vec<PhotoQuad>) {
        out.extend(self.poses.iter().enumerate().map(|(id, pose)| {
            let offset = pose.rotation.rotate(QUAD_OFFSET.scale(GROUP_SCALE));
            let model = Mat4::from_trs(pose.position + offset, pose.rotation, Vec3::splat(GROUP_SCALE));
            PhotoQuad { id, model: model.data }
        }));
    }

    fn goal(&self, item: &OrnamentItem<PhotoFrame>, frame: &Frame) -> Vec3 {
        if self.focus.is_active(item.id) {
            frame.camera.point_ahead(FOCUS_DISTANCE)
        } else {
            item.resolve(frame.eased)
        }
    }
}

fn frame_parts() -> Vec<Part> {
    vec![
        // Backing card
        Part::cuboid(1.2, 1.4, 0.05, 0xF0F0F0),
        // Hanging clip
        Part::torus(0.1, 0xFFD700).at(0.0, 0.8, 0.0),
    ]
}

impl Population for Photos {
    fn animate(&mut self, frame: &Frame) {
        let t = frame.time;
        for i in 0..self.items.len() {
            let item = &self.items[i];
            let goal = self.goal(item, frame);
            let phase = item.attrs.phase;

            let current = self.poses[i].position;
            let position = if frame.dt > 0.0 && frame.dt.is_finite() {
                damp_vec3(current, goal, FOLLOW_RATE, frame.dt)
            } else {
                current
            };

            let rotation = if self.focus.is_active(item.id) {
                Quat::look_at(position, frame.camera.position, frame.camera.up)
            } else {
                let mut facing = facing_outward(position);
                facing = facing * Quat::rotation_z((t + phase).sin() * 0.05);
                let tumble = Quat::from_euler_xyz(t + phase, t * 0.5 + phase, 0.0);
                frame.orientation.orient(frame.progress, facing, tumble)
            };

            self.poses[i] = Pose { position, rotation };
        }
    }

    fn emit_instances(&self, out: &mut Vec<Instance>) {
        for pose in &self.poses {
            emit_figure(&self.frame_parts, pose.position, pose.rotation, GROUP_SCALE, out);
        }
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

    fn photos(n: usize) -> Photos {
        let entries: Vec<_> = (0..n)
            .map(|i| PhotoEntry::new(&format!("p{}", i), &format!("photos/{}.jpg", i)))
            .collect();
        let mut rng = StdRng::seed_from_u64(4);
        Photos::new(&mut rng, &entries)
    }

    #[test]
    fn test_focus_is_single_select() {
        let mut p = photos(8);
        assert_eq!(p.activate(5), Some(5));
        assert_eq!(p.activate(2), Some(2));
        assert!(!p.focus().is_active(5));
        assert!(p.focus().is_active(2));
        let active = (0..8).filter(|&i| p.focus().is_active(i)).count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_clicking_active_photo_releases_it() {
        let mut p = photos(3);
        p.activate(1);
        assert_eq!(p.activate(1), None);
        assert_eq!(p.focus().active(), None);
    }

    #[test]
    fn test_unknown_photo_ignored() {
        let mut p = photos(3);
        p.activate(0);
        assert_eq!(p.activate(7), Some(0));
    }

    #[test]
    fn test_ring_slots() {
        let first = ring_slot(0, 5);
        let last = ring_slot(4, 5);
        assert!((first.y - (2.0 - 4.0)).abs() < 1e-5);
        assert!((last.y - (4.5 - 4.0)).abs() < 1e-5);
        // One photo does not divide by zero
        let only = ring_slot(0, 1);
        assert!(only.is_finite());
        assert!((only.y + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_focused_photo_approaches_camera_smoothly() {
        let mut p = photos(4);
        let camera = CameraPose::looking_at(Vec3::new(0.0, 6.0, 22.0), Vec3::new(0.0, 2.0, 0.0));
        let goal = camera.point_ahead(FOCUS_DISTANCE);
        p.activate(2);

        let start = p.position(2).unwrap();
        let mut prev = start.distance(&goal);
        p.animate(&Frame::new(1.0, 0.0, 1.0 / 60.0, camera));
        let first = p.position(2).unwrap();
        // No snap on the first frame
        assert!(first.distance(&goal) > prev * 0.8);

        for i in 1..600 {
            p.animate(&Frame::new(1.0, i as f32 / 60.0, 1.0 / 60.0, camera));
            let d = p.position(2).unwrap().distance(&goal);
            assert!(d <= prev + 1e-4);
            prev = d;
        }
        assert!(prev < 1e-2, "photo stopped {} short", prev);

        // Faces the camera
        let pos = p.position(2).unwrap();
        let forward = p.rotation(2).unwrap().rotate(Vec3::FORWARD);
        let to_camera = (camera.position - pos).normalize();
        assert!(forward.dot(&to_camera) > 0.999);
    }

    #[test]
    fn test_released_photo_returns_to_tree() {
        let mut p = photos(4);
        let camera = CameraPose::default();
        p.activate(1);
        for i in 0..300 {
            p.animate(&Frame::new(1.0, i as f32 / 60.0, 1.0 / 60.0, camera));
        }
        p.activate(1);
        p.animate(&Frame::new(1.0, 5.0, 1.0 / 60.0, camera));
        let target = p.items()[1].target;
        let just_released = p.position(1).unwrap();
        assert!(just_released.distance(&target) > 1.0, "released photo snapped back");

        for i in 0..600 {
            p.animate(&Frame::new(1.0, 5.0 + i as f32 / 60.0, 1.0 / 60.0, camera));
        }
        assert!(p.position(1).unwrap().distance(&target) < 1e-2);
    }

    #[test]
    fn test_chaos_tumble_differs_per_photo() {
        let mut p = photos(8);
        p.animate(&Frame::new(0.0, 3.0, 0.016, CameraPose::default()));
        let first = p.rotation(0).unwrap();
        let distinct = (1..8)
            .filter(|&i| p.rotation(i).unwrap().dot(&first).abs() < 0.999)
            .count();
        assert!(distinct > 0, "photos tumble in lock-step");
    }

    #[test]
    fn test_zero_dt_keeps_position() {
        let mut p = photos(2);
        let before = p.position(0).unwrap();
        p.animate(&Frame::new(0.0, 1.0, 0.0, CameraPose::default()));
        assert_eq!(p.position(0), Some(before));
    }

    #[test]
    fn test_quads_and_frames() {
        let mut p = photos(3);
        p.animate(&Frame::new(1.0, 0.0, 0.016, CameraPose::default()));
        let mut quads = Vec::new();
        p.emit_quads(&mut quads);
        assert_eq!(quads.len(), 3);
        let mut out = Vec::new();
        p.emit_instances(&mut out);
        assert_eq!(out.len(), 6);
    }
}
