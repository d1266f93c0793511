//! Ornament populations
//!
//! Every population precomputes a fixed `Vec` of items, each holding a chaos
//! position (sphere cloud) and a target position (tree shape). Per tick the
//! scene hands each population the same read-only [`Frame`]; the population
//! resolves its items and emits render data (point sprites or primitive instances).

pub mod parts;
pub mod foliage;
pub mod baubles;
pub mod animals;
pub mod photos;
pub mod topper;
pub mod sparkles;

use std::f32::consts::PI;
use crate::animation::morph_factor;
use crate::math::{Mat4, Quat, Vec3};

pub use animals::{AnimalKind, Animals};
pub use baubles::{BaubleKind, Baubles};
pub use foliage::Foliage;
pub use photos::{FocusState, PhotoFrame, PhotoQuad, Photos};
pub use sparkles::{Sparkles, Starfield};
pub use topper::Topper;

/// Above this raw progress items face the trunk instead of tumbling
pub const ORIENT_THRESHOLD: f32 = 0.5;
/// Above this raw progress secondary motion (wind, bobbing, sway) kicks in
pub const SETTLED_THRESHOLD: f32 = 0.8;
/// Half width of the progress window used by [`OrientationPolicy::Blend`]
pub const BLEND_HALF_WIDTH: f32 = 0.1;

/// Floats per point sprite: position(3) + size(1) + alpha(1) + color(3)
pub const POINT_STRIDE: usize = 8;

/// Camera position and basis, expressed in whichever space the consumer works in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalize();
        let right = forward.cross(&Vec3::UP).normalize();
        Self {
            position,
            forward,
            up: right.cross(&forward).normalize(),
        }
    }

    /// Point `distance` units straight ahead of the camera
    pub fn point_ahead(&self, distance: f32) -> Vec3 {
        self.position + self.forward.scale(distance)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 4.0, 20.0), Vec3::ZERO)
    }
}

/// How items switch between tumbling and facing the trunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationPolicy {
    /// Hard switch at [`ORIENT_THRESHOLD`]
    #[default]
    Snap,
    /// Slerp across `ORIENT_THRESHOLD ± BLEND_HALF_WIDTH`
    Blend,
}

impl OrientationPolicy {
    pub fn from_blend_flag(blend: bool) -> Self {
        if blend {
            OrientationPolicy::Blend
        } else {
            OrientationPolicy::Snap
        }
    }

    /// Weight of the formed (facing) orientation at raw `progress`
    pub fn facing_weight(self, progress: f32) -> f32 {
        match self {
            OrientationPolicy::Snap => {
                if progress > ORIENT_THRESHOLD {
                    1.0
                } else {
                    0.0
                }
            }
            OrientationPolicy::Blend => {
                let t = ((progress - (ORIENT_THRESHOLD - BLEND_HALF_WIDTH))
                    / (2.0 * BLEND_HALF_WIDTH))
                    .clamp(0.0, 1.0);
                t * t * (3.0 - 2.0 * t)
            }
        }
    }

    pub fn orient(self, progress: f32, facing: Quat, tumble: Quat) -> Quat {
        let w = self.facing_weight(progress);
        if w >= 1.0 {
            facing
        } else if w <= 0.0 {
            tumble
        } else {
            tumble.slerp(&facing, w)
        }
    }
}

/// Per-tick values broadcast to every population
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Raw progress in [0, 1]
    pub progress: f32,
    /// `progress` after the morph easing curve
    pub eased: f32,
    /// Seconds since the scene started
    pub time: f32,
    /// Seconds since the previous tick
    pub dt: f32,
    /// Camera in the tree group's local space
    pub camera: CameraPose,
    pub orientation: OrientationPolicy,
}

impl Frame {
    pub fn new(progress: f32, time: f32, dt: f32, camera: CameraPose) -> Self {
        Self {
            progress,
            eased: morph_factor(progress),
            time,
            dt,
            camera,
            orientation: OrientationPolicy::Snap,
        }
    }

    pub fn with_orientation(mut self, orientation: OrientationPolicy) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn settled(&self) -> bool {
        self.progress > SETTLED_THRESHOLD
    }
}

/// Rotation that turns an item's local +Z away from the vertical axis at its height
pub fn facing_outward(position: Vec3) -> Quat {
    let axis_point = Vec3::new(0.0, position.y, 0.0);
    Quat::look_at(position, axis_point, Vec3::UP) * Quat::rotation_y(PI)
}

/// One precomputed member of a population
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentItem<A> {
    pub id: usize,
    pub chaos: Vec3,
    pub target: Vec3,
    pub attrs: A,
}

impl<A> OrnamentItem<A> {
    pub fn new(id: usize, chaos: Vec3, target: Vec3, attrs: A) -> Self {
        Self { id, chaos, target, attrs }
    }

    /// Interpolated position for an already-eased factor.
    ///
    /// The endpoints are returned bit-exact.
    pub fn resolve(&self, eased: f32) -> Vec3 {
        if eased >= 1.0 {
            self.target
        } else if eased <= 0.0 {
            self.chaos
        } else {
            self.chaos.lerp(&self.target, eased)
        }
    }
}

/// Unit primitives the renderer can instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Radius 1
    Sphere,
    /// Side 1
    Box,
    /// Radius 1, height 1
    Cylinder,
    /// Base radius 1, height 1
    Cone,
    /// Major radius 1, thick tube
    Torus,
    /// Major radius 1, thin tube
    Ring,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Sphere,
        Shape::Box,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Torus,
        Shape::Ring,
    ];

    pub fn index(self) -> usize {
        match self {
            Shape::Sphere => 0,
            Shape::Box => 1,
            Shape::Cylinder => 2,
            Shape::Cone => 3,
            Shape::Torus => 4,
            Shape::Ring => 5,
        }
    }
}

/// One primitive to draw, in the tree group's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub shape: Shape,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Linear RGB; values above 1 feed the bloom pass
    pub color: Vec3,
}

impl Instance {
    /// Floats per instance: model matrix(16) + color(3)
    pub const STRIDE: usize = 19;

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.rotation, self.scale)
    }

    pub fn write_to(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(self.model_matrix().as_slice());
        out.extend_from_slice(&self.color.to_array());
    }
}

/// A population animated by the scene once per tick
pub trait Population {
    fn animate(&mut self, frame: &Frame);

    /// Append primitive instances for the current state
    fn emit_instances(&self, _out: &mut Vec<Instance>) {}

    /// Append point sprites for the current state, [`POINT_STRIDE`] floats each
    fn emit_points(&self, _out: &mut Vec<f32>) {}

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn push_point(out: &mut Vec<f32>, position: Vec3, size: f32, alpha: f32, color: Vec3) {
    out.extend_from_slice(&[
        position.x, position.y, position.z,
        size,
        alpha,
        color.x, color.y, color.z,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ProgressController, TreeState};

    #[test]
    fn test_formed_item_resolves_exactly_to_target() {
        let mut progress = ProgressController::new(TreeState::Formed);
        let item = OrnamentItem::new(0, Vec3::ZERO, Vec3::new(3.0, 5.0, -2.0), ());

        progress.update(1.0 / 60.0);
        let frame = Frame::new(progress.current(), 0.0, 1.0 / 60.0, CameraPose::default());

        assert_eq!(item.resolve(frame.eased), Vec3::new(3.0, 5.0, -2.0));
    }

    #[test]
    fn test_chaos_item_resolves_to_chaos() {
        let item = OrnamentItem::new(0, Vec3::new(1.0, -2.0, 4.0), Vec3::new(3.0, 5.0, -2.0), ());
        let frame = Frame::new(0.0, 0.0, 0.0, CameraPose::default());
        assert_eq!(item.resolve(frame.eased), Vec3::new(1.0, -2.0, 4.0));
    }

    #[test]
    fn test_snap_orientation() {
        let facing = Quat::rotation_y(1.0);
        let tumble = Quat::rotation_x(2.0);
        let policy = OrientationPolicy::Snap;
        assert_eq!(policy.orient(0.5, facing, tumble), tumble);
        assert_eq!(policy.orient(0.51, facing, tumble), facing);
    }

    #[test]
    fn test_blend_orientation_is_continuous() {
        let policy = OrientationPolicy::Blend;
        assert_eq!(policy.facing_weight(0.39), 0.0);
        assert_eq!(policy.facing_weight(0.61), 1.0);
        assert!((policy.facing_weight(0.5) - 0.5).abs() < 1e-6);

        let mut prev = 0.0;
        for i in 0..=100 {
            let w = policy.facing_weight(i as f32 / 100.0);
            assert!(w >= prev);
            assert!(w - prev < 0.1, "jump at {}", i);
            prev = w;
        }
    }

    #[test]
    fn test_facing_outward_points_away_from_axis() {
        let position = Vec3::new(2.0, 3.0, 0.0);
        let q = facing_outward(position);
        let forward = q.rotate(Vec3::FORWARD);
        assert!((forward.x - 1.0).abs() < 1e-4, "forward was {:?}", forward);
        assert!(forward.y.abs() < 1e-4);
    }

    #[test]
    fn test_camera_point_ahead() {
        let camera = CameraPose::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let p = camera.point_ahead(8.0);
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_instance_layout() {
        let instance = Instance {
            shape: Shape::Sphere,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
            color: Vec3::new(0.1, 0.2, 0.3),
        };
        let mut data = Vec::new();
        instance.write_to(&mut data);
        assert_eq!(data.len(), Instance::STRIDE);
        // Column-major translation
        assert_eq!(&data[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(&data[16..19], &[0.1, 0.2, 0.3]);
    }
}
