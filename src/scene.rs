//! The morphing tree scene
//!
//! [`TreeScene`] owns the progress controller and every population. Each call
//! to [`TreeScene::tick`] advances the controller once, builds a single
//! [`Frame`] and hands it to every population before any render data is read.

use std::f32::consts::TAU;
use rand::{rngs::StdRng, SeedableRng};
use crate::animation::{ProgressController, TreeState};
use crate::assets::PhotoStore;
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::interaction::{dispatch, InteractEvent, Interactive, HitInfo, Ray, RayPicker, TreeHitbox};
use crate::math::{Mat4, Quat, Vec3};
use crate::ornaments::photos::PICK_RADIUS;
use crate::ornaments::{
    Animals, Baubles, CameraPose, Foliage, Frame, Instance, OrientationPolicy, PhotoQuad, Photos,
    Population, Sparkles, Starfield, Topper,
};

const SPARKLE_COUNT: usize = 300;
const SPARKLE_EXTENT: f32 = 25.0;
const STAR_COUNT: usize = 5_000;
const STAR_RADIUS: f32 = 100.0;
const STAR_DEPTH: f32 = 50.0;

/// Transform of the group holding every tree population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGroup {
    pub offset: Vec3,
    pub yaw: f32,
    /// Radians per second
    pub yaw_rate: f32,
}

impl SceneGroup {
    pub const OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);
    pub const YAW_RATE: f32 = 0.05;

    pub fn advance(&mut self, dt: f32) {
        self.yaw = (self.yaw + dt * self.yaw_rate) % TAU;
    }

    pub fn rotation(&self) -> Quat {
        Quat::rotation_y(self.yaw)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_trs(self.offset, self.rotation(), Vec3::ONE)
    }

    pub fn to_world(&self, p: Vec3) -> Vec3 {
        self.offset + self.rotation().rotate(p)
    }

    pub fn to_local(&self, p: Vec3) -> Vec3 {
        self.rotation().conjugate().rotate(p - self.offset)
    }

    pub fn direction_to_local(&self, d: Vec3) -> Vec3 {
        self.rotation().conjugate().rotate(d)
    }

    pub fn camera_to_local(&self, camera: &CameraPose) -> CameraPose {
        CameraPose {
            position: self.to_local(camera.position),
            forward: self.direction_to_local(camera.forward),
            up: self.direction_to_local(camera.up),
        }
    }

    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        Ray::new(self.to_local(ray.origin), self.direction_to_local(ray.direction))
    }
}

impl Default for SceneGroup {
    fn default() -> Self {
        Self {
            offset: Self::OFFSET,
            yaw: 0.0,
            yaw_rate: Self::YAW_RATE,
        }
    }
}

/// Everything the renderer reads for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Model matrix of the tree group
    pub group: Mat4,
    pub progress: f32,
    pub eased: f32,
    /// Foliage point sprites, group-local
    pub tree_points: Vec<f32>,
    /// Sparkles and stars, world space
    pub ambient_points: Vec<f32>,
    /// Primitive instances, group-local
    pub instances: Vec<Instance>,
    /// Photo planes, group-local
    pub photo_quads: Vec<PhotoQuad>,
    pub active_photo: Option<usize>,
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            group: Mat4::identity(),
            progress: 0.0,
            eased: 0.0,
            tree_points: Vec::new(),
            ambient_points: Vec::new(),
            instances: Vec::new(),
            photo_quads: Vec::new(),
            active_photo: None,
        }
    }
}

pub struct TreeScene {
    controller: ProgressController,
    orientation: OrientationPolicy,
    group: SceneGroup,
    time: f32,
    foliage: Foliage,
    baubles: Baubles,
    animals: Animals,
    photos: Photos,
    topper: Topper,
    sparkles: Sparkles,
    starfield: Starfield,
    store: PhotoStore,
    picker: RayPicker,
    snapshot: FrameSnapshot,
}

impl TreeScene {
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let controller = config.progress_controller();
        let foliage = Foliage::new(&mut rng, config.foliage_count);
        let baubles = Baubles::new(&mut rng, config.baubles);
        let animals = Animals::new(&mut rng);
        let mut photos = Photos::new(&mut rng, &config.photos);
        let sparkles = Sparkles::new(&mut rng, SPARKLE_COUNT, SPARKLE_EXTENT);
        let starfield = Starfield::new(&mut rng, STAR_COUNT, STAR_RADIUS, STAR_DEPTH);

        photos.settle(crate::animation::morph_factor(controller.current()));

        log::info!(
            "Scene built: {} needles, {} baubles, {} animals, {} photos, state {:?}",
            foliage.len(),
            baubles.len(),
            animals.len(),
            photos.len(),
            controller.target()
        );

        Ok(Self {
            controller,
            orientation: OrientationPolicy::from_blend_flag(config.orientation_blend),
            group: SceneGroup::default(),
            time: 0.0,
            foliage,
            baubles,
            animals,
            photos,
            topper: Topper::new(),
            sparkles,
            starfield,
            store: PhotoStore::new(&config.photos),
            picker: RayPicker::new(PICK_RADIUS),
            snapshot: FrameSnapshot::default(),
        })
    }

    /// Advance by `dt` seconds with the camera given in world space
    pub fn tick(&mut self, dt: f32, camera: &CameraPose) -> &FrameSnapshot {
        let valid_dt = dt.is_finite() && dt > 0.0;
        let dt = if valid_dt { dt } else { 0.0 };

        self.controller.update(dt);
        self.time += dt;
        self.group.advance(dt);

        let frame = Frame::new(
            self.controller.current(),
            self.time,
            dt,
            self.group.camera_to_local(camera),
        )
        .with_orientation(self.orientation);

        self.foliage.animate(&frame);
        self.baubles.animate(&frame);
        self.animals.animate(&frame);
        self.photos.animate(&frame);
        self.topper.animate(&frame);
        self.sparkles.animate(&frame);
        self.starfield.animate(&frame);

        let snap = &mut self.snapshot;
        snap.group = self.group.matrix();
        snap.progress = frame.progress;
        snap.eased = frame.eased;

        snap.tree_points.clear();
        self.foliage.emit_points(&mut snap.tree_points);

        snap.ambient_points.clear();
        self.sparkles.emit_points(&mut snap.ambient_points);
        self.starfield.emit_points(&mut snap.ambient_points);

        snap.instances.clear();
        self.baubles.emit_instances(&mut snap.instances);
        self.animals.emit_instances(&mut snap.instances);
        self.photos.emit_instances(&mut snap.instances);
        self.topper.emit_instances(&mut snap.instances);

        snap.photo_quads.clear();
        self.photos.emit_quads(&mut snap.photo_quads);
        snap.active_photo = self.photos.focus().active();

        &self.snapshot
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    /// Pick along a world-space ray
    pub fn pick(&self, ray: &Ray) -> Option<HitInfo> {
        let local = self.group.ray_to_local(ray);
        let hitbox = TreeHitbox::for_morph(crate::animation::morph_factor(self.controller.current()));
        self.picker.pick(&local, self.photos.pick_spheres(), &hitbox)
    }

    /// Pick and dispatch a click. Returns the event that was applied.
    pub fn click(&mut self, ray: &Ray) -> Option<InteractEvent> {
        let hit = self.pick(ray);
        dispatch(self, hit.as_ref())
    }

    pub fn toggle(&mut self) -> TreeState {
        self.controller.toggle()
    }

    pub fn state(&self) -> TreeState {
        self.controller.target()
    }

    pub fn is_formed(&self) -> bool {
        self.state() == TreeState::Formed
    }

    pub fn progress(&self) -> f32 {
        self.controller.current()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn group(&self) -> &SceneGroup {
        &self.group
    }

    pub fn active_photo(&self) -> Option<usize> {
        self.photos.focus().active()
    }

    pub fn baubles(&self) -> &Baubles {
        &self.baubles
    }

    pub fn photos(&self) -> &Photos {
        &self.photos
    }

    pub fn photo_store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn photo_store_mut(&mut self) -> &mut PhotoStore {
        &mut self.store
    }
}

impl Interactive for TreeScene {
    fn interact(&mut self, event: InteractEvent) {
        match event {
            InteractEvent::Toggle => {
                self.toggle();
            }
            InteractEvent::Activate(id) => {
                self.photos.activate(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaubleCounts, PhotoEntry};
    use crate::ornaments::POINT_STRIDE;

    fn config() -> SceneConfig {
        let photos = (0..3)
            .map(|i| PhotoEntry::new(&format!("p{}", i), &format!("photos/{}.jpg", i)))
            .collect();
        SceneConfig {
            foliage_count: 500,
            baubles: BaubleCounts { balls: 20, boxes: 10, lights: 10 },
            ..SceneConfig::default()
        }
        .with_photos(photos)
        .with_seed(7)
    }

    fn scene() -> TreeScene {
        TreeScene::new(&config()).unwrap()
    }

    #[test]
    fn test_starts_formed() {
        let s = scene();
        assert!(s.is_formed());
        assert_eq!(s.progress(), 1.0);
        assert_eq!(s.active_photo(), None);
    }

    #[test]
    fn test_formed_items_sit_exactly_on_targets() {
        let mut s = scene();
        s.tick(1.0 / 60.0, &CameraPose::default());
        let baubles = s.baubles();
        for item in baubles.items() {
            assert_eq!(baubles.position(item.id), Some(item.target));
        }
    }

    #[test]
    fn test_snapshot_sizes() {
        let mut s = scene();
        let snap = s.tick(0.016, &CameraPose::default());
        assert_eq!(snap.tree_points.len(), 500 * POINT_STRIDE);
        assert_eq!(snap.ambient_points.len(), (SPARKLE_COUNT + STAR_COUNT) * POINT_STRIDE);
        assert_eq!(snap.photo_quads.len(), 3);
        assert!(!snap.instances.is_empty());
        assert_eq!(snap.progress, 1.0);
    }

    #[test]
    fn test_snapshot_buffers_reused_across_ticks() {
        let mut s = scene();
        s.tick(0.016, &CameraPose::default());
        let quads_ptr = s.snapshot().photo_quads.as_ptr();
        let points_ptr = s.snapshot().tree_points.as_ptr();
        for _ in 0..5 {
            s.tick(0.016, &CameraPose::default());
        }
        let snap = s.snapshot();
        assert_eq!(snap.photo_quads.len(), 3);
        assert_eq!(snap.photo_quads.as_ptr(), quads_ptr);
        assert_eq!(snap.tree_points.as_ptr(), points_ptr);
    }

    #[test]
    fn test_toggle_moves_progress_smoothly() {
        let mut s = scene();
        assert_eq!(s.toggle(), TreeState::Chaos);
        let p = s.tick(0.016, &CameraPose::default()).progress;
        assert!(p < 1.0 && p > 0.95, "progress jumped to {}", p);

        let mut prev = p;
        for _ in 0..300 {
            let p = s.tick(0.016, &CameraPose::default()).progress;
            assert!(p <= prev);
            prev = p;
        }
        assert!(prev < 0.01);
    }

    #[test]
    fn test_invalid_dt_changes_nothing() {
        let mut s = scene();
        s.toggle();
        s.tick(f32::NAN, &CameraPose::default());
        s.tick(-1.0, &CameraPose::default());
        assert_eq!(s.progress(), 1.0);
        assert_eq!(s.time(), 0.0);
    }

    #[test]
    fn test_group_round_trip() {
        let mut g = SceneGroup::default();
        g.advance(7.0);
        let p = Vec3::new(1.5, -3.0, 4.0);
        assert!(g.to_local(g.to_world(p)).distance(&p) < 1e-5);
        assert!(g.to_world(Vec3::ZERO).distance(&SceneGroup::OFFSET) < 1e-6);
    }

    #[test]
    fn test_click_on_tree_toggles() {
        let mut s = scene();
        let ray = Ray::new(Vec3::new(0.0, -2.0, 30.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.click(&ray), Some(InteractEvent::Toggle));
        assert_eq!(s.state(), TreeState::Chaos);
    }

    #[test]
    fn test_click_on_photo_suppresses_toggle() {
        let mut s = scene();
        s.tick(0.016, &CameraPose::default());
        let local = s.photos().position(0).unwrap();
        let outward = Vec3::new(local.x, 0.0, local.z).normalize();
        let target = s.group().to_world(local);
        let origin = s.group().to_world(local + outward.scale(10.0));
        let ray = Ray::new(origin, target - origin);

        assert_eq!(s.click(&ray), Some(InteractEvent::Activate(0)));
        assert_eq!(s.active_photo(), Some(0));
        assert!(s.is_formed());
    }

    #[test]
    fn test_click_on_nothing_is_noop() {
        let mut s = scene();
        let ray = Ray::new(Vec3::new(50.0, 40.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.click(&ray), None);
        assert!(s.is_formed());
        assert_eq!(s.active_photo(), None);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = SceneConfig { damping: 0.0, ..SceneConfig::default() };
        assert!(TreeScene::new(&bad).is_err());
    }
}
