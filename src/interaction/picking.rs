use crate::math::{Mat4, Vec3};

/// A ray with unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray through a canvas pixel, leaving the camera
    pub fn from_screen(
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        view: &Mat4,
        projection: &Mat4,
        camera_pos: Vec3,
    ) -> Self {
        // Convert screen to normalized device coordinates
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height);

        let inv_proj = invert_perspective(projection);
        let inv_view = invert_view(view);

        // To view space
        let ray_view = inv_proj.transform_point(Vec3::new(ndc_x, ndc_y, -1.0));
        let ray_view = Vec3::new(ray_view.x, ray_view.y, -1.0);

        // To world space
        let ray_world = inv_view.transform_direction(ray_view);

        Self::new(camera_pos, ray_world)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction.scale(t)
    }
}

/// Nearest positive ray parameter hitting a sphere
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);

    if t > 0.0 {
        Some(t)
    } else {
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
        if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// Nearest positive ray parameter hitting a capped vertical cylinder centred at `center`
pub fn ray_cylinder(ray: &Ray, center: Vec3, radius: f32, height: f32) -> Option<f32> {
    let o = ray.origin - center;
    let d = ray.direction;
    let half = height * 0.5;
    let inside_slab = |t: f32| (o.y + d.y * t).abs() <= half;

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t > 0.0 && best.map_or(true, |b| t < b) {
            best = Some(t);
        }
    };

    // Side wall
    let a = d.x * d.x + d.z * d.z;
    if a > 1e-12 {
        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let c = o.x * o.x + o.z * o.z - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                if inside_slab(t) {
                    consider(t);
                }
            }
        }
    }

    // Caps
    if d.y.abs() > 1e-12 {
        for cap in [-half, half] {
            let t = (cap - o.y) / d.y;
            let x = o.x + d.x * t;
            let z = o.z + d.z * t;
            if x * x + z * z <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickTarget {
    Photo(usize),
    Tree,
}

/// Result of a pick with its distance along the ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub target: PickTarget,
    pub distance: f32,
    pub hit_point: Vec3,
}

/// Invisible click volume around the tree, in the tree group's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeHitbox {
    pub radius: f32,
    pub height: f32,
    /// Extra sphere covering the dispersed cloud; zero when fully formed
    pub cloud_radius: f32,
}

impl TreeHitbox {
    pub const RADIUS: f32 = 5.0;
    pub const HEIGHT: f32 = 14.0;
    pub const CLOUD_RADIUS: f32 = 18.0;

    /// Hitbox for an eased morph factor
    pub fn for_morph(eased: f32) -> Self {
        Self {
            radius: Self::RADIUS,
            height: Self::HEIGHT,
            cloud_radius: Self::CLOUD_RADIUS * (1.0 - eased.clamp(0.0, 1.0)),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let cylinder = ray_cylinder(ray, Vec3::ZERO, self.radius, self.height);
        let cloud = ray_sphere(ray, Vec3::ZERO, self.cloud_radius);
        match (cylinder, cloud) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Ray-based picking against photos and the tree hitbox.
///
/// Photos are tested first and win over the tree, so a photo click never
/// toggles the tree.
#[derive(Debug, Clone, Copy)]
pub struct RayPicker {
    pub photo_radius: f32,
}

impl RayPicker {
    pub fn new(photo_radius: f32) -> Self {
        Self { photo_radius }
    }

    /// `ray` must already be in the same space as the photos and hitbox
    pub fn pick(
        &self,
        ray: &Ray,
        photos: impl IntoIterator<Item = (usize, Vec3)>,
        hitbox: &TreeHitbox,
    ) -> Option<HitInfo> {
        let mut closest: Option<HitInfo> = None;

        for (id, center) in photos {
            if let Some(dist) = ray_sphere(ray, center, self.photo_radius) {
                if closest.map_or(true, |c| dist < c.distance) {
                    closest = Some(HitInfo {
                        target: PickTarget::Photo(id),
                        distance: dist,
                        hit_point: ray.at(dist),
                    });
                }
            }
        }

        if closest.is_some() {
            return closest;
        }

        hitbox.intersect(ray).map(|dist| HitInfo {
            target: PickTarget::Tree,
            distance: dist,
            hit_point: ray.at(dist),
        })
    }
}

/// Approximate inverse of a perspective matrix
fn invert_perspective(m: &Mat4) -> Mat4 {
    // For a standard perspective matrix, we can compute inverse directly
    let a = m.data[0];
    let b = m.data[5];
    let c = m.data[10];
    let d = m.data[14];
    let e = m.data[11];

    let mut inv = Mat4::identity();
    inv.data[0] = 1.0 / a;
    inv.data[5] = 1.0 / b;
    inv.data[10] = 0.0;
    inv.data[11] = 1.0 / d;
    inv.data[14] = 1.0 / e;
    inv.data[15] = -c / (d * e);

    inv
}

/// Inverse of a rigid view matrix: transposed rotation and rotated, negated translation
fn invert_view(m: &Mat4) -> Mat4 {
    let mut inv = Mat4::identity();

    for row in 0..3 {
        for col in 0..3 {
            inv.data[col * 4 + row] = m.data[row * 4 + col];
        }
    }

    let t = Vec3::new(m.data[12], m.data[13], m.data[14]);
    inv.data[12] = -(inv.data[0] * t.x + inv.data[4] * t.y + inv.data[8] * t.z);
    inv.data[13] = -(inv.data[1] * t.x + inv.data[5] * t.y + inv.data[9] * t.z);
    inv.data[14] = -(inv.data[2] * t.x + inv.data[6] * t.y + inv.data[10] * t.z);

    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 30.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_ray_sphere_hit() {
        let dist = ray_sphere(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0)), Vec3::ZERO, 1.0);
        assert!((dist.unwrap() - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray_sphere(&away, Vec3::ZERO, 1.0).is_none());
        let aside = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_sphere(&aside, Vec3::ZERO, 1.0).is_none());
        assert!(ray_sphere(&down_z(0.0, 0.0), Vec3::ZERO, 0.0).is_none());
    }

    #[test]
    fn test_ray_cylinder_side_and_caps() {
        // Side wall at z = 5
        let side = ray_cylinder(&down_z(0.0, 0.0), Vec3::ZERO, 5.0, 14.0).unwrap();
        assert!((side - 25.0).abs() < 1e-4);
        // Above the top cap misses
        assert!(ray_cylinder(&down_z(0.0, 7.5), Vec3::ZERO, 5.0, 14.0).is_none());
        // Straight down onto the top cap
        let down = Ray::new(Vec3::new(1.0, 20.0, 1.0), Vec3::new(0.0, -1.0, 0.0));
        let top = ray_cylinder(&down, Vec3::ZERO, 5.0, 14.0).unwrap();
        assert!((top - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_hitbox_cloud_only_while_dispersed() {
        let ray = down_z(10.0, 0.0);
        assert!(TreeHitbox::for_morph(1.0).intersect(&ray).is_none());
        assert!(TreeHitbox::for_morph(0.0).intersect(&ray).is_some());
    }

    #[test]
    fn test_photo_wins_over_tree() {
        let picker = RayPicker::new(0.9);
        let hitbox = TreeHitbox::for_morph(1.0);
        let ray = down_z(0.0, 1.0);

        let hit = picker.pick(&ray, vec![(3, Vec3::new(0.0, 1.0, 5.5))], &hitbox).unwrap();
        assert_eq!(hit.target, PickTarget::Photo(3));

        // Even a photo behind the hitbox wall takes priority
        let hit = picker.pick(&ray, vec![(1, Vec3::new(0.0, 1.0, -2.0))], &hitbox).unwrap();
        assert_eq!(hit.target, PickTarget::Photo(1));
    }

    #[test]
    fn test_closest_photo_wins() {
        let picker = RayPicker::new(0.9);
        let hitbox = TreeHitbox::for_morph(1.0);
        let photos = vec![(0, Vec3::new(0.0, 0.0, 2.0)), (1, Vec3::new(0.0, 0.0, 6.0))];
        let hit = picker.pick(&down_z(0.0, 0.0), photos, &hitbox).unwrap();
        assert_eq!(hit.target, PickTarget::Photo(1));
    }

    #[test]
    fn test_tree_and_empty_space() {
        let picker = RayPicker::new(0.9);
        let hitbox = TreeHitbox::for_morph(1.0);
        let hit = picker.pick(&down_z(0.0, 0.0), Vec::new(), &hitbox).unwrap();
        assert_eq!(hit.target, PickTarget::Tree);
        assert!(picker.pick(&down_z(20.0, 0.0), Vec::new(), &hitbox).is_none());
    }

    #[test]
    fn test_screen_center_ray_follows_view_direction() {
        let eye = Vec3::new(0.0, 4.0, 20.0);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::UP);
        let projection = Mat4::perspective(45f32.to_radians(), 1.5, 0.1, 200.0);
        let ray = Ray::from_screen(300.0, 200.0, 600.0, 400.0, &view, &projection, eye);
        let expected = (Vec3::ZERO - eye).normalize();
        assert!(ray.direction.dot(&expected) > 0.9999, "{:?}", ray.direction);
        assert_eq!(ray.origin, eye);
    }
}
