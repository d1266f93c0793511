//! Point-distribution generators for the two shapes every population morphs between
//!
//! Both samplers are pure given the random source and never fail.

use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec3;

/// Sample a point uniformly by volume inside a sphere of `radius` centred at the origin.
///
/// The polar angle comes from the inverse CDF of its cosine and the radius from the
/// cube root of a uniform variate, so samples do not cluster at the centre.
pub fn uniform_sphere_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let w: f32 = rng.gen();

    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let r = w.cbrt() * radius;
    let sin_phi = phi.sin();

    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Shape of the cone/frustum shell the formed tree is sampled from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeParams {
    /// Full (uncut) cone height
    pub height: f32,
    /// Radius at the base
    pub base_radius: f32,
    /// Vertical offset of the base
    pub y_offset: f32,
    /// Fraction of the height removed at the apex (0 keeps the tip)
    pub top_cutoff: f32,
}

impl ConeParams {
    /// Lower bound of the radial thickness factor
    pub const VARIANCE_MIN: f32 = 0.8;
    /// Upper bound of the radial thickness factor
    pub const VARIANCE_MAX: f32 = 1.2;

    pub fn new(height: f32, base_radius: f32) -> Self {
        Self {
            height,
            base_radius,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, y_offset: f32) -> Self {
        self.y_offset = y_offset;
        self
    }

    pub fn with_cutoff(mut self, top_cutoff: f32) -> Self {
        self.top_cutoff = top_cutoff;
        self
    }

    /// Highest sampled height above the base
    pub fn max_height(&self) -> f32 {
        self.height * (1.0 - self.top_cutoff)
    }

    /// Taper radius of the ideal cone at height `h` above the base
    pub fn radius_at(&self, h: f32) -> f32 {
        self.base_radius * (1.0 - h / self.height)
    }
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            height: 12.0,
            base_radius: 4.0,
            y_offset: -2.0,
            top_cutoff: 0.05,
        }
    }
}

/// Sample a point in a finite-thickness shell around a cone surface.
///
/// Height is uniform over `[0, height * (1 - top_cutoff))` so the zero-radius apex is
/// never produced; the tapered radius is scaled by a factor in `[0.8, 1.2)`.
pub fn uniform_cone_point<R: Rng + ?Sized>(rng: &mut R, cone: &ConeParams) -> Vec3 {
    let h = rng.gen::<f32>() * cone.max_height();
    let r = cone.radius_at(h);
    let theta = rng.gen::<f32>() * TAU;
    let variance = rng.gen_range(ConeParams::VARIANCE_MIN..ConeParams::VARIANCE_MAX);

    Vec3::new(
        r * theta.cos() * variance,
        h + cone.y_offset,
        r * theta.sin() * variance,
    )
}

/// Push a point away from the vertical axis by `distance`, keeping its height
pub fn push_outward(point: Vec3, distance: f32) -> Vec3 {
    point + point.horizontal().normalize().scale(distance)
}
