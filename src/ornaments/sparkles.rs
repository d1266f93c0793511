//! Ambient sparkles and the background starfield
//!
//! Both live in world space outside the tree group and ignore the morph progress.

use std::f32::consts::TAU;
use rand::Rng;
use crate::distribution::uniform_sphere_point;
use crate::math::{lerp, Vec3};
use super::{push_point, Frame, Population, POINT_STRIDE};

const SPARKLE_COLOR: u32 = 0xFFD700;
const SPARKLE_OPACITY: f32 = 0.6;
const SPARKLE_SIZE: f32 = 3.0;
const SPARKLE_SPEED: f32 = 0.4;

#[derive(Debug, Clone)]
struct Sparkle {
    home: Vec3,
    position: Vec3,
    phase: f32,
    alpha: f32,
}

/// Gold motes drifting through a cube around the tree
pub struct Sparkles {
    sparkles: Vec<Sparkle>,
    half_extent: f32,
    color: Vec3,
}

impl Sparkles {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, extent: f32) -> Self {
        let half_extent = extent * 0.5;
        let sparkles = (0..count)
            .map(|_| {
                let home = Vec3::new(
                    rng.gen_range(-half_extent..half_extent),
                    rng.gen_range(-half_extent..half_extent),
                    rng.gen_range(-half_extent..half_extent),
                );
                Sparkle {
                    home,
                    position: home,
                    phase: rng.gen_range(0.0..TAU),
                    alpha: 0.0,
                }
            })
            .collect();

        Self {
            sparkles,
            half_extent,
            color: Vec3::from_hex(SPARKLE_COLOR),
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.sparkles.iter().map(|s| s.position)
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }
}

impl Population for Sparkles {
    fn animate(&mut self, frame: &Frame) {
        let t = frame.time * SPARKLE_SPEED;
        let h = self.half_extent;
        for s in &mut self.sparkles {
            let drift = Vec3::new(
                smooth_noise(s.home.x * 0.2, t + s.phase),
                smooth_noise(s.home.y * 0.2, t + s.phase + 100.0),
                smooth_noise(s.home.z * 0.2, t + s.phase + 200.0),
            );
            let p = s.home + drift;
            s.position = Vec3::new(p.x.clamp(-h, h), p.y.clamp(-h, h), p.z.clamp(-h, h));

            let flicker = (frame.time * 2.0 + s.phase).sin() * 0.5 + 0.5;
            s.alpha = SPARKLE_OPACITY * flicker;
        }
    }

    fn emit_points(&self, out: &mut Vec<f32>) {
        out.reserve(self.sparkles.len() * POINT_STRIDE);
        for s in &self.sparkles {
            push_point(out, s.position, SPARKLE_SIZE, s.alpha, self.color);
        }
    }

    fn len(&self) -> usize {
        self.sparkles.len()
    }
}

#[derive(Debug, Clone)]
struct Star {
    position: Vec3,
    size: f32,
    phase: f32,
    brightness: f32,
}

/// Distant twinkling stars in a spherical shell
pub struct Starfield {
    stars: Vec<Star>,
    alphas: Vec<f32>,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, radius: f32, depth: f32) -> Self {
        let stars: Vec<_> = (0..count)
            .map(|_| {
                let dir = uniform_sphere_point(rng, 1.0).normalize();
                let dir = if dir.length_squared() > 0.0 { dir } else { Vec3::UP };
                let distance = radius + rng.gen::<f32>() * depth;
                Star {
                    position: dir.scale(distance),
                    size: rng.gen_range(0.5..2.0),
                    phase: rng.gen_range(0.0..TAU),
                    brightness: rng.gen_range(0.4..1.0),
                }
            })
            .collect();
        let alphas = stars.iter().map(|s| s.brightness).collect();

        Self { stars, alphas }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.stars.iter().map(|s| s.position)
    }
}

impl Population for Starfield {
    fn animate(&mut self, frame: &Frame) {
        for (star, alpha) in self.stars.iter().zip(self.alphas.iter_mut()) {
            let twinkle = (frame.time + star.phase).sin() * 0.25 + 0.75;
            *alpha = star.brightness * twinkle;
        }
    }

    fn emit_points(&self, out: &mut Vec<f32>) {
        out.reserve(self.stars.len() * POINT_STRIDE);
        for (star, &alpha) in self.stars.iter().zip(self.alphas.iter()) {
            // Desaturated white
            push_point(out, star.position, star.size, alpha, Vec3::ONE);
        }
    }

    fn len(&self) -> usize {
        self.stars.len()
    }
}

/// Smooth value noise in [-1, 1]
fn smooth_noise(x: f32, y: f32) -> f32 {
    let x = x + y * 0.5;
    let y = y + x * 0.3;

    let (x0, y0) = (x.floor(), y.floor());
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as i32, y0 as i32);

    let h00 = hash2d(ix, iy);
    let h10 = hash2d(ix + 1, iy);
    let h01 = hash2d(ix, iy + 1);
    let h11 = hash2d(ix + 1, iy + 1);

    let u = fx * fx * (3.0 - 2.0 * fx);
    let v = fy * fy * (3.0 - 2.0 * fy);

    let a = lerp(h00, h10, u);
    let b = lerp(h01, h11, u);

    lerp(a, b, v) * 2.0 - 1.0
}

fn hash2d(x: i32, y: i32) -> f32 {
    let n = x.wrapping_mul(374761393).wrapping_add(y.wrapping_mul(668265263));
    let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    (n as u32 as f32) / (u32::MAX as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::CameraPose;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_noise_range() {
        for i in 0..1000 {
            let x = i as f32 * 0.37 - 150.0;
            let y = i as f32 * 0.07 - 20.0;
            let n = smooth_noise(x, y);
            assert!((-1.0..=1.0).contains(&n), "noise {} out of range", n);
        }
    }

    #[test]
    fn test_sparkles_stay_in_box() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sparkles = Sparkles::new(&mut rng, 300, 25.0);
        for i in 0..50 {
            sparkles.animate(&Frame::new(0.0, i as f32 * 0.5, 0.5, CameraPose::default()));
            for p in sparkles.positions() {
                let h = sparkles.half_extent();
                assert!(p.x.abs() <= h && p.y.abs() <= h && p.z.abs() <= h);
            }
        }
    }

    #[test]
    fn test_sparkle_alpha_bounded() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sparkles = Sparkles::new(&mut rng, 50, 25.0);
        sparkles.animate(&Frame::new(1.0, 3.3, 0.016, CameraPose::default()));
        let mut data = Vec::new();
        sparkles.emit_points(&mut data);
        assert_eq!(data.len(), 50 * POINT_STRIDE);
        for chunk in data.chunks(POINT_STRIDE) {
            assert!(chunk[4] >= 0.0 && chunk[4] <= SPARKLE_OPACITY + 1e-6);
        }
    }

    #[test]
    fn test_stars_in_shell() {
        let mut rng = StdRng::seed_from_u64(8);
        let stars = Starfield::new(&mut rng, 5_000, 100.0, 50.0);
        assert_eq!(stars.len(), 5_000);
        for p in stars.positions() {
            let d = p.length();
            assert!(d >= 100.0 - 1e-2 && d <= 150.0 + 1e-2, "star at {}", d);
        }
    }
}
