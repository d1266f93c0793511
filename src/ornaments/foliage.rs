use rand::Rng;
use crate::distribution::{uniform_cone_point, uniform_sphere_point, ConeParams};
use crate::math::Vec3;
use super::{push_point, Frame, OrnamentItem, Population, POINT_STRIDE};

/// Deep emerald
const GREEN_DARK: u32 = 0x004225;
/// Forest green
const GREEN_LIGHT: u32 = 0x0B6623;
const GOLD: u32 = 0xFFD700;

/// Share of needles rendered as gold glitter
const GLITTER_FRACTION: f32 = 0.1;
const WIND_AMPLITUDE: f32 = 0.05;
const CHAOS_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Needle {
    pub size: f32,
    pub glitter: bool,
    pub phase: f32,
}

/// The particle cloud that forms the body of the tree
pub struct Foliage {
    needles: Vec<OrnamentItem<Needle>>,
    positions: Vec<Vec3>,
    time: f32,
    dark: Vec3,
    light: Vec3,
    gold: Vec3,
}

impl Foliage {
    pub fn cone() -> ConeParams {
        ConeParams::new(12.0, 4.5).with_offset(-4.0).with_cutoff(0.08)
    }

    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let cone = Self::cone();
        let needles: Vec<_> = (0..count)
            .map(|id| {
                let target = uniform_cone_point(rng, &cone);
                let chaos = uniform_sphere_point(rng, CHAOS_RADIUS);
                let needle = Needle {
                    size: rng.gen_range(0.1..0.5),
                    glitter: rng.gen::<f32>() < GLITTER_FRACTION,
                    phase: rng.gen_range(0.0..std::f32::consts::TAU),
                };
                OrnamentItem::new(id, chaos, target, needle)
            })
            .collect();

        let positions = needles.iter().map(|n| n.target).collect();

        Self {
            needles,
            positions,
            time: 0.0,
            dark: Vec3::from_hex(GREEN_DARK),
            light: Vec3::from_hex(GREEN_LIGHT),
            gold: Vec3::from_hex(GOLD).scale(1.5),
        }
    }

    pub fn items(&self) -> &[OrnamentItem<Needle>] {
        &self.needles
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn color(&self, needle: &Needle, position: Vec3) -> Vec3 {
        if needle.glitter {
            self.gold
        } else {
            let t = (position.y + self.time).sin();
            self.dark.lerp(&self.light, t).clamp01()
        }
    }
}

impl Population for Foliage {
    fn animate(&mut self, frame: &Frame) {
        self.time = frame.time;
        let settled = frame.settled();

        for (needle, pos) in self.needles.iter().zip(self.positions.iter_mut()) {
            let mut p = needle.resolve(frame.eased);
            if settled {
                p.x += (frame.time * 2.0 + p.y * 0.5 + needle.attrs.phase).sin() * WIND_AMPLITUDE;
            }
            *pos = p;
        }
    }

    fn emit_points(&self, out: &mut Vec<f32>) {
        out.reserve(self.needles.len() * POINT_STRIDE);
        for (needle, &pos) in self.needles.iter().zip(self.positions.iter()) {
            let color = self.color(&needle.attrs, pos);
            push_point(out, pos, needle.attrs.size, 1.0, color);
        }
    }

    fn len(&self) -> usize {
        self.needles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::CameraPose;
    use rand::{rngs::StdRng, SeedableRng};

    fn foliage(count: usize) -> Foliage {
        let mut rng = StdRng::seed_from_u64(1);
        Foliage::new(&mut rng, count)
    }

    #[test]
    fn test_needle_attributes() {
        let f = foliage(2_000);
        assert_eq!(f.len(), 2_000);
        let glitter = f.items().iter().filter(|n| n.attrs.glitter).count();
        // Roughly one in ten
        assert!(glitter > 120 && glitter < 280, "glitter count {}", glitter);
        for n in f.items() {
            assert!(n.attrs.size >= 0.1 && n.attrs.size < 0.5);
            assert!(n.chaos.length() <= CHAOS_RADIUS * 1.0001);
        }
    }

    #[test]
    fn test_chaos_frame_places_needles_on_sphere_points() {
        let mut f = foliage(100);
        f.animate(&Frame::new(0.0, 3.0, 0.016, CameraPose::default()));
        for (n, p) in f.items().iter().zip(f.positions()) {
            assert_eq!(*p, n.chaos);
        }
    }

    #[test]
    fn test_wind_only_when_settled() {
        let mut f = foliage(50);
        f.animate(&Frame::new(0.7, 1.3, 0.016, CameraPose::default()));
        let eased = Frame::new(0.7, 0.0, 0.0, CameraPose::default()).eased;
        for (n, p) in f.items().iter().zip(f.positions()) {
            assert_eq!(*p, n.resolve(eased));
        }

        f.animate(&Frame::new(1.0, 1.3, 0.016, CameraPose::default()));
        for (n, p) in f.items().iter().zip(f.positions()) {
            assert!((p.x - n.target.x).abs() <= WIND_AMPLITUDE + 1e-5);
            assert_eq!(p.y, n.target.y);
            assert_eq!(p.z, n.target.z);
        }
    }

    #[test]
    fn test_wind_phase_differs_per_needle() {
        let mut f = foliage(50);
        // A pair whose phases sit well apart on the circle
        let j = (1..50)
            .find(|&j| {
                let d = (f.needles[j].attrs.phase - f.needles[0].attrs.phase).abs();
                d > 1.0 && d < std::f32::consts::TAU - 1.0
            })
            .unwrap();
        // Same spot on the tree, so only the phase tells them apart
        f.needles[j].target = f.needles[0].target;

        let mut max_gap: f32 = 0.0;
        for step in 0..40 {
            f.animate(&Frame::new(1.0, step as f32 * 0.2, 0.016, CameraPose::default()));
            max_gap = max_gap.max((f.positions()[0].x - f.positions()[j].x).abs());
        }
        assert!(max_gap > 0.02, "needles sway in lock-step");
    }

    #[test]
    fn test_point_data_format() {
        let mut f = foliage(64);
        f.animate(&Frame::new(1.0, 0.5, 0.016, CameraPose::default()));
        let mut data = Vec::new();
        f.emit_points(&mut data);
        assert_eq!(data.len(), 64 * POINT_STRIDE);
        for chunk in data.chunks(POINT_STRIDE) {
            // Green channels stay in range, glitter is boosted gold
            assert!(chunk[5] >= 0.0 && chunk[6] >= 0.0 && chunk[7] >= 0.0);
            assert_eq!(chunk[4], 1.0);
        }
    }
}
