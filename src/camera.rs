use crate::math::Vec3;
use crate::ornaments::CameraPose;

/// Orbit camera around a fixed target, no panning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    /// Angle from +Y
    polar: f32,
    /// Angle around +Y, zero looking down -Z
    azimuth: f32,
}

impl OrbitCamera {
    pub const MIN_POLAR: f32 = std::f32::consts::PI / 4.0;
    pub const MAX_POLAR: f32 = std::f32::consts::PI / 1.8;
    pub const MIN_DISTANCE: f32 = 10.0;
    pub const MAX_DISTANCE: f32 = 35.0;
    /// Radians per pixel of drag
    pub const ROTATE_SPEED: f32 = 0.01;
    pub const ZOOM_SPEED: f32 = 0.5;

    /// Camera at `position` looking at `target`, clamped into the orbit limits
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        let (polar, azimuth) = if distance > 0.0 {
            ((offset.y / distance).clamp(-1.0, 1.0).acos(), offset.x.atan2(offset.z))
        } else {
            (std::f32::consts::FRAC_PI_2, 0.0)
        };

        Self {
            target,
            distance: distance.clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE),
            polar: polar.clamp(Self::MIN_POLAR, Self::MAX_POLAR),
            azimuth,
        }
    }

    /// Drag by a pixel delta
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth -= delta_x * Self::ROTATE_SPEED;
        self.polar = (self.polar - delta_y * Self::ROTATE_SPEED).clamp(Self::MIN_POLAR, Self::MAX_POLAR);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * Self::ZOOM_SPEED).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn position(&self) -> Vec3 {
        let sin_p = self.polar.sin();
        self.target
            + Vec3::new(
                sin_p * self.azimuth.sin(),
                self.polar.cos(),
                sin_p * self.azimuth.cos(),
            )
            .scale(self.distance)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::looking_at(self.position(), self.target)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 4.0, 20.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let cam = OrbitCamera::default();
        assert!(cam.position().distance(&Vec3::new(0.0, 4.0, 20.0)) < 1e-4);
    }

    #[test]
    fn test_polar_limits() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 10_000.0);
        assert_eq!(cam.polar(), OrbitCamera::MIN_POLAR);
        cam.orbit(0.0, -10_000.0);
        assert_eq!(cam.polar(), OrbitCamera::MAX_POLAR);
        // Never dips far below the horizon
        assert!(cam.position().y > -0.2 * cam.distance());
    }

    #[test]
    fn test_zoom_limits() {
        let mut cam = OrbitCamera::default();
        cam.zoom(-1_000.0);
        assert_eq!(cam.distance(), OrbitCamera::MIN_DISTANCE);
        cam.zoom(1_000.0);
        assert_eq!(cam.distance(), OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn test_horizontal_orbit_keeps_distance() {
        let mut cam = OrbitCamera::default();
        let before = cam.position().distance(&cam.target);
        cam.orbit(157.0, 0.0);
        assert!((cam.position().distance(&cam.target) - before).abs() < 1e-4);
        assert!(cam.position().x.abs() > 1.0);
    }
}
