pub mod vec3;
pub mod quat;
pub mod matrix;

pub use vec3::Vec3;
pub use quat::Quat;
pub use matrix::Mat4;

/// Scalar linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `lambda` is the rate in 1/time-units. For `dt > 0` the result always lies
/// between `current` and `target`, so repeated application never overshoots.
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    lerp(current, target, 1.0 - (-lambda * dt).exp())
}

/// [`damp`] applied per axis
pub fn damp_vec3(current: Vec3, target: Vec3, lambda: f32, dt: f32) -> Vec3 {
    Vec3::new(
        damp(current.x, target.x, lambda, dt),
        damp(current.y, target.y, lambda, dt),
        damp(current.z, target.z, lambda, dt),
    )
}
