//! Easing functions for the chaos/formed morph

/// Easing function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Slow start, accelerate
    EaseIn,
    /// Fast start, decelerate
    EaseOut,
    /// Cubic deceleration, the morph curve
    #[default]
    EaseOutCubic,
    /// Smooth ease-in-out
    EaseInOut,
}

/// The single curve every population applies to the shared progress value.
///
/// Tuning this changes the "snappiness" of all populations at once.
pub const MORPH_EASING: Easing = Easing::EaseOutCubic;

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
    }
}

/// Shorthand for `ease(progress, MORPH_EASING)`
pub fn morph_factor(progress: f32) -> f32 {
    ease(progress, MORPH_EASING)
}
