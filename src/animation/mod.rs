//! Animation module: the progress state machine and the shared easing curve
//!
//! One `ProgressController` owns the morph value; animators read it once per
//! tick through a `Frame` and never write it.

mod easing;
mod progress;

pub use easing::{ease, morph_factor, Easing, MORPH_EASING};
pub use progress::{ProgressController, TreeState};
