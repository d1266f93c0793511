//! The chaos/formed state machine
//!
//! Holds the one progress scalar the whole scene morphs by. A toggle only
//! retargets; `current` then glides toward 0 or 1 by exponential damping.

use serde::Deserialize;

/// Discrete target of the morph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
    /// Dispersed sphere cloud
    Chaos,
    /// Assembled tree
    #[default]
    Formed,
}

impl TreeState {
    /// Numeric progress value this state converges to
    pub fn goal(self) -> f32 {
        match self {
            TreeState::Chaos => 0.0,
            TreeState::Formed => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TreeState::Chaos => TreeState::Formed,
            TreeState::Formed => TreeState::Chaos,
        }
    }
}

/// Process-wide progress state: a continuous value driven toward a discrete target
#[derive(Debug, Clone)]
pub struct ProgressController {
    /// Kept in f64: an f32 sum stalls a few ulps short of 1.0
    current: f64,
    target: TreeState,
    /// Damping rate (1/s); larger converges faster
    damping: f32,
}

impl ProgressController {
    /// Damping rate of the default scene
    pub const DEFAULT_DAMPING: f32 = 1.5;

    /// Start at rest in `state` (progress already equal to its goal)
    pub fn new(state: TreeState) -> Self {
        Self::with_current(state, state.goal())
    }

    /// Start with an explicit progress value, clamped to [0, 1]
    pub fn with_current(target: TreeState, current: f32) -> Self {
        Self {
            current: current.clamp(0.0, 1.0) as f64,
            target,
            damping: Self::DEFAULT_DAMPING,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Flip the target. Takes effect on the next update with no jump in `current`.
    pub fn toggle(&mut self) -> TreeState {
        self.target = self.target.toggled();
        log::debug!("tree target -> {:?} at progress {:.3}", self.target, self.current);
        self.target
    }

    /// Advance by `dt` seconds. Non-positive or non-finite steps are ignored.
    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        let k = 1.0 - (-(self.damping as f64) * dt as f64).exp();
        let goal = self.target.goal() as f64;
        self.current += (goal - self.current) * k;
    }

    pub fn current(&self) -> f32 {
        self.current as f32
    }

    pub fn target(&self) -> TreeState {
        self.target
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// True once the value is within `epsilon` of the target's goal
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.current - self.target.goal() as f64).abs() <= epsilon as f64
    }
}

impl Default for ProgressController {
    fn default() -> Self {
        Self::new(TreeState::Formed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_rest() {
        let formed = ProgressController::new(TreeState::Formed);
        assert_eq!(formed.current(), 1.0);
        let chaos = ProgressController::new(TreeState::Chaos);
        assert_eq!(chaos.current(), 0.0);
    }

    #[test]
    fn test_monotonic_convergence_without_overshoot() {
        let mut p = ProgressController::with_current(TreeState::Formed, 0.0);
        let mut prev = p.current();
        for _ in 0..2_000 {
            p.update(1.0 / 60.0);
            assert!(p.current() >= prev, "progress decreased");
            assert!(p.current() <= 1.0, "progress overshot");
            prev = p.current();
        }
        assert!(p.is_settled(1e-6));
    }

    #[test]
    fn test_settles_fully_in_both_directions() {
        let mut p = ProgressController::with_current(TreeState::Formed, 0.0);
        for _ in 0..2_000 {
            p.update(1.0 / 60.0);
        }
        assert_eq!(p.current(), 1.0);

        p.toggle();
        for _ in 0..2_000 {
            p.update(1.0 / 60.0);
        }
        assert!(p.current() < 1e-6);
        assert!(p.is_settled(1e-6));
    }

    #[test]
    fn test_never_reaches_goal_in_finite_small_steps() {
        let mut p = ProgressController::with_current(TreeState::Formed, 0.0);
        for _ in 0..60 {
            p.update(1.0 / 60.0);
        }
        assert!(p.current() > 0.0 && p.current() < 1.0);
    }

    #[test]
    fn test_toggle_mid_transition_is_continuous() {
        let mut p = ProgressController::with_current(TreeState::Formed, 0.0);
        while p.current() < 0.3 {
            p.update(1.0 / 60.0);
        }
        let at_toggle = p.current();
        assert_eq!(p.toggle(), TreeState::Chaos);
        // No jump at the moment of toggling
        assert_eq!(p.current(), at_toggle);

        p.update(1.0 / 60.0);
        let after = p.current();
        assert!(after < at_toggle, "direction should reverse");
        // One frame of damping moves only a small amount
        assert!(at_toggle - after < 0.01);
    }

    #[test]
    fn test_retarget_back_and_forth() {
        let mut p = ProgressController::new(TreeState::Formed);
        p.toggle();
        for _ in 0..30 {
            p.update(0.016);
        }
        let mid = p.current();
        p.toggle();
        p.update(0.016);
        assert!(p.current() > mid);
        assert_eq!(p.target(), TreeState::Formed);
    }

    #[test]
    fn test_frame_rate_independence() {
        let mut fast = ProgressController::with_current(TreeState::Formed, 0.0);
        let mut slow = ProgressController::with_current(TreeState::Formed, 0.0);
        for _ in 0..240 {
            fast.update(1.0 / 240.0);
        }
        for _ in 0..30 {
            slow.update(1.0 / 30.0);
        }
        assert!((fast.current() - slow.current()).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut p = ProgressController::with_current(TreeState::Formed, 0.5);
        p.update(0.0);
        p.update(-1.0);
        p.update(f32::NAN);
        p.update(f32::INFINITY);
        assert_eq!(p.current(), 0.5);
    }

    #[test]
    fn test_state_goal_and_toggle() {
        assert_eq!(TreeState::Chaos.goal(), 0.0);
        assert_eq!(TreeState::Formed.goal(), 1.0);
        assert_eq!(TreeState::Chaos.toggled(), TreeState::Formed);
    }
}
