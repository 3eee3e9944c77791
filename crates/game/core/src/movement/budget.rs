//! Per-turn movement allowance.

/// Seconds of active movement left this turn.
///
/// `remaining` stays within `[0, max]` and only grows through [`reset`](Self::reset).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementBudget {
    remaining: f32,
    max: f32,
}

impl MovementBudget {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { remaining: max, max }
    }

    /// Spends `dt` seconds of movement. Negative spends are ignored.
    ///
    /// Returns the seconds actually spent, which is less than `dt` when the
    /// budget runs out mid-tick.
    pub fn consume(&mut self, dt: f32) -> f32 {
        let spent = dt.max(0.0).min(self.remaining);
        self.remaining -= spent;
        spent
    }

    pub fn reset(&mut self) {
        self.remaining = self.max;
    }

    pub fn can_move(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Remaining share of the budget in `[0, 1]`, for UI bars.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.remaining / self.max
        }
    }
}
