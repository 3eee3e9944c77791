//! Per-turn countdown.
//!
//! The timer is advisory: expiry is reported, never enforced. Whoever owns the
//! turn policy decides what a timeout means.

/// Result of advancing the timer by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTick {
    /// Timer is not running.
    Idle,
    /// Still counting down.
    Running { remaining: f32 },
    /// Reached zero on this tick. Reported once per run.
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnTimer {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl TurnTimer {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// Refills the countdown and starts it.
    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, dt: f32) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }

        self.remaining = (self.remaining - dt).clamp(0.0, self.duration);
        if self.remaining <= 0.0 {
            self.running = false;
            return TimerTick::Expired;
        }
        TimerTick::Running {
            remaining: self.remaining,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        !self.running && self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = TurnTimer::new(1.0);
        timer.restart();

        assert_eq!(timer.tick(0.25), TimerTick::Running { remaining: 0.75 });
        assert_eq!(timer.tick(0.5), TimerTick::Running { remaining: 0.25 });
        assert_eq!(timer.tick(0.5), TimerTick::Expired);
        assert_eq!(timer.tick(0.5), TimerTick::Idle);
        assert_eq!(timer.remaining(), 0.0);
        assert!(timer.is_expired());
    }

    #[test]
    fn idle_until_restarted() {
        let mut timer = TurnTimer::new(2.0);
        assert_eq!(timer.tick(1.0), TimerTick::Idle);
        assert_eq!(timer.remaining(), 2.0);

        timer.restart();
        timer.tick(1.5);
        timer.restart();
        assert_eq!(timer.remaining(), 2.0);
    }

    #[test]
    fn stop_freezes_remaining() {
        let mut timer = TurnTimer::new(2.0);
        timer.restart();
        timer.tick(0.5);
        timer.stop();

        assert_eq!(timer.tick(1.0), TimerTick::Idle);
        assert_eq!(timer.remaining(), 1.5);
        assert!(!timer.is_expired());
    }
}
