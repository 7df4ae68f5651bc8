//! Timed work.
//!
//! A timer ends exactly once: either it completes after its duration, or it is
//! cancelled before. Whichever happens first wins and the other becomes a
//! no-op, so a cancelled job never pays out and a finished one cannot be
//! cancelled.
use idle_core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorkTimer {
    ability_id: String,
    started_at_ms: Millis,
    duration_ms: Millis,
    status: WorkStatus,
}

impl WorkTimer {
    /// Starts a timer with `base_duration_ms` scaled by `multiplier`.
    ///
    /// Non-finite or negative multipliers count as 1.
    pub fn start(
        ability_id: impl Into<String>,
        now: Millis,
        base_duration_ms: Millis,
        multiplier: f64,
    ) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier >= 0.0 {
            multiplier
        } else {
            1.0
        };
        Self {
            ability_id: ability_id.into(),
            started_at_ms: now,
            duration_ms: (base_duration_ms as f64 * multiplier).round() as Millis,
            status: WorkStatus::Pending,
        }
    }

    pub fn ability_id(&self) -> &str {
        &self.ability_id
    }

    pub fn status(&self) -> WorkStatus {
        self.status
    }

    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    pub fn is_pending(&self) -> bool {
        self.status == WorkStatus::Pending
    }

    pub fn due_at(&self) -> Millis {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.is_pending() && now >= self.due_at()
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        self.due_at().saturating_sub(now)
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at_ms).min(self.duration_ms);
        elapsed as f64 / self.duration_ms as f64
    }

    /// Marks the timer completed if it is pending and due.
    pub fn complete(&mut self, now: Millis) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.status = WorkStatus::Completed;
        true
    }

    /// Marks the timer cancelled if it is still pending.
    pub fn cancel(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = WorkStatus::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_scaled() {
        let timer = WorkTimer::start("mine", 100, 1000, 0.5);
        assert_eq!(timer.duration_ms(), 500);
        assert_eq!(timer.due_at(), 600);
        assert_eq!(timer.remaining_ms(350), 250);
        assert!((timer.progress(350) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_multiplier_is_ignored() {
        let timer = WorkTimer::start("mine", 0, 1000, f64::NAN);
        assert_eq!(timer.duration_ms(), 1000);
    }

    #[test]
    fn completes_only_when_due() {
        let mut timer = WorkTimer::start("mine", 0, 1000, 1.0);
        assert!(!timer.complete(999));
        assert!(timer.is_pending());
        assert!(timer.complete(1000));
        assert_eq!(timer.status(), WorkStatus::Completed);
    }

    #[test]
    fn cancel_after_complete_is_noop() {
        let mut timer = WorkTimer::start("mine", 0, 10, 1.0);
        assert!(timer.complete(10));
        assert!(!timer.cancel());
        assert_eq!(timer.status(), WorkStatus::Completed);
    }

    #[test]
    fn complete_after_cancel_is_noop() {
        let mut timer = WorkTimer::start("mine", 0, 10, 1.0);
        assert!(timer.cancel());
        assert!(!timer.complete(50));
        assert_eq!(timer.status(), WorkStatus::Cancelled);
    }
}
