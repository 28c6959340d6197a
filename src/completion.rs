//! One-shot completion latch.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Threshold not reached yet.
    #[default]
    Running,
    /// Threshold reached; the delayed notification is pending.
    Completing,
    /// Notification delivered. Terminal.
    Completed,
}

/// Tracks whether the reveal has finished. The transition out of `Running`
/// happens at most once per session, however many frames keep meeting the
/// threshold afterwards.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    phase: Phase,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feed one frame's arrival count. Returns `true` exactly once, on the frame
    /// the notification should be scheduled.
    pub fn observe(&mut self, arrived: usize, total: usize, ratio: f32) -> bool {
        if self.phase != Phase::Running || !threshold_met(arrived, total, ratio) {
            return false;
        }
        self.phase = Phase::Completing;
        log::info!("reveal threshold reached: {}/{} agents arrived", arrived, total);
        true
    }

    /// The delayed notification is due. Returns `true` if it should be delivered.
    pub fn fire(&mut self) -> bool {
        if self.phase != Phase::Completing {
            return false;
        }
        self.phase = Phase::Completed;
        true
    }
}

/// `arrived / total >= ratio` for a non-empty pool.
pub fn threshold_met(arrived: usize, total: usize, ratio: f32) -> bool {
    total > 0 && arrived as f64 >= f64::from(ratio) * total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_never_completes() {
        let mut c = Completion::new();
        assert!(!c.observe(0, 0, 1.0));
        assert_eq!(c.phase(), Phase::Running);
    }

    #[test]
    fn schedules_once_then_fires_once() {
        let mut c = Completion::new();
        assert!(!c.observe(9, 10, 1.0));
        assert!(!c.fire());
        assert!(c.observe(10, 10, 1.0));
        for _ in 0..50 {
            assert!(!c.observe(10, 10, 1.0));
        }
        assert_eq!(c.phase(), Phase::Completing);
        assert!(c.fire());
        assert!(!c.fire());
        assert!(!c.observe(10, 10, 1.0));
        assert_eq!(c.phase(), Phase::Completed);
    }

    #[test]
    fn partial_threshold() {
        assert!(threshold_met(95, 100, 0.95));
        assert!(!threshold_met(94, 100, 0.95));
        assert!(threshold_met(19, 20, 0.95));
    }
}
