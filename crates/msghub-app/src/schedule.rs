//! Delayed room-list refresh.

use std::time::Duration;

use tokio::time::Instant;

/// Single pending deadline for a follow-up `list` command.
///
/// The first `create` or `destroy` event arms the deadline. Further events
/// while it is armed do not move it, so a burst produces exactly one refresh
/// and a steady stream cannot postpone it forever.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    delay: Duration,
    deadline: Option<Instant>,
}

impl RefreshSchedule {
    /// Schedule that fires `delay` after being armed.
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Arm the deadline at `now + delay` unless already armed.
    ///
    /// Returns whether this call armed it.
    pub fn schedule(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a refresh is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve when the deadline passes, disarming it.
    ///
    /// Pends forever while disarmed. Cancel-safe: dropping the future before
    /// it resolves leaves the deadline armed.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
            },
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_arms_once() {
        let mut schedule = RefreshSchedule::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(schedule.schedule(start));
        assert!(!schedule.schedule(start + Duration::from_millis(100)));
        assert!(!schedule.schedule(start + Duration::from_millis(400)));
        assert_eq!(schedule.deadline(), Some(start + Duration::from_millis(500)));

        schedule.expired().await;
        assert!(!schedule.is_pending());
        assert_eq!(Instant::now(), start + Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn rearms_after_firing() {
        let mut schedule = RefreshSchedule::new(Duration::from_millis(500));
        schedule.schedule(Instant::now());
        schedule.expired().await;

        assert!(schedule.schedule(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_schedule_never_fires() {
        let mut schedule = RefreshSchedule::new(Duration::from_millis(10));
        let fired =
            tokio::time::timeout(Duration::from_secs(60), schedule.expired()).await.is_ok();
        assert!(!fired);
    }
}
