use std::time::Duration;

/// Exponential retry delay for an unavailable stream source.
///
/// Unlike a bounded retry policy this never gives up: the source is expected
/// to come back (e.g. the producer has not created its file yet).
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    current_attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max.max(initial),
            current_attempt: 0,
        }
    }

    /// Delay for the next attempt; advances the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.saturating_pow(self.current_attempt.min(31));
        let delay = self
            .initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay));
        self.current_attempt = self.current_attempt.saturating_add(1);

        log::warn!(
            "⏳ Retry attempt {} in {:.1}s",
            self.current_attempt,
            delay.as_secs_f64()
        );
        delay
    }

    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }

    pub fn reset(&mut self) {
        if self.current_attempt > 0 {
            log::info!("✅ Stream recovered after {} retries", self.current_attempt);
        }
        self.current_attempt = 0;
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}
