use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Global spacing between outbound requests, shared by every probe of a run.
///
/// Each caller reserves the next free slot under the lock and sleeps outside it,
/// so concurrent probes queue up one interval apart.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// A pacer allowing `rate` requests per second. Zero or negative disables pacing.
    pub fn per_second(rate: f64) -> Self {
        if rate > 0.0 && rate.is_finite() {
            Self::new(Duration::from_secs_f64(1.0 / rate))
        } else {
            Self::new(Duration::ZERO)
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
