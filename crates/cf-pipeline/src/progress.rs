//! # Progress simulation
//!
//! A timer-driven stand-in for real transfer/analysis progress. Each
//! simulation is a spawned task that ticks on a fixed interval, advances by
//! a random increment, and publishes the new value on a channel. The stream
//! ends once 100 is reached; values never decrease.
//!
//! Dropping the `ProgressStream` (or calling `cancel`) stops the task.

use std::fmt;
use std::time::Duration;

use cf_core::error::{AppError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Processing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::Processing => f.write_str("processing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub phase: Phase,
    /// 0.0..=100.0
    pub percent: f64,
}

/// Tick interval and the range each tick advances by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressProfile {
    interval: Duration,
    min_increment: f64,
    max_increment: f64,
}

impl ProgressProfile {
    /// 200ms steps of up to 15%.
    pub const UPLOAD: ProgressProfile = ProgressProfile {
        interval: Duration::from_millis(200),
        min_increment: 0.5,
        max_increment: 15.0,
    };

    /// Slower "analysis": 300ms steps of up to 8%.
    pub const PROCESSING: ProgressProfile = ProgressProfile {
        interval: Duration::from_millis(300),
        min_increment: 0.5,
        max_increment: 8.0,
    };

    /// A positive minimum increment keeps the run bounded: at most
    /// `ceil(100 / min_increment)` ticks.
    pub fn new(interval: Duration, min_increment: f64, max_increment: f64) -> Result<Self> {
        if interval.is_zero() {
            return Err(AppError::Validation("progress interval must be positive".to_string()));
        }
        if !(min_increment > 0.0 && min_increment < max_increment && max_increment <= 100.0) {
            return Err(AppError::Validation(format!(
                "progress increment range {min_increment}..{max_increment} is invalid"
            )));
        }
        Ok(Self {
            interval,
            min_increment,
            max_increment,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_ticks(&self) -> usize {
        (100.0 / self.min_increment).ceil() as usize
    }
}

/// Subscriber side of one running simulation.
pub struct ProgressStream {
    phase: Phase,
    rx: mpsc::Receiver<ProgressEvent>,
    task: JoinHandle<()>,
}

impl ProgressStream {
    pub fn spawn(phase: Phase, profile: ProgressProfile, seed: u64) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ticker = time::interval_at(Instant::now() + profile.interval, profile.interval);
            let mut percent = 0.0_f64;

            loop {
                ticker.tick().await;
                let step = rng.gen_range(profile.min_increment..profile.max_increment);
                percent = (percent + step).min(100.0);
                debug!(%phase, percent, "progress tick");

                if tx.send(ProgressEvent { phase, percent }).await.is_err() {
                    break;
                }
                if percent >= 100.0 {
                    break;
                }
            }
        });

        Self { phase, rx, task }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Next progress value; `None` once the phase completed or was cancelled.
    pub async fn next(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Waits for the phase to end, forwarding each value to `observer`.
    /// Returns the last value seen.
    pub async fn complete(mut self, observer: Option<&ProgressSender>) -> f64 {
        let mut last = 0.0;
        while let Some(event) = self.next().await {
            last = event.percent;
            if let Some(observer) = observer {
                let _ = observer.send(event);
            }
        }
        last
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Where a pipeline run reports progress. A dropped receiver is ignored.
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_upload_reaches_100_monotonically() {
        let started = Instant::now();
        let mut stream = ProgressStream::spawn(Phase::Upload, ProgressProfile::UPLOAD, 1);

        let mut values = Vec::new();
        while let Some(event) = stream.next().await {
            assert_eq!(event.phase, Phase::Upload);
            values.push(event.percent);
        }

        assert_eq!(values.last().copied(), Some(100.0));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.len() >= 7, "max 15% per tick needs at least 7 ticks");
        assert!(values.len() <= ProgressProfile::UPLOAD.max_ticks());
        assert_eq!(started.elapsed(), Duration::from_millis(200) * values.len() as u32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_is_slower() {
        let started = Instant::now();
        let stream = ProgressStream::spawn(Phase::Processing, ProgressProfile::PROCESSING, 9);
        let last = stream.complete(None).await;

        assert_eq!(last, 100.0);
        // 8% max per 300ms tick: at least 13 ticks
        assert!(started.elapsed() >= Duration::from_millis(300 * 13));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_stream() {
        let mut stream = ProgressStream::spawn(Phase::Upload, ProgressProfile::UPLOAD, 3);
        let first = stream.next().await.unwrap();
        assert!(first.percent > 0.0 && first.percent < 100.0);

        stream.cancel();
        let mut remaining = 0;
        while stream.next().await.is_some() {
            remaining += 1;
        }
        assert!(remaining <= CHANNEL_CAPACITY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_receives_every_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = ProgressStream::spawn(Phase::Upload, ProgressProfile::UPLOAD, 5);
        let last = stream.complete(Some(&tx)).await;
        drop(tx);

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event.percent);
        }
        assert_eq!(seen.last().copied(), Some(last));
    }

    #[test]
    fn test_profile_validation() {
        assert!(ProgressProfile::new(Duration::ZERO, 1.0, 2.0).is_err());
        assert!(ProgressProfile::new(Duration::from_millis(10), 0.0, 2.0).is_err());
        assert!(ProgressProfile::new(Duration::from_millis(10), 3.0, 2.0).is_err());
        let profile = ProgressProfile::new(Duration::from_millis(10), 1.0, 2.0).unwrap();
        assert_eq!(profile.max_ticks(), 100);
    }
}
