//! Sampled fault reporting.
//!
//! A broken policy module fails on every action it sees, which on a busy
//! server means thousands of identical errors per minute. Each interceptor
//! owns one [`FaultReporter`] so that flooding in one place never hides the
//! first fault of another. The reporter counts everything and logs the first
//! occurrence plus every `interval`-th after it.

use std::borrow::Cow;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

/// Default sampling interval: log occurrence 1, 100, 200, ...
pub const SAMPLE_INTERVAL: u64 = 100;

/// Per-label sampled error logger.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug)]
pub struct FaultReporter {
    label: Cow<'static, str>,
    interval: u64,

    /// Total faults reported since creation
    count: AtomicU64,

    /// Faults that were actually emitted to the log
    logged: AtomicU64,
}

impl FaultReporter {
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self::with_interval(label, SAMPLE_INTERVAL)
    }

    /// Creates a reporter with a custom sampling interval (clamped to at least 1).
    pub fn with_interval(label: impl Into<Cow<'static, str>>, interval: u64) -> Self {
        Self {
            label: label.into(),
            interval: interval.max(1),
            count: AtomicU64::new(0),
            logged: AtomicU64::new(0),
        }
    }

    /// Records a fault, logging it if this occurrence is sampled.
    pub fn report(&self, error: &dyn Error) {
        if let Some(occurrence) = self.sample() {
            warn!(
                target: "guard::fault",
                label = %self.label,
                occurrence,
                error = %error,
                "hook fault"
            );
        }
    }

    /// Records a fault with a short description of what was being attempted.
    pub fn report_detail(&self, detail: &str, error: &dyn Error) {
        if let Some(occurrence) = self.sample() {
            warn!(
                target: "guard::fault",
                label = %self.label,
                occurrence,
                detail,
                error = %error,
                "hook fault"
            );
        }
    }

    /// Bumps the counter and returns the occurrence number when it must be logged.
    fn sample(&self) -> Option<u64> {
        let occurrence = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if occurrence == 1 || occurrence % self.interval == 0 {
            self.logged.fetch_add(1, Ordering::Relaxed);
            Some(occurrence)
        } else {
            None
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total faults reported since creation.
    pub fn fault_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Faults that made it into the log.
    pub fn logged_count(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guard_core::HookError;

    #[test]
    fn logs_first_and_every_hundredth() {
        let faults = FaultReporter::new("BlockPlaceGate");
        let error = HookError::failed("claim lookup failed");

        for _ in 0..250 {
            faults.report(&error);
        }

        assert_eq!(faults.fault_count(), 250);
        assert_eq!(faults.logged_count(), 3, "occurrences 1, 100 and 200");
    }

    #[test]
    fn labels_sample_independently() {
        let noisy = FaultReporter::new("HarvestGate");
        let quiet = FaultReporter::new("CommandGate");
        let error = HookError::failed("boom");

        for _ in 0..99 {
            noisy.report(&error);
        }
        quiet.report_detail("resolving command hook", &error);

        assert_eq!(noisy.logged_count(), 1);
        assert_eq!(quiet.logged_count(), 1);
        assert_eq!(quiet.fault_count(), 1);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let faults = FaultReporter::with_interval("Clamped", 0);
        let error = HookError::failed("boom");
        for _ in 0..3 {
            faults.report(&error);
        }
        assert_eq!(faults.logged_count(), 3);
    }

    #[test]
    fn concurrent_reports_are_all_counted() {
        let faults = std::sync::Arc::new(FaultReporter::new("Concurrent"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let faults = std::sync::Arc::clone(&faults);
                std::thread::spawn(move || {
                    let error = HookError::failed("boom");
                    for _ in 0..100 {
                        faults.report(&error);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("reporter thread");
        }

        assert_eq!(faults.fault_count(), 400);
        assert_eq!(faults.logged_count(), 5, "occurrences 1, 100, 200, 300, 400");
    }
}
