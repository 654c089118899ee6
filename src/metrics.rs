// Session metrics
//
// Counters for scans, audits and saves, logged as a summary on exit.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Session counters.
///
/// Atomic so a shared reference can be handed to any service call.
#[derive(Debug)]
pub struct Metrics {
    /// Vehicle configs loaded into the catalog
    pub configs_loaded: AtomicUsize,

    /// Info files or units skipped during a scan
    pub files_skipped: AtomicUsize,

    /// Parts audits run (reports and narratives)
    pub audits_run: AtomicUsize,

    /// Audits that ended in a narrative instead of a report
    pub audits_without_report: AtomicUsize,

    /// Configs written successfully
    pub configs_saved: AtomicUsize,

    /// Save attempts rejected or failed
    pub save_failures: AtomicUsize,

    /// `.bak` files created
    pub backups_created: AtomicUsize,

    /// Total scan time in milliseconds
    pub total_scan_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            configs_loaded: AtomicUsize::new(0),
            files_skipped: AtomicUsize::new(0),
            audits_run: AtomicUsize::new(0),
            audits_without_report: AtomicUsize::new(0),
            configs_saved: AtomicUsize::new(0),
            save_failures: AtomicUsize::new(0),
            backups_created: AtomicUsize::new(0),
            total_scan_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record the result of one scan
    pub fn record_scan(&self, loaded: usize, skipped: usize, duration: Duration) {
        self.configs_loaded.fetch_add(loaded, Ordering::Relaxed);
        self.files_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.total_scan_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_audit(&self, produced_report: bool) {
        self.audits_run.fetch_add(1, Ordering::Relaxed);
        if !produced_report {
            self.audits_without_report.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_save(&self) {
        self.configs_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_failure(&self) {
        self.save_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backup(&self) {
        self.backups_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Scan: {} configs loaded, {} skipped, {:.2}s",
            self.configs_loaded.load(Ordering::Relaxed),
            self.files_skipped.load(Ordering::Relaxed),
            self.total_scan_time_ms.load(Ordering::Relaxed) as f64 / 1000.0
        );
        tracing::info!(
            "Audits: {} run, {} without report",
            self.audits_run.load(Ordering::Relaxed),
            self.audits_without_report.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Saves: {} written, {} failed, {} backups",
            self.configs_saved.load(Ordering::Relaxed),
            self.save_failures.load(Ordering::Relaxed),
            self.backups_created.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.configs_loaded.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.save_failures.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_scan_accumulates() {
        let metrics = Metrics::new();
        metrics.record_scan(10, 2, Duration::from_millis(100));
        metrics.record_scan(5, 0, Duration::from_millis(50));

        assert_eq!(metrics.configs_loaded.load(Ordering::Relaxed), 15);
        assert_eq!(metrics.files_skipped.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.total_scan_time_ms.load(Ordering::Relaxed), 150);
    }

    #[test]
    fn test_audit_and_save_counters() {
        let metrics = Metrics::new();
        metrics.record_audit(true);
        metrics.record_audit(false);
        metrics.record_save();
        metrics.record_save_failure();
        metrics.record_backup();

        assert_eq!(metrics.audits_run.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.audits_without_report.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.configs_saved.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.save_failures.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.backups_created.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
