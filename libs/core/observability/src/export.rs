//! Export job metrics.

use metrics::{counter, gauge, histogram};

/// Export metrics recorder
pub struct ExportMetrics;

impl ExportMetrics {
    pub fn record_job_started(format: &str) {
        counter!("export_jobs_total", "format" => format.to_string(), "status" => "started")
            .increment(1);
        gauge!("export_jobs_running").increment(1.0);
    }

    pub fn record_job_completed(format: &str, written: u64, duration_secs: f64) {
        counter!("export_jobs_total", "format" => format.to_string(), "status" => "completed")
            .increment(1);
        histogram!("export_job_duration_seconds", "format" => format.to_string())
            .record(duration_secs);
        gauge!("export_jobs_running").decrement(1.0);

        tracing::info!(
            format = format,
            written = written,
            duration_secs = duration_secs,
            "Export job completed"
        );
    }

    pub fn record_job_failed(format: &str, error: &str) {
        counter!("export_jobs_total", "format" => format.to_string(), "status" => "failed")
            .increment(1);
        gauge!("export_jobs_running").decrement(1.0);

        tracing::error!(format = format, error = error, "Export job failed");
    }

    /// Record the item counters of one finished step
    pub fn record_step_items(step: &str, read: u64, written: u64, skipped: u64) {
        for (phase, count) in [("read", read), ("written", written), ("skipped", skipped)] {
            counter!(
                "export_items_total",
                "step" => step.to_string(),
                "phase" => phase
            )
            .increment(count);
        }
    }
}
