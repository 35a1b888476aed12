use observability::ExportMetrics;
use tracing::{error, info};

use crate::job::{JobExecution, JobStatus, StepExecution};

pub trait StepListener: Send + Sync {
    fn before_step(&self, _step: &StepExecution) {}

    fn after_step(&self, _step: &StepExecution) {}
}

pub trait JobListener: Send + Sync {
    fn before_job(&self, _job: &JobExecution) {}

    fn after_job(&self, _job: &JobExecution) {}
}

/// Logs step and job boundaries and records export metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl StepListener for LoggingListener {
    fn before_step(&self, step: &StepExecution) {
        info!(step = %step.step_name, "Step starting");
    }

    fn after_step(&self, step: &StepExecution) {
        let duration_ms = step
            .end_time
            .map(|end| (end - step.start_time).num_milliseconds())
            .unwrap_or_default();

        info!(
            step = %step.step_name,
            status = %step.status,
            read = step.read_count,
            written = step.write_count,
            filtered = step.filter_count,
            skipped = step.skip_count,
            commits = step.commit_count,
            rollbacks = step.rollback_count,
            duration_ms,
            "Step finished"
        );
        for failure in &step.failures {
            error!(step = %step.step_name, failure = %failure, "Step failure");
        }

        ExportMetrics::record_step_items(
            &step.step_name,
            step.read_count,
            step.write_count,
            step.skip_count,
        );
    }
}

impl JobListener for LoggingListener {
    fn before_job(&self, job: &JobExecution) {
        info!(
            job_id = job.id,
            job = %job.job_name,
            path = %job.file_path,
            "Job starting"
        );
        ExportMetrics::record_job_started(&job.format.to_string());
    }

    fn after_job(&self, job: &JobExecution) {
        info!(
            job_id = job.id,
            job = %job.job_name,
            status = %job.status,
            duration_secs = job.duration_secs(),
            "Job finished"
        );

        let format = job.format.to_string();
        if job.status == JobStatus::Failed {
            ExportMetrics::record_job_failed(&format, &job.failures.join("; "));
        } else {
            ExportMetrics::record_job_completed(&format, job.write_count(), job.duration_secs());
        }
    }
}
