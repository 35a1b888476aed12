use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Output format of an export; each format has its own job and step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn job_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "exportCsvJob",
            ExportFormat::Json => "exportJsonJob",
            ExportFormat::Xlsx => "exportXlsxJob",
        }
    }

    pub fn step_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "exportCsvStep",
            ExportFormat::Json => "exportJsonStep",
            ExportFormat::Xlsx => "exportXlsxStep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Starting,
    Started,
    Completed,
    Failed,
}

/// Counters and outcome of one chunked step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StepExecution {
    pub step_name: String,
    pub status: JobStatus,
    pub read_count: u64,
    pub write_count: u64,
    pub filter_count: u64,
    pub skip_count: u64,
    pub commit_count: u64,
    pub rollback_count: u64,
    pub failures: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl StepExecution {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            status: JobStatus::Starting,
            read_count: 0,
            write_count: 0,
            filter_count: 0,
            skip_count: 0,
            commit_count: 0,
            rollback_count: 0,
            failures: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.failures.push(message.into());
    }

    pub fn finish(&mut self) {
        if self.status != JobStatus::Failed {
            self.status = JobStatus::Completed;
        }
        self.end_time = Some(Utc::now());
    }
}

/// One run of an export job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobExecution {
    pub id: i64,
    pub job_name: String,
    pub format: ExportFormat,
    pub file_path: String,
    pub status: JobStatus,
    pub create_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub steps: Vec<StepExecution>,
    pub failures: Vec<String>,
}

impl JobExecution {
    pub fn new(id: i64, format: ExportFormat, file_path: impl Into<String>) -> Self {
        Self {
            id,
            job_name: format.job_name().to_string(),
            format,
            file_path: file_path.into(),
            status: JobStatus::Starting,
            create_time: Utc::now(),
            start_time: None,
            end_time: None,
            steps: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.status = JobStatus::Started;
        self.start_time = Some(Utc::now());
    }

    /// Takes over the step's outcome and failures
    pub fn finish(&mut self, step: StepExecution) {
        self.failures.extend(step.failures.iter().cloned());
        self.status = if step.status == JobStatus::Failed {
            JobStatus::Failed
        } else {
            JobStatus::Completed
        };
        self.steps.push(step);
        self.end_time = Some(Utc::now());
    }

    pub fn duration_secs(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).as_seconds_f64(),
            _ => 0.0,
        }
    }

    pub fn write_count(&self) -> u64 {
        self.steps.iter().map(|s| s.write_count).sum()
    }
}
