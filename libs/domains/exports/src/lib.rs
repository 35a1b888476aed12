//! Exports Domain
//!
//! Chunked export of every product to CSV, JSON or XLSX.
//!
//! ```text
//! ProductPageReader ─► PassThroughProcessor ─► Csv/Json/XlsxItemWriter
//!         └──────────────── ChunkStep ────────────────┘
//!                              │
//!                   JobExecution in JobRegistry
//! ```
//!
//! Each format is one job with one step. The step reads a slice of products
//! per chunk, so no count query runs, and always closes its writer.

pub mod error;
pub mod handlers;
pub mod job;
pub mod listener;
pub mod processor;
pub mod reader;
pub mod registry;
pub mod service;
pub mod step;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use handlers::ApiDoc;
pub use job::{ExportFormat, JobExecution, JobStatus, StepExecution};
pub use listener::{JobListener, LoggingListener, StepListener};
pub use processor::{ItemProcessor, PassThroughProcessor};
pub use reader::{ItemReader, ProductPageReader};
pub use registry::{JobRegistry, PathLock};
pub use service::{DEFAULT_CHUNK_SIZE, ExportService};
pub use step::ChunkStep;
pub use writer::{CsvItemWriter, ItemWriter, JsonItemWriter, XlsxItemWriter};
