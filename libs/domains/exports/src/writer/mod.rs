//! Chunk writers for the export formats.
//!
//! Writers are opened once per step, receive every processed chunk and are
//! closed on every exit path of the step, failed ones included.

mod csv;
mod json;
mod xlsx;

pub use self::csv::CsvItemWriter;
pub use self::json::JsonItemWriter;
pub use self::xlsx::XlsxItemWriter;

use crate::error::ExportResult;

pub trait ItemWriter<T>: Send {
    fn open(&mut self) -> ExportResult<()>;

    fn write(&mut self, chunk: &[T]) -> ExportResult<()>;

    /// Must tolerate being called when `open` failed or never ran
    fn close(&mut self) -> ExportResult<()>;

    /// Whether a failed chunk counts as a rollback
    fn is_transactional(&self) -> bool {
        true
    }
}
