use csv::{Writer, WriterBuilder};
use domain_products::Product;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, info};

use super::ItemWriter;
use crate::error::{ExportError, ExportResult};

pub const CSV_HEADER: [&str; 5] = ["id", "name", "description", "price", "inStock"];

/// Comma-delimited writer; an existing file is truncated
pub struct CsvItemWriter {
    path: PathBuf,
    writer: Option<Writer<File>>,
    closed: bool,
}

impl CsvItemWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            closed: false,
        }
    }
}

impl ItemWriter<Product> for CsvItemWriter {
    fn open(&mut self) -> ExportResult<()> {
        info!(path = %self.path.display(), "Opening CSV writer");
        let file = File::create(&self.path)?;
        let mut writer = WriterBuilder::new().delimiter(b',').from_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        self.writer = Some(writer);
        Ok(())
    }

    fn write(&mut self, chunk: &[Product]) -> ExportResult<()> {
        if self.closed {
            return Err(ExportError::WriterClosed);
        }
        let writer = self.writer.as_mut().ok_or(ExportError::WriterNotOpen)?;

        for product in chunk {
            writer.write_record([
                product.id.to_string(),
                product.name.clone(),
                product.description.clone().unwrap_or_default(),
                product.price.to_string(),
                product.in_stock.to_string(),
            ])?;
        }
        writer.flush()?;

        debug!(rows = chunk.len(), "Wrote CSV chunk");
        Ok(())
    }

    fn close(&mut self) -> ExportResult<()> {
        self.closed = true;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            info!(path = %self.path.display(), "Closed CSV writer");
        }
        Ok(())
    }
}
