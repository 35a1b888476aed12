use chrono::Local;
use domain_products::Product;
use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::ItemWriter;
use crate::error::{ExportError, ExportResult};

pub const PRODUCTS_SHEET: &str = "Products";
pub const METADATA_SHEET: &str = "Metadata";
const HEADER: [&str; 5] = ["ID", "Name", "Description", "Price", "In Stock"];

/// Buffers rows in memory and saves the workbook at close.
///
/// Not transactional: a failed chunk leaves earlier rows buffered.
pub struct XlsxItemWriter {
    path: PathBuf,
    rows: Vec<Product>,
    timestamp: String,
    opened: bool,
    closed: bool,
}

impl XlsxItemWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Vec::new(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            opened: false,
            closed: false,
        }
    }

    fn save(&self) -> ExportResult<()> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(PRODUCTS_SHEET)?;
        for (col, title) in (0u16..).zip(HEADER) {
            sheet.write_string(0, col, title)?;
        }
        for (row, product) in (1u32..).zip(&self.rows) {
            sheet.write_number(row, 0, product.id as f64)?;
            sheet.write_string(row, 1, &product.name)?;
            sheet.write_string(row, 2, product.description.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 3, product.price.to_string())?;
            sheet.write_boolean(row, 4, product.in_stock)?;
        }

        let metadata = workbook.add_worksheet();
        metadata.set_name(METADATA_SHEET)?;
        metadata.write_string(0, 0, "Export Date:")?;
        metadata.write_string(0, 1, &self.timestamp)?;

        workbook.save(&self.path)?;
        Ok(())
    }
}

impl ItemWriter<Product> for XlsxItemWriter {
    fn open(&mut self) -> ExportResult<()> {
        info!(path = %self.path.display(), "Opening XLSX writer");
        self.rows.clear();
        self.opened = true;
        self.closed = false;
        Ok(())
    }

    fn write(&mut self, chunk: &[Product]) -> ExportResult<()> {
        if self.closed {
            warn!("Attempted to write to a closed workbook");
            return Err(ExportError::WriterClosed);
        }
        if !self.opened {
            return Err(ExportError::WriterNotOpen);
        }

        let first_row = self.rows.len() + 1;
        self.rows.extend_from_slice(chunk);
        debug!(first_row, rows = chunk.len(), "Buffered XLSX chunk");
        Ok(())
    }

    fn close(&mut self) -> ExportResult<()> {
        if self.closed {
            warn!("Workbook already closed, skipping file write");
            return Ok(());
        }
        self.closed = true;
        if !self.opened {
            return Ok(());
        }

        info!(path = %self.path.display(), items = self.rows.len(), "Writing XLSX workbook");
        self.save()
    }

    fn is_transactional(&self) -> bool {
        false
    }
}
