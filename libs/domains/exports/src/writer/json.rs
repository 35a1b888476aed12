use domain_products::Product;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use super::ItemWriter;
use crate::error::{ExportError, ExportResult};

/// Streams whole products as one JSON array: `[` at open, `]` at close
pub struct JsonItemWriter {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    written: u64,
    closed: bool,
}

impl JsonItemWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
            written: 0,
            closed: false,
        }
    }
}

impl ItemWriter<Product> for JsonItemWriter {
    fn open(&mut self) -> ExportResult<()> {
        info!(path = %self.path.display(), "Opening JSON writer");
        let mut out = BufWriter::new(File::create(&self.path)?);
        out.write_all(b"[")?;
        self.out = Some(out);
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, chunk: &[Product]) -> ExportResult<()> {
        if self.closed {
            return Err(ExportError::WriterClosed);
        }
        let out = self.out.as_mut().ok_or(ExportError::WriterNotOpen)?;

        for product in chunk {
            let separator: &[u8] = if self.written == 0 { b"\n" } else { b",\n" };
            out.write_all(separator)?;
            serde_json::to_writer(&mut *out, product)?;
            self.written += 1;
        }
        out.flush()?;

        debug!(rows = chunk.len(), "Wrote JSON chunk");
        Ok(())
    }

    fn close(&mut self) -> ExportResult<()> {
        self.closed = true;
        if let Some(mut out) = self.out.take() {
            out.write_all(b"\n]\n")?;
            out.flush()?;
            info!(path = %self.path.display(), items = self.written, "Closed JSON writer");
        }
        Ok(())
    }
}
