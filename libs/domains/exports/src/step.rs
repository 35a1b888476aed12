use std::sync::Arc;
use tracing::error;

use crate::error::{ExportError, ExportResult};
use crate::job::{JobStatus, StepExecution};
use crate::listener::StepListener;
use crate::processor::ItemProcessor;
use crate::reader::ItemReader;
use crate::writer::ItemWriter;

/// Read, process and write chunk by chunk until the reader is exhausted.
///
/// The first error stops the loop and fails the step. The writer is closed
/// whatever happened before. Writer calls run on the blocking pool.
pub struct ChunkStep<Rd, P, W> {
    name: String,
    reader: Rd,
    processor: P,
    writer: Option<W>,
    listeners: Vec<Arc<dyn StepListener>>,
}

impl<Rd, P, W> ChunkStep<Rd, P, W>
where
    Rd: ItemReader,
    P: ItemProcessor<Input = Rd::Item>,
    P::Output: Send + 'static,
    W: ItemWriter<P::Output> + 'static,
{
    pub fn new(name: impl Into<String>, reader: Rd, processor: P, writer: W) -> Self {
        Self {
            name: name.into(),
            reader,
            processor,
            writer: Some(writer),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn StepListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub async fn execute(mut self) -> StepExecution {
        let mut step = StepExecution::new(self.name.clone());
        step.status = JobStatus::Started;
        for listener in &self.listeners {
            listener.before_step(&step);
        }

        if let Err(err) = self.run(&mut step).await {
            error!(step = %self.name, error = %err, "Step failed");
            step.fail(err.to_string());
        }
        if let Err(err) = self.with_writer(|writer| writer.close()).await {
            error!(step = %self.name, error = %err, "Failed to close writer");
            step.fail(format!("Failed to close writer: {}", err));
        }

        step.finish();
        for listener in &self.listeners {
            listener.after_step(&step);
        }
        step
    }

    async fn run(&mut self, step: &mut StepExecution) -> ExportResult<()> {
        let transactional = self
            .writer
            .as_ref()
            .is_some_and(|writer| writer.is_transactional());
        self.with_writer(|writer| writer.open()).await?;

        loop {
            match self.chunk(step).await {
                Ok(true) => step.commit_count += 1,
                Ok(false) => return Ok(()),
                Err(err) => {
                    if transactional {
                        step.rollback_count += 1;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// One chunk; `false` once there is nothing left to read
    async fn chunk(&mut self, step: &mut StepExecution) -> ExportResult<bool> {
        let Some(items) = self.reader.read().await? else {
            return Ok(false);
        };
        step.read_count += items.len() as u64;

        let mut output = Vec::with_capacity(items.len());
        for item in items {
            match self.processor.process(item)? {
                Some(processed) => output.push(processed),
                None => step.filter_count += 1,
            }
        }

        let written = self
            .with_writer(move |writer| writer.write(&output).map(|_| output.len()))
            .await?;
        step.write_count += written as u64;
        Ok(true)
    }

    /// Hands the writer to the blocking pool for one call and takes it back.
    ///
    /// A panicking writer is lost; later calls see [`ExportError::WriterClosed`].
    async fn with_writer<T, F>(&mut self, op: F) -> ExportResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut W) -> ExportResult<T> + Send + 'static,
    {
        let mut writer = self.writer.take().ok_or(ExportError::WriterClosed)?;
        let (writer, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut writer);
            (writer, result)
        })
        .await?;
        self.writer = Some(writer);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct VecReader {
        chunks: VecDeque<ExportResult<Vec<i64>>>,
    }

    impl VecReader {
        fn new(chunks: Vec<ExportResult<Vec<i64>>>) -> Self {
            Self {
                chunks: chunks.into(),
            }
        }
    }

    #[async_trait]
    impl ItemReader for VecReader {
        type Item = i64;

        async fn read(&mut self) -> ExportResult<Option<Vec<i64>>> {
            self.chunks.pop_front().transpose()
        }
    }

    /// Drops odd numbers
    struct EvenOnly;

    impl ItemProcessor for EvenOnly {
        type Input = i64;
        type Output = i64;

        fn process(&self, item: i64) -> ExportResult<Option<i64>> {
            Ok((item % 2 == 0).then_some(item))
        }
    }

    #[derive(Default, Clone)]
    struct RecordingWriter {
        written: Arc<Mutex<Vec<i64>>>,
        closes: Arc<Mutex<u32>>,
        fail_open: bool,
        fail_on_write: Option<usize>,
        transactional: bool,
    }

    impl ItemWriter<i64> for RecordingWriter {
        fn open(&mut self) -> ExportResult<()> {
            if self.fail_open {
                return Err(ExportError::Io(std::io::Error::other("cannot open")));
            }
            Ok(())
        }

        fn write(&mut self, chunk: &[i64]) -> ExportResult<()> {
            let mut written = self.written.lock().unwrap();
            if self.fail_on_write == Some(written.len()) {
                return Err(ExportError::Io(std::io::Error::other("disk full")));
            }
            written.extend_from_slice(chunk);
            Ok(())
        }

        fn close(&mut self) -> ExportResult<()> {
            *self.closes.lock().unwrap() += 1;
            Ok(())
        }

        fn is_transactional(&self) -> bool {
            self.transactional
        }
    }

    #[tokio::test]
    async fn test_counts_reads_writes_filters_and_commits() {
        let writer = RecordingWriter::default();
        let reader = VecReader::new(vec![Ok(vec![1, 2, 3]), Ok(vec![4, 6])]);

        let step = ChunkStep::new("step", reader, EvenOnly, writer.clone())
            .execute()
            .await;

        assert_eq!(step.status, JobStatus::Completed);
        assert_eq!(step.read_count, 5);
        assert_eq!(step.write_count, 3);
        assert_eq!(step.filter_count, 2);
        assert_eq!(step.skip_count, 0);
        assert_eq!(step.commit_count, 2);
        assert_eq!(step.rollback_count, 0);
        assert_eq!(*writer.written.lock().unwrap(), vec![2, 4, 6]);
        assert_eq!(*writer.closes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_rolls_back_and_still_closes() {
        let writer = RecordingWriter {
            fail_on_write: Some(2),
            transactional: true,
            ..Default::default()
        };
        let reader = VecReader::new(vec![Ok(vec![2, 4]), Ok(vec![6]), Ok(vec![8])]);

        let step = ChunkStep::new("step", reader, EvenOnly, writer.clone())
            .execute()
            .await;

        assert_eq!(step.status, JobStatus::Failed);
        assert_eq!(step.commit_count, 1);
        assert_eq!(step.rollback_count, 1);
        assert_eq!(step.write_count, 2);
        assert_eq!(step.failures.len(), 1);
        assert!(step.failures[0].contains("disk full"));
        assert_eq!(*writer.closes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_transactional_writer_never_rolls_back() {
        let writer = RecordingWriter {
            fail_on_write: Some(0),
            ..Default::default()
        };
        let reader = VecReader::new(vec![Ok(vec![2])]);

        let step = ChunkStep::new("step", reader, EvenOnly, writer).execute().await;

        assert_eq!(step.status, JobStatus::Failed);
        assert_eq!(step.rollback_count, 0);
    }

    #[tokio::test]
    async fn test_read_failure_stops_loop() {
        let writer = RecordingWriter {
            transactional: true,
            ..Default::default()
        };
        let reader = VecReader::new(vec![
            Ok(vec![2]),
            Err(ExportError::Io(std::io::Error::other("connection reset"))),
            Ok(vec![4]),
        ]);

        let step = ChunkStep::new("step", reader, EvenOnly, writer.clone())
            .execute()
            .await;

        assert_eq!(step.status, JobStatus::Failed);
        assert_eq!(*writer.written.lock().unwrap(), vec![2]);
        assert_eq!(*writer.closes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_failure_still_closes() {
        let writer = RecordingWriter {
            fail_open: true,
            ..Default::default()
        };
        let reader = VecReader::new(vec![Ok(vec![2])]);

        let step = ChunkStep::new("step", reader, EvenOnly, writer.clone())
            .execute()
            .await;

        assert_eq!(step.status, JobStatus::Failed);
        assert_eq!(step.read_count, 0);
        assert_eq!(*writer.closes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_panicking_writer_fails_step() {
        struct Exploding;

        impl ItemWriter<i64> for Exploding {
            fn open(&mut self) -> ExportResult<()> {
                Ok(())
            }

            fn write(&mut self, _chunk: &[i64]) -> ExportResult<()> {
                panic!("writer bug");
            }

            fn close(&mut self) -> ExportResult<()> {
                Ok(())
            }
        }

        let reader = VecReader::new(vec![Ok(vec![2])]);

        let step = ChunkStep::new("step", reader, EvenOnly, Exploding).execute().await;

        assert_eq!(step.status, JobStatus::Failed);
        assert_eq!(step.commit_count, 0);
        // the chunk failure, then the close that finds no writer
        assert_eq!(step.failures.len(), 2);
        assert!(step.failures[1].contains("Writer is already closed"));
    }

    #[tokio::test]
    async fn test_listeners_see_start_and_end() {
        #[derive(Default)]
        struct Seen(Mutex<Vec<JobStatus>>);

        impl StepListener for Seen {
            fn before_step(&self, step: &StepExecution) {
                self.0.lock().unwrap().push(step.status);
            }

            fn after_step(&self, step: &StepExecution) {
                self.0.lock().unwrap().push(step.status);
            }
        }

        let seen = Arc::new(Seen::default());
        let reader = VecReader::new(vec![]);
        ChunkStep::new("step", reader, EvenOnly, RecordingWriter::default())
            .with_listener(seen.clone())
            .execute()
            .await;

        assert_eq!(
            *seen.0.lock().unwrap(),
            vec![JobStatus::Started, JobStatus::Completed]
        );
    }
}
