use axum_helpers::{current_correlation_id, with_correlation_id};
use domain_products::{Product, ProductRepository};
use std::path::Path;
use std::sync::Arc;
use tracing::{Instrument, info, instrument};

use crate::error::{ExportError, ExportResult};
use crate::job::{ExportFormat, JobExecution, JobStatus, StepExecution};
use crate::listener::{JobListener, LoggingListener};
use crate::processor::PassThroughProcessor;
use crate::reader::ProductPageReader;
use crate::registry::{JobRegistry, PathLock};
use crate::step::ChunkStep;
use crate::writer::{CsvItemWriter, ItemWriter, JsonItemWriter, XlsxItemWriter};

pub const DEFAULT_CHUNK_SIZE: u64 = 100;

/// Runs product exports and keeps their executions.
///
/// Each job runs on its own task, one chunk at a time. The caller waits for
/// it, but a caller that goes away does not stop it.
pub struct ExportService<R: ProductRepository> {
    products: Arc<R>,
    registry: Arc<JobRegistry>,
    chunk_size: u64,
    listener: Arc<LoggingListener>,
}

impl<R: ProductRepository> Clone for ExportService<R> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            registry: Arc::clone(&self.registry),
            chunk_size: self.chunk_size,
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<R: ProductRepository + 'static> ExportService<R> {
    pub fn new(products: Arc<R>, registry: Arc<JobRegistry>, chunk_size: u64) -> Self {
        Self {
            products,
            registry,
            chunk_size,
            listener: Arc::new(LoggingListener),
        }
    }

    /// Runs the job for `format` to completion.
    ///
    /// A job that ends `Failed` is still stored and comes back as
    /// [`ExportError::JobFailed`].
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        format: ExportFormat,
        file_path: &str,
    ) -> ExportResult<JobExecution> {
        let file_path = file_path.trim();
        if file_path.is_empty() {
            return Err(ExportError::BlankPath);
        }
        let lock = self.registry.lock_path(Path::new(file_path))?;

        let service = self.clone();
        let file_path = file_path.to_string();
        let run = async move { service.run_job(format, file_path, lock).await }.in_current_span();
        let handle = match current_correlation_id() {
            Some(id) => tokio::spawn(with_correlation_id(id, run)),
            None => tokio::spawn(run),
        };

        let job = handle.await?;
        if job.status == JobStatus::Failed {
            return Err(ExportError::JobFailed {
                job_id: job.id,
                message: job.failures.join("; "),
            });
        }
        Ok(job)
    }

    /// The job body; `_lock` keeps the path claimed until the job is stored.
    async fn run_job(
        &self,
        format: ExportFormat,
        file_path: String,
        _lock: PathLock,
    ) -> JobExecution {
        let mut job = self.registry.create(format, &file_path).await;
        job.start();
        self.listener.before_job(&job);
        self.registry.save(&job).await;

        let step = match job.format {
            ExportFormat::Csv => self.run_step(job.format, CsvItemWriter::new(&file_path)).await,
            ExportFormat::Json => self.run_step(job.format, JsonItemWriter::new(&file_path)).await,
            ExportFormat::Xlsx => self.run_step(job.format, XlsxItemWriter::new(&file_path)).await,
        };

        job.finish(step);
        self.listener.after_job(&job);
        self.registry.save(&job).await;

        if job.status == JobStatus::Completed {
            info!(job_id = job.id, path = %file_path, "Export completed");
        }
        job
    }

    #[instrument(skip(self))]
    pub async fn get_job(&self, id: i64) -> ExportResult<JobExecution> {
        self.registry
            .get(id)
            .await
            .ok_or(ExportError::JobNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_jobs(&self) -> Vec<JobExecution> {
        self.registry.list().await
    }

    async fn run_step<W: ItemWriter<Product> + 'static>(
        &self,
        format: ExportFormat,
        writer: W,
    ) -> StepExecution {
        let name = format.step_name();
        let reader = match ProductPageReader::new(Arc::clone(&self.products), self.chunk_size) {
            Ok(reader) => reader,
            Err(err) => {
                let mut step = StepExecution::new(name);
                step.fail(err.to_string());
                step.finish();
                return step;
            }
        };

        ChunkStep::new(name, reader, PassThroughProcessor, writer)
            .with_listener(self.listener.clone())
            .execute()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::{Page, PageRequest, Slice, Sort};
    use domain_products::{
        CreateProduct, InMemoryProductRepository, ProductResult, ProductSortField,
        ProductSpecification, ProductWithCategory, UpdateProduct,
    };
    use rust_decimal::Decimal;
    use std::time::Duration;

    async fn seeded(count: usize) -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        for i in 0..count {
            repo.create(CreateProduct {
                name: format!("Item {}", i),
                description: Some("exported".into()),
                price: Decimal::new(1999, 2),
                in_stock: true,
                stock: 4,
                category_id: None,
                base64_file: None,
            })
            .await
            .unwrap();
        }
        repo
    }

    async fn service(
        count: usize,
        chunk_size: u64,
    ) -> ExportService<InMemoryProductRepository> {
        let repo = seeded(count).await;
        ExportService::new(Arc::new(repo), Arc::new(JobRegistry::new()), chunk_size)
    }

    /// Every page read takes 20ms
    struct SlowProducts(InMemoryProductRepository);

    #[async_trait]
    impl ProductRepository for SlowProducts {
        async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
            self.0.create(input).await
        }

        async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
            self.0.get_by_id(id).await
        }

        async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
            self.0.update(id, input).await
        }

        async fn delete(&self, id: i64) -> ProductResult<bool> {
            self.0.delete(id).await
        }

        async fn count(&self) -> ProductResult<u64> {
            self.0.count().await
        }

        async fn find_all(
            &self,
            spec: ProductSpecification,
            sort: Sort<ProductSortField>,
        ) -> ProductResult<Vec<Product>> {
            self.0.find_all(spec, sort).await
        }

        async fn find_page(
            &self,
            spec: ProductSpecification,
            request: PageRequest<ProductSortField>,
        ) -> ProductResult<Page<Product>> {
            self.0.find_page(spec, request).await
        }

        async fn find_slice(
            &self,
            spec: ProductSpecification,
            request: PageRequest<ProductSortField>,
        ) -> ProductResult<Slice<Product>> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.0.find_slice(spec, request).await
        }

        async fn find_with_category(
            &self,
            spec: ProductSpecification,
            sort: Sort<ProductSortField>,
        ) -> ProductResult<Vec<ProductWithCategory>> {
            self.0.find_with_category(spec, sort).await
        }
    }

    #[tokio::test]
    async fn test_job_outlives_dropped_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let service = ExportService::new(
            Arc::new(SlowProducts(seeded(5).await)),
            Arc::new(JobRegistry::new()),
            1,
        );

        let abandoned = tokio::time::timeout(
            Duration::from_millis(30),
            service.export(ExportFormat::Xlsx, path.to_str().unwrap()),
        )
        .await;
        assert!(abandoned.is_err(), "export should still be running");

        let job = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let job = service.get_job(1).await.unwrap();
                if job.end_time.is_some() {
                    break job;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.steps[0].write_count, 5);
        assert!(path.exists());
        assert!(service.registry.lock_path(&path).is_ok());
    }

    #[tokio::test]
    async fn test_csv_export_completes_with_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let service = service(5, 2).await;

        let job = service
            .export(ExportFormat::Csv, path.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.job_name, "exportCsvJob");
        assert_eq!(job.steps[0].step_name, "exportCsvStep");
        assert_eq!(job.steps[0].read_count, 5);
        assert_eq!(job.steps[0].write_count, 5);
        assert_eq!(job.steps[0].commit_count, 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 6);
        assert_eq!(service.get_job(job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn test_blank_path_is_rejected_before_a_job_exists() {
        let service = service(1, 10).await;

        let result = service.export(ExportFormat::Json, "   ").await;

        assert!(matches!(result, Err(ExportError::BlankPath)));
        assert!(service.list_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_path_fails_job_but_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let service = service(1, 10).await;

        let result = service
            .export(ExportFormat::Csv, path.to_str().unwrap())
            .await;

        let job_id = match result {
            Err(ExportError::JobFailed { job_id, .. }) => job_id,
            other => panic!("expected failed job, got {:?}", other),
        };
        let job = service.get_job(job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(!job.failures.is_empty());
    }

    #[tokio::test]
    async fn test_busy_path_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let service = service(1, 10).await;

        let _held = service.registry.lock_path(&path).unwrap();
        let result = service
            .export(ExportFormat::Json, path.to_str().unwrap())
            .await;

        assert!(matches!(result, Err(ExportError::PathBusy(_))));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let service = service(0, 10).await;

        assert!(matches!(
            service.get_job(42).await,
            Err(ExportError::JobNotFound(42))
        ));
    }
}
