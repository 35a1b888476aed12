use async_trait::async_trait;
use database::{PageRequest, Sort};
use domain_products::{
    Product, ProductError, ProductRepository, ProductSortField, ProductSpecification,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ExportResult;

/// Source of items for a chunked step.
///
/// Each call returns the next chunk; `None` once the source is exhausted.
#[async_trait]
pub trait ItemReader: Send {
    type Item: Send;

    async fn read(&mut self) -> ExportResult<Option<Vec<Self::Item>>>;
}

/// Pages through every product ordered by id.
///
/// Uses the slice form, so no count query is issued. One page is one chunk.
pub struct ProductPageReader<R: ProductRepository> {
    repository: Arc<R>,
    next: Option<PageRequest<ProductSortField>>,
}

impl<R: ProductRepository> ProductPageReader<R> {
    pub fn new(repository: Arc<R>, chunk_size: u64) -> ExportResult<Self> {
        info!(chunk_size, "Initializing product reader");
        let first = PageRequest::first(chunk_size, Sort::asc(ProductSortField::Id))
            .map_err(ProductError::from)?;
        Ok(Self {
            repository,
            next: Some(first),
        })
    }
}

#[async_trait]
impl<R: ProductRepository> ItemReader for ProductPageReader<R> {
    type Item = Product;

    async fn read(&mut self) -> ExportResult<Option<Vec<Product>>> {
        let Some(request) = self.next.take() else {
            return Ok(None);
        };

        let slice = self
            .repository
            .find_slice(ProductSpecification::all(), request)
            .await?;
        debug!(page = request.page, rows = slice.content.len(), "Read product page");

        if slice.has_next && slice.content.len() as u64 == request.size {
            self.next = Some(request.next());
        }

        if slice.content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(slice.content))
        }
    }
}
