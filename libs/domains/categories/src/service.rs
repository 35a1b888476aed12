use database::{PageParams, Page, Slice, Sort};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::criteria::{CategorySpecification, name_contains};
use crate::error::{CategoryError, CategoryResult};
use crate::models::{
    Category, CategoryFilter, CategorySortField, CreateCategory, UpdateCategory,
};
use crate::repository::CategoryRepository;

/// Service layer for Category business logic
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i64) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// `NotFound` unless the category exists.
    #[instrument(skip(self))]
    pub async fn ensure_exists(&self, id: i64) -> CategoryResult<()> {
        if self.repository.exists(id).await? {
            Ok(())
        } else {
            Err(CategoryError::NotFound(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn count_categories(&self) -> CategoryResult<u64> {
        self.repository.count().await
    }

    /// All categories ordered by id
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository
            .find_all(CategorySpecification::all(), Sort::asc(CategorySortField::Id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_categories_paged(&self, params: PageParams) -> CategoryResult<Page<Category>> {
        let request = params.to_request(CategorySortField::Id)?;
        self.repository
            .find_page(CategorySpecification::all(), request)
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i64,
        input: UpdateCategory,
    ) -> CategoryResult<Category> {
        input.validate()?;
        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> CategoryResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(CategoryError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> CategoryResult<Vec<Category>> {
        self.repository
            .find_all(name_contains(name), Sort::asc(CategorySortField::Id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name_paged(
        &self,
        name: &str,
        params: PageParams,
    ) -> CategoryResult<Page<Category>> {
        let request = params.to_request(CategorySortField::Id)?;
        self.repository.find_page(name_contains(name), request).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name_slice(
        &self,
        name: &str,
        params: PageParams,
    ) -> CategoryResult<Slice<Category>> {
        let request = params.to_request(CategorySortField::Id)?;
        self.repository.find_slice(name_contains(name), request).await
    }

    #[instrument(skip(self))]
    pub async fn filter_categories(&self, filter: CategoryFilter) -> CategoryResult<Page<Category>> {
        filter.validate()?;
        let request = filter.page_request()?;
        self.repository
            .find_page(CategorySpecification::from(&filter), request)
            .await
    }

    #[instrument(skip(self))]
    pub async fn filter_categories_slice(
        &self,
        filter: CategoryFilter,
    ) -> CategoryResult<Slice<Category>> {
        filter.validate()?;
        let request = filter.page_request()?;
        self.repository
            .find_slice(CategorySpecification::from(&filter), request)
            .await
    }
}
