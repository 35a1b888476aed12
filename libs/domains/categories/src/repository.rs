use async_trait::async_trait;
use database::{Page, PageRequest, Slice, Sort};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError};
use tokio::sync::RwLock;

use crate::criteria::CategorySpecification;
use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategorySortField, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>>;

    async fn exists(&self, id: i64) -> CategoryResult<bool>;

    /// Writes the supplied fields; `NotFound` if `id` does not exist
    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: i64) -> CategoryResult<bool>;

    async fn count(&self) -> CategoryResult<u64>;

    async fn find_all(
        &self,
        spec: CategorySpecification,
        sort: Sort<CategorySortField>,
    ) -> CategoryResult<Vec<Category>>;

    async fn find_page(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Page<Category>>;

    async fn find_slice(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Slice<Category>>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
///
/// Clones share the same store.
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<BTreeMap<i64, Category>>>,
    next_id: Arc<AtomicI64>,
    delete_hooks: Arc<std::sync::RwLock<Vec<Arc<dyn CategoryDeleteHook>>>>,
}

/// Runs after a category is removed from an in-memory store.
///
/// Stands in for the `ON DELETE SET NULL` foreign key of the SQL schema.
#[async_trait]
pub trait CategoryDeleteHook: fmt::Debug + Send + Sync {
    async fn category_deleted(&self, id: i64);
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            delete_hooks: Arc::default(),
        }
    }

    /// Registers `hook` on this store and every clone of it
    pub fn on_delete(&self, hook: Arc<dyn CategoryDeleteHook>) {
        self.delete_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    async fn matching(
        &self,
        spec: &CategorySpecification,
        sort: &Sort<CategorySortField>,
    ) -> Vec<Category> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = spec.filter(categories.values()).cloned().collect();
        sort.sort_items(&mut result);
        result
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let category = Category::new(id, input);
        self.categories.write().await.insert(id, category.clone());

        tracing::info!(category_id = id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> CategoryResult<bool> {
        Ok(self.categories.read().await.contains_key(&id))
    }

    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;
        let category = categories.get_mut(&id).ok_or(CategoryError::NotFound(id))?;
        category.apply_update(input);

        tracing::info!(category_id = id, "Updated category");
        Ok(category.clone())
    }

    async fn delete(&self, id: i64) -> CategoryResult<bool> {
        let removed = self.categories.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(category_id = id, "Deleted category");

            let hooks = self
                .delete_hooks
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            for hook in hooks {
                hook.category_deleted(id).await;
            }
        }
        Ok(removed)
    }

    async fn count(&self) -> CategoryResult<u64> {
        Ok(self.categories.read().await.len() as u64)
    }

    async fn find_all(
        &self,
        spec: CategorySpecification,
        sort: Sort<CategorySortField>,
    ) -> CategoryResult<Vec<Category>> {
        Ok(self.matching(&spec, &sort).await)
    }

    async fn find_page(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Page<Category>> {
        let items = self.matching(&spec, &request.sort).await;
        Ok(Page::from_items(items, &request))
    }

    async fn find_slice(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Slice<Category>> {
        let items = self.matching(&spec, &request.sort).await;
        Ok(Slice::from_items(items, &request))
    }
}
