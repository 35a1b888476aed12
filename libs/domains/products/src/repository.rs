use async_trait::async_trait;
use database::{Page, PageRequest, Slice, Sort};
use domain_categories::{CategoryDeleteHook, CategoryRepository, InMemoryCategoryRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::criteria::ProductSpecification;
use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductSortField, ProductWithCategory, UpdateProduct};

/// Repository trait for Product persistence
///
/// Every lookup is a [`ProductSpecification`] served in one of three forms:
/// a full list, a counted [`Page`] or an uncounted [`Slice`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Writes the supplied fields; `NotFound` if `id` does not exist
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: i64) -> ProductResult<bool>;

    async fn count(&self) -> ProductResult<u64>;

    async fn find_all(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<Product>>;

    async fn find_page(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Page<Product>>;

    async fn find_slice(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Slice<Product>>;

    /// Products joined with their category in a single round trip
    async fn find_with_category(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<ProductWithCategory>>;
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Clones share the same store. Category lookups for
/// [`find_with_category`](ProductRepository::find_with_category) go to the
/// attached category repository, if any.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
    categories: Option<InMemoryCategoryRepository>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            categories: None,
        }
    }

    /// Also nulls `category_id` on products whose category is deleted
    pub fn with_categories(categories: InMemoryCategoryRepository) -> Self {
        let repo = Self::new();
        categories.on_delete(Arc::new(DetachFromCategory {
            products: Arc::clone(&repo.products),
        }));
        Self {
            categories: Some(categories),
            ..repo
        }
    }

    async fn matching(
        &self,
        spec: &ProductSpecification,
        sort: &Sort<ProductSortField>,
    ) -> Vec<Product> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = spec.filter(products.values()).cloned().collect();
        sort.sort_items(&mut result);
        result
    }
}

#[derive(Debug)]
struct DetachFromCategory {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
}

#[async_trait]
impl CategoryDeleteHook for DetachFromCategory {
    async fn category_deleted(&self, id: i64) {
        let mut products = self.products.write().await;
        let mut detached = 0;
        for product in products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
                detached += 1;
            }
        }
        if detached > 0 {
            tracing::info!(category_id = id, detached, "Detached products from deleted category");
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product::new(id, input);
        self.products.write().await.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        product.apply_update(input);

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let removed = self.products.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(removed)
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }

    async fn find_all(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<Product>> {
        Ok(self.matching(&spec, &sort).await)
    }

    async fn find_page(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Page<Product>> {
        let items = self.matching(&spec, &request.sort).await;
        Ok(Page::from_items(items, &request))
    }

    async fn find_slice(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Slice<Product>> {
        let items = self.matching(&spec, &request.sort).await;
        Ok(Slice::from_items(items, &request))
    }

    async fn find_with_category(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<ProductWithCategory>> {
        let products = self.matching(&spec, &sort).await;
        let mut result = Vec::with_capacity(products.len());
        for product in products {
            let category = match (&self.categories, product.category_id) {
                (Some(categories), Some(category_id)) => categories.get_by_id(category_id).await?,
                _ => None,
            };
            result.push(ProductWithCategory { product, category });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{in_category, in_stock};
    use domain_categories::CreateCategory;
    use rust_decimal::Decimal;

    fn create(name: &str, in_stock: bool, category_id: Option<i64>) -> CreateProduct {
        CreateProduct {
            name: name.into(),
            description: None,
            price: Decimal::new(1000, 2),
            in_stock,
            stock: if in_stock { 5 } else { 0 },
            category_id,
            base64_file: None,
        }
    }

    #[tokio::test]
    async fn test_stock_status_ordering() {
        let repo = InMemoryProductRepository::new();
        repo.create(create("a", false, Some(1))).await.unwrap();
        repo.create(create("b", true, Some(1))).await.unwrap();
        repo.create(create("c", true, Some(1))).await.unwrap();
        repo.create(create("d", true, Some(2))).await.unwrap();

        let found = repo
            .find_all(in_category(1), Sort::desc(ProductSortField::InStock))
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_find_with_category_attaches_category() {
        let categories = InMemoryCategoryRepository::new();
        let books = categories
            .create(CreateCategory {
                name: "Books".into(),
                description: None,
            })
            .await
            .unwrap();

        let repo = InMemoryProductRepository::with_categories(categories);
        repo.create(create("Novel", true, Some(books.id))).await.unwrap();
        repo.create(create("Loose", true, None)).await.unwrap();

        let found = repo
            .find_with_category(in_stock(), Sort::asc(ProductSortField::Id))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].category.as_ref().map(|c| c.id), Some(books.id));
        assert!(found[1].category.is_none());
    }
}
