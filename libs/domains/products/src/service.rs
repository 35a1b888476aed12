use database::{Page, PageParams, PageRequest, Slice, Sort};
use domain_categories::CategoryRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::criteria::{
    ProductSpecification, category_text_search, category_with_filters, in_category, in_stock,
    name_contains, price_below,
};
use crate::error::{ProductError, ProductResult};
use crate::models::{
    CategoryProductsQuery, CreateProduct, Product, ProductFilter, ProductSortField,
    ProductWithCategory, UpdateProduct,
};
use crate::repository::ProductRepository;

fn by_id() -> Sort<ProductSortField> {
    Sort::asc(ProductSortField::Id)
}

/// Service layer for Product business logic
///
/// Holds the category repository to check `category_id` references and to
/// answer 404 on category-scoped lookups.
pub struct ProductService<R: ProductRepository, C: CategoryRepository> {
    repository: Arc<R>,
    categories: Arc<C>,
}

impl<R: ProductRepository, C: CategoryRepository> Clone for ProductService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<R: ProductRepository, C: CategoryRepository> ProductService<R, C> {
    pub fn new(repository: R, categories: Arc<C>) -> Self {
        Self {
            repository: Arc::new(repository),
            categories,
        }
    }

    async fn ensure_category(&self, category_id: i64) -> ProductResult<()> {
        if self.categories.exists(category_id).await? {
            Ok(())
        } else {
            Err(ProductError::CategoryNotFound(category_id))
        }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }
        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self) -> ProductResult<u64> {
        self.repository.count().await
    }

    /// All products ordered by id
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository
            .find_all(ProductSpecification::all(), by_id())
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_products_paged(&self, params: PageParams) -> ProductResult<Page<Product>> {
        self.page(ProductSpecification::all(), params.to_request(ProductSortField::Id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        self.repository.find_all(name_contains(name), by_id()).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name_paged(
        &self,
        name: &str,
        params: PageParams,
    ) -> ProductResult<Page<Product>> {
        self.page(name_contains(name), params.to_request(ProductSortField::Id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name_slice(
        &self,
        name: &str,
        params: PageParams,
    ) -> ProductResult<Slice<Product>> {
        self.slice(name_contains(name), params.to_request(ProductSortField::Id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn under_price(&self, price: Decimal) -> ProductResult<Vec<Product>> {
        self.repository.find_all(price_below(price), by_id()).await
    }

    /// Defaults to sorting by price
    #[instrument(skip(self))]
    pub async fn under_price_paged(
        &self,
        price: Decimal,
        params: PageParams,
    ) -> ProductResult<Page<Product>> {
        self.page(price_below(price), params.to_request(ProductSortField::Price)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn under_price_slice(
        &self,
        price: Decimal,
        params: PageParams,
    ) -> ProductResult<Slice<Product>> {
        self.slice(price_below(price), params.to_request(ProductSortField::Price)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn in_stock(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all(in_stock(), by_id()).await
    }

    #[instrument(skip(self))]
    pub async fn in_stock_paged(&self, params: PageParams) -> ProductResult<Page<Product>> {
        self.page(in_stock(), params.to_request(ProductSortField::Id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn in_stock_slice(&self, params: PageParams) -> ProductResult<Slice<Product>> {
        self.slice(in_stock(), params.to_request(ProductSortField::Id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn filter_products(&self, filter: ProductFilter) -> ProductResult<Page<Product>> {
        filter.validate()?;
        let request = filter.page_request()?;
        self.page(ProductSpecification::from(&filter), request).await
    }

    #[instrument(skip(self))]
    pub async fn filter_products_slice(
        &self,
        filter: ProductFilter,
    ) -> ProductResult<Slice<Product>> {
        filter.validate()?;
        let request = filter.page_request()?;
        self.slice(ProductSpecification::from(&filter), request).await
    }

    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category_id: i64) -> ProductResult<Vec<Product>> {
        self.ensure_category(category_id).await?;
        self.repository
            .find_all(in_category(category_id), by_id())
            .await
    }

    #[instrument(skip(self))]
    pub async fn products_by_category_slice(
        &self,
        category_id: i64,
        params: PageParams,
    ) -> ProductResult<Slice<Product>> {
        self.ensure_category(category_id).await?;
        self.slice(
            in_category(category_id),
            params.to_request(ProductSortField::Id)?,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn products_by_category_page(
        &self,
        category_id: i64,
        params: PageParams,
    ) -> ProductResult<Page<Product>> {
        self.ensure_category(category_id).await?;
        self.page(
            in_category(category_id),
            params.to_request(ProductSortField::Id)?,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn products_by_category_filtered(
        &self,
        category_id: i64,
        query: CategoryProductsQuery,
    ) -> ProductResult<Vec<Product>> {
        query.validate()?;
        self.ensure_category(category_id).await?;
        self.repository
            .find_all(category_with_filters(category_id, &query), by_id())
            .await
    }

    /// Name or description search inside one category; unknown categories
    /// simply yield no products.
    #[instrument(skip(self))]
    pub async fn category_text_search(
        &self,
        category_id: i64,
        term: &str,
    ) -> ProductResult<Vec<Product>> {
        self.repository
            .find_all(category_text_search(category_id, term), by_id())
            .await
    }

    /// In-stock products first, then by id
    #[instrument(skip(self))]
    pub async fn products_by_stock_status(&self, category_id: i64) -> ProductResult<Vec<Product>> {
        self.ensure_category(category_id).await?;
        self.repository
            .find_all(
                in_category(category_id),
                Sort::desc(ProductSortField::InStock),
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn products_with_category(
        &self,
        category_id: i64,
    ) -> ProductResult<Vec<ProductWithCategory>> {
        self.ensure_category(category_id).await?;
        self.repository
            .find_with_category(in_category(category_id), by_id())
            .await
    }

    async fn page(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Page<Product>> {
        self.repository.find_page(spec, request).await
    }

    async fn slice(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Slice<Product>> {
        self.repository.find_slice(spec, request).await
    }
}
