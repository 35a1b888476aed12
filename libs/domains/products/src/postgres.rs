use async_trait::async_trait;
use database::{Page, PageRequest, Slice, Sort, fetch_page, fetch_slice};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    criteria::ProductSpecification,
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, ProductSortField, ProductWithCategory, UpdateProduct},
    repository::ProductRepository,
};

#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn select(spec: &ProductSpecification) -> sea_orm::Select<entity::Entity> {
        entity::Entity::find().filter(spec.condition())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let mut product = Product::from(model);
        product.apply_update(input);

        let active_model: entity::ActiveModel = product.into();
        let model = active_model.update(&self.db).await?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }

    async fn find_all(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<Product>> {
        let models = sort.apply(Self::select(&spec)).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_page(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Page<Product>> {
        let page = fetch_page(&self.db, Self::select(&spec), &request).await?;
        Ok(page.map(Into::into))
    }

    async fn find_slice(
        &self,
        spec: ProductSpecification,
        request: PageRequest<ProductSortField>,
    ) -> ProductResult<Slice<Product>> {
        let slice = fetch_slice(&self.db, Self::select(&spec), &request).await?;
        Ok(slice.map(Into::into))
    }

    async fn find_with_category(
        &self,
        spec: ProductSpecification,
        sort: Sort<ProductSortField>,
    ) -> ProductResult<Vec<ProductWithCategory>> {
        let rows = sort
            .apply(Self::select(&spec))
            .find_also_related(domain_categories::entity::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, category)| ProductWithCategory {
                product: product.into(),
                category: category.map(Into::into),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::in_category;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn model(name: &str, description: &str) -> entity::Model {
        let now = Utc::now().into();
        entity::Model {
            id: 4,
            name: name.into(),
            description: Some(description.into()),
            price: Decimal::new(2500, 2),
            in_stock: true,
            stock: 8,
            category_id: Some(2),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_update_writes_back_merged_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![model("Lamp", "brass base")],
                vec![model("Desk Lamp", "brass base")],
            ])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let updated = repo
            .update(
                4,
                UpdateProduct {
                    name: Some("Desk Lamp".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Desk Lamp");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(log.contains("Desk Lamp"));
        assert!(log.contains("brass base"));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.update(9, UpdateProduct::default()).await;
        assert!(matches!(result, Err(ProductError::NotFound(9))));
    }

    #[test]
    fn test_with_category_is_a_single_left_join() {
        let sql = Sort::asc(ProductSortField::Id)
            .apply(PgProductRepository::select(&in_category(3)))
            .find_also_related(domain_categories::entity::Entity)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "categories""#));
        assert!(sql.contains(r#"WHERE "products"."category_id" = 3"#));
        assert!(sql.contains(r#"ORDER BY "products"."id" ASC"#));
    }
}
