use async_trait::async_trait;
use database::{Page, PageRequest, Slice, Sort, fetch_page, fetch_slice};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use crate::{
    criteria::CategorySpecification,
    entity,
    error::{CategoryError, CategoryResult},
    models::{Category, CategorySortField, CreateCategory, UpdateCategory},
    repository::CategoryRepository,
};

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn select(spec: &CategorySpecification) -> sea_orm::Select<entity::Entity> {
        entity::Entity::find().filter(spec.condition())
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn exists(&self, id: i64) -> CategoryResult<bool> {
        let found = entity::Entity::find_by_id(id)
            .select_only()
            .column(entity::Column::Id)
            .into_tuple::<i64>()
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let mut category = Category::from(model);
        category.apply_update(input);

        let active_model: entity::ActiveModel = category.into();

        let model = active_model.update(&self.db).await?;

        tracing::info!(category_id = id, "Updated category");
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> CategoryResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(category_id = id, "Deleted category");
        }
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> CategoryResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }

    async fn find_all(
        &self,
        spec: CategorySpecification,
        sort: Sort<CategorySortField>,
    ) -> CategoryResult<Vec<Category>> {
        let models = sort.apply(Self::select(&spec)).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_page(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Page<Category>> {
        let page = fetch_page(&self.db, Self::select(&spec), &request).await?;
        Ok(page.map(Into::into))
    }

    async fn find_slice(
        &self,
        spec: CategorySpecification,
        request: PageRequest<CategorySortField>,
    ) -> CategoryResult<Slice<Category>> {
        let slice = fetch_slice(&self.db, Self::select(&spec), &request).await?;
        Ok(slice.map(Into::into))
    }
}
