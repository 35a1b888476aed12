use crate::models::{Category, CategorySortField, CreateCategory};
use database::SortField;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use std::cmp::Ordering;

/// Sea-ORM entity for the `categories` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

// Products point at categories, not the other way round; the relation is
// declared on the product entity.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateCategory> for ActiveModel {
    fn from(input: CreateCategory) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

/// Every column set, for writing back a merged category
impl From<Category> for ActiveModel {
    fn from(category: Category) -> Self {
        ActiveModel {
            id: Set(category.id),
            name: Set(category.name),
            description: Set(category.description),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        }
    }
}

impl SortField for CategorySortField {
    type Column = Column;
    type Item = Category;

    fn column(self) -> Column {
        match self {
            CategorySortField::Id => Column::Id,
            CategorySortField::Name => Column::Name,
            CategorySortField::Description => Column::Description,
            CategorySortField::CreatedAt => Column::CreatedAt,
            CategorySortField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn compare(self, a: &Category, b: &Category) -> Ordering {
        match self {
            CategorySortField::Id => a.id.cmp(&b.id),
            CategorySortField::Name => a.name.cmp(&b.name),
            CategorySortField::Description => a.description.cmp(&b.description),
            CategorySortField::CreatedAt => a.created_at.cmp(&b.created_at),
            CategorySortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    fn compare_ids(a: &Category, b: &Category) -> Ordering {
        a.id.cmp(&b.id)
    }
}
