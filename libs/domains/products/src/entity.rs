use crate::models::{CreateProduct, Product, ProductSortField};
use database::SortField;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use std::cmp::Ordering;

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub in_stock: bool,
    pub stock: i32,
    pub category_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_categories::entity::Entity",
        from = "Column::CategoryId",
        to = "domain_categories::entity::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<domain_categories::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            in_stock: model.in_stock,
            stock: model.stock,
            category_id: model.category_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateProduct> for ActiveModel {
    fn from(input: CreateProduct) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            in_stock: Set(input.in_stock),
            stock: Set(input.stock),
            category_id: Set(input.category_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

/// Every column set, for writing back a merged product
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            in_stock: Set(product.in_stock),
            stock: Set(product.stock),
            category_id: Set(product.category_id),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        }
    }
}

impl SortField for ProductSortField {
    type Column = Column;
    type Item = Product;

    fn column(self) -> Column {
        match self {
            ProductSortField::Id => Column::Id,
            ProductSortField::Name => Column::Name,
            ProductSortField::Description => Column::Description,
            ProductSortField::Price => Column::Price,
            ProductSortField::InStock => Column::InStock,
            ProductSortField::Stock => Column::Stock,
            ProductSortField::CategoryId => Column::CategoryId,
            ProductSortField::CreatedAt => Column::CreatedAt,
            ProductSortField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSortField::Id => a.id.cmp(&b.id),
            ProductSortField::Name => a.name.cmp(&b.name),
            ProductSortField::Description => a.description.cmp(&b.description),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::InStock => a.in_stock.cmp(&b.in_stock),
            ProductSortField::Stock => a.stock.cmp(&b.stock),
            ProductSortField::CategoryId => a.category_id.cmp(&b.category_id),
            ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    fn compare_ids(a: &Product, b: &Product) -> Ordering {
        a.id.cmp(&b.id)
    }
}
