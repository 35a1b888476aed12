//! Product search criteria.
//!
//! Every product lookup is expressed as a [`ProductSpecification`] so that
//! the same lookup can be served as a list, a [`Page`](database::Page) or a
//! [`Slice`](database::Slice).

use chrono::{DateTime, Utc};
use database::{
    Criterion, Specification, contains_ignore_case, normalize_term, text_contains_ignore_case,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition};

use crate::entity::Column;
use crate::models::{CategoryProductsQuery, Product, ProductFilter};

#[derive(Debug, Clone, PartialEq)]
pub enum ProductCriterion {
    NameContains(String),
    DescriptionContains(String),
    CategoryIs(i64),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    PriceBelow(Decimal),
    InStockIs(bool),
    StockAtLeast(i32),
    CreatedAfter(DateTime<Utc>),
    CreatedBefore(DateTime<Utc>),
    UpdatedAfter(DateTime<Utc>),
    UpdatedBefore(DateTime<Utc>),
    /// Name OR description contains the term
    TextSearch(String),
}

pub type ProductSpecification = Specification<ProductCriterion>;

impl Criterion for ProductCriterion {
    type Item = Product;

    fn condition(&self) -> Condition {
        let expr = match self {
            ProductCriterion::NameContains(term) => contains_ignore_case(Column::Name, term),
            ProductCriterion::DescriptionContains(term) => {
                contains_ignore_case(Column::Description, term)
            }
            ProductCriterion::CategoryIs(id) => Column::CategoryId.eq(*id),
            ProductCriterion::PriceAtLeast(price) => Column::Price.gte(*price),
            ProductCriterion::PriceAtMost(price) => Column::Price.lte(*price),
            ProductCriterion::PriceBelow(price) => Column::Price.lt(*price),
            ProductCriterion::InStockIs(in_stock) => Column::InStock.eq(*in_stock),
            ProductCriterion::StockAtLeast(stock) => Column::Stock.gte(*stock),
            ProductCriterion::CreatedAfter(at) => Column::CreatedAt.gte(*at),
            ProductCriterion::CreatedBefore(at) => Column::CreatedAt.lte(*at),
            ProductCriterion::UpdatedAfter(at) => Column::UpdatedAt.gte(*at),
            ProductCriterion::UpdatedBefore(at) => Column::UpdatedAt.lte(*at),
            ProductCriterion::TextSearch(term) => {
                return Condition::any()
                    .add(contains_ignore_case(Column::Name, term))
                    .add(contains_ignore_case(Column::Description, term));
            }
        };
        Condition::all().add(expr)
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            ProductCriterion::NameContains(term) => {
                text_contains_ignore_case(Some(&product.name), term)
            }
            ProductCriterion::DescriptionContains(term) => {
                text_contains_ignore_case(product.description.as_deref(), term)
            }
            ProductCriterion::CategoryIs(id) => product.category_id == Some(*id),
            ProductCriterion::PriceAtLeast(price) => product.price >= *price,
            ProductCriterion::PriceAtMost(price) => product.price <= *price,
            ProductCriterion::PriceBelow(price) => product.price < *price,
            ProductCriterion::InStockIs(in_stock) => product.in_stock == *in_stock,
            ProductCriterion::StockAtLeast(stock) => product.stock >= *stock,
            ProductCriterion::CreatedAfter(at) => product.created_at >= *at,
            ProductCriterion::CreatedBefore(at) => product.created_at <= *at,
            ProductCriterion::UpdatedAfter(at) => product.updated_at >= *at,
            ProductCriterion::UpdatedBefore(at) => product.updated_at <= *at,
            ProductCriterion::TextSearch(term) => {
                text_contains_ignore_case(Some(&product.name), term)
                    || text_contains_ignore_case(product.description.as_deref(), term)
            }
        }
    }
}

pub fn name_contains(name: &str) -> ProductSpecification {
    ProductSpecification::all()
        .and_opt(normalize_term(Some(name)).map(ProductCriterion::NameContains))
}

pub fn price_below(price: Decimal) -> ProductSpecification {
    ProductSpecification::from(ProductCriterion::PriceBelow(price))
}

pub fn in_stock() -> ProductSpecification {
    ProductSpecification::from(ProductCriterion::InStockIs(true))
}

pub fn in_category(category_id: i64) -> ProductSpecification {
    ProductSpecification::from(ProductCriterion::CategoryIs(category_id))
}

pub fn category_with_filters(
    category_id: i64,
    query: &CategoryProductsQuery,
) -> ProductSpecification {
    in_category(category_id)
        .and_opt(normalize_term(query.name.as_deref()).map(ProductCriterion::NameContains))
        .and_opt(query.min_price.map(ProductCriterion::PriceAtLeast))
        .and_opt(query.max_price.map(ProductCriterion::PriceAtMost))
        .and_opt(query.in_stock.map(ProductCriterion::InStockIs))
}

pub fn category_text_search(category_id: i64, term: &str) -> ProductSpecification {
    in_category(category_id).and_opt(normalize_term(Some(term)).map(ProductCriterion::TextSearch))
}

impl From<&ProductFilter> for ProductSpecification {
    fn from(filter: &ProductFilter) -> Self {
        ProductSpecification::all()
            .and_opt(normalize_term(filter.name.as_deref()).map(ProductCriterion::NameContains))
            .and_opt(
                normalize_term(filter.description.as_deref())
                    .map(ProductCriterion::DescriptionContains),
            )
            .and_opt(filter.category_id.map(ProductCriterion::CategoryIs))
            .and_opt(filter.min_price.map(ProductCriterion::PriceAtLeast))
            .and_opt(filter.max_price.map(ProductCriterion::PriceAtMost))
            .and_opt(filter.in_stock.map(ProductCriterion::InStockIs))
            .and_opt(filter.min_stock.map(ProductCriterion::StockAtLeast))
            .and_opt(filter.created_after.map(ProductCriterion::CreatedAfter))
            .and_opt(filter.created_before.map(ProductCriterion::CreatedBefore))
            .and_opt(filter.updated_after.map(ProductCriterion::UpdatedAfter))
            .and_opt(filter.updated_before.map(ProductCriterion::UpdatedBefore))
    }
}
