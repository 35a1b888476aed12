//! Category search criteria.

use chrono::{DateTime, Utc};
use database::{
    Criterion, Specification, contains_ignore_case, normalize_term, text_contains_ignore_case,
};
use sea_orm::{ColumnTrait, Condition};

use crate::entity::Column;
use crate::models::{Category, CategoryFilter};

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryCriterion {
    NameContains(String),
    DescriptionContains(String),
    CreatedAfter(DateTime<Utc>),
    CreatedBefore(DateTime<Utc>),
    UpdatedAfter(DateTime<Utc>),
    UpdatedBefore(DateTime<Utc>),
}

pub type CategorySpecification = Specification<CategoryCriterion>;

impl Criterion for CategoryCriterion {
    type Item = Category;

    fn condition(&self) -> Condition {
        let expr = match self {
            CategoryCriterion::NameContains(term) => contains_ignore_case(Column::Name, term),
            CategoryCriterion::DescriptionContains(term) => {
                contains_ignore_case(Column::Description, term)
            }
            CategoryCriterion::CreatedAfter(at) => Column::CreatedAt.gte(*at),
            CategoryCriterion::CreatedBefore(at) => Column::CreatedAt.lte(*at),
            CategoryCriterion::UpdatedAfter(at) => Column::UpdatedAt.gte(*at),
            CategoryCriterion::UpdatedBefore(at) => Column::UpdatedAt.lte(*at),
        };
        Condition::all().add(expr)
    }

    fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryCriterion::NameContains(term) => {
                text_contains_ignore_case(Some(&category.name), term)
            }
            CategoryCriterion::DescriptionContains(term) => {
                text_contains_ignore_case(category.description.as_deref(), term)
            }
            CategoryCriterion::CreatedAfter(at) => category.created_at >= *at,
            CategoryCriterion::CreatedBefore(at) => category.created_at <= *at,
            CategoryCriterion::UpdatedAfter(at) => category.updated_at >= *at,
            CategoryCriterion::UpdatedBefore(at) => category.updated_at <= *at,
        }
    }
}

/// Name search used by the `/search` endpoints; a blank term matches all.
pub fn name_contains(name: &str) -> CategorySpecification {
    CategorySpecification::all()
        .and_opt(normalize_term(Some(name)).map(CategoryCriterion::NameContains))
}

impl From<&CategoryFilter> for CategorySpecification {
    fn from(filter: &CategoryFilter) -> Self {
        CategorySpecification::all()
            .and_opt(normalize_term(filter.name.as_deref()).map(CategoryCriterion::NameContains))
            .and_opt(
                normalize_term(filter.description.as_deref())
                    .map(CategoryCriterion::DescriptionContains),
            )
            .and_opt(filter.created_after.map(CategoryCriterion::CreatedAfter))
            .and_opt(filter.created_before.map(CategoryCriterion::CreatedBefore))
            .and_opt(filter.updated_after.map(CategoryCriterion::UpdatedAfter))
            .and_opt(filter.updated_before.map(CategoryCriterion::UpdatedBefore))
    }
}
