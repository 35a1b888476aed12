use chrono::{DateTime, Utc};
use database::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, PageRequest, PaginationError, SortDirection, page_request,
    sort_key,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn validate_sort_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || CategorySortField::from_str(value).is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("unknown_sort_field")
        .with_message(format!("Unknown sort field '{}'", value).into()))
}

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for a partial update; only supplied fields are written
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Columns a category listing may be sorted by.
///
/// Parsed from either `camelCase` or `snake_case`; anything else is rejected
/// before a query is built.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CategorySortField {
    #[default]
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for CategorySortField {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = sort_key(s);
        Self::iter()
            .find(|field| sort_key(&field.to_string()) == key)
            .ok_or_else(|| PaginationError::UnknownSortField(s.to_string()))
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Search criteria plus pagination for `POST /categories/filter`.
///
/// Every criterion is optional; an empty filter returns all categories.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoryFilter {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(max = MAX_PAGE_NUMBER))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: u64,
    #[validate(length(max = 50), custom(function = "validate_sort_field"))]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            created_after: None,
            created_before: None,
            updated_after: None,
            updated_before: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl CategoryFilter {
    pub fn page_request(&self) -> Result<PageRequest<CategorySortField>, PaginationError> {
        page_request(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.sort_direction,
            CategorySortField::Id,
        )
    }
}

/// `?name=` query for the search endpoints
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    /// Case-insensitive substring of the category name
    #[validate(length(max = 255))]
    pub name: String,
}

impl Category {
    /// Builds a category from the create DTO; `id` is assigned by the store.
    pub fn new(id: i64, input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_page_must_fit_an_offset() {
        let filter = CategoryFilter {
            page: u64::MAX,
            ..Default::default()
        };
        let errors = filter.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
        assert_eq!(
            filter.page_request().unwrap_err(),
            PaginationError::InvalidPage(u64::MAX)
        );
    }

    #[test]
    fn test_sort_field_accepts_both_casings() {
        assert_eq!(
            "createdAt".parse::<CategorySortField>(),
            Ok(CategorySortField::CreatedAt)
        );
        assert_eq!(
            "updated_at".parse::<CategorySortField>(),
            Ok(CategorySortField::UpdatedAt)
        );
        assert_eq!("NAME".parse::<CategorySortField>(), Ok(CategorySortField::Name));
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        assert_eq!(
            "price".parse::<CategorySortField>(),
            Err(PaginationError::UnknownSortField("price".into()))
        );

        let filter = CategoryFilter {
            sort_by: Some("price".into()),
            ..Default::default()
        };
        let errors = filter.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sort_by"));
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let input = CreateCategory {
            name: "   ".into(),
            description: None,
        };
        assert!(input.validate().is_err());

        let update = UpdateCategory {
            name: Some(String::new()),
            description: None,
        };
        assert!(update.validate().is_err());
        assert!(UpdateCategory::default().validate().is_ok());
    }

    #[test]
    fn test_apply_update_keeps_unsupplied_fields() {
        let mut category = Category::new(
            1,
            CreateCategory {
                name: "Books".into(),
                description: Some("Paper".into()),
            },
        );
        let created_at = category.created_at;

        category.apply_update(UpdateCategory {
            name: Some("Ebooks".into()),
            description: None,
        });

        assert_eq!(category.name, "Ebooks");
        assert_eq!(category.description.as_deref(), Some("Paper"));
        assert_eq!(category.created_at, created_at);
        assert!(category.updated_at >= created_at);
    }

    #[test]
    fn test_filter_page_request_defaults_to_id() {
        let request = CategoryFilter::default().page_request().unwrap();
        assert_eq!(request.sort.field, CategorySortField::Id);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
    }
}
