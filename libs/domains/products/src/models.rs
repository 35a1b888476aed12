use chrono::{DateTime, Utc};
use database::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, PageRequest, PaginationError, SortDirection, page_request,
    sort_key,
};
use domain_categories::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest decoded attachment accepted on create/update.
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Digits the `NUMERIC(12, 2)` price column can hold
const PRICE_INTEGER_DIGITS: u32 = 10;
const PRICE_FRACTION_DIGITS: u32 = 2;

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if !price.is_sign_positive() || price.is_zero() {
        return Err(ValidationError::new("price").with_message("must be greater than 0".into()));
    }
    if price.normalize().scale() > PRICE_FRACTION_DIGITS
        || price.trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS))
    {
        return Err(ValidationError::new("digits").with_message(
            format!(
                "must have at most {} integer digits and {} decimal places",
                PRICE_INTEGER_DIGITS, PRICE_FRACTION_DIGITS
            )
            .into(),
        ));
    }
    Ok(())
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("range").with_message("must not be negative".into()));
    }
    Ok(())
}

fn validate_sort_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || ProductSortField::from_str(value).is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("unknown_sort_field")
        .with_message(format!("Unknown sort field '{}'", value).into()))
}

/// Decoded size of a base64 payload, ignoring any `data:...;base64,` prefix.
pub fn base64_decoded_size(encoded: &str) -> u64 {
    let payload = match encoded.split_once(',') {
        Some((_, payload)) => payload,
        None => encoded,
    };
    let padding = if payload.ends_with("==") {
        2
    } else if payload.ends_with('=') {
        1
    } else {
        0
    };
    ((payload.len() as u64) * 3 / 4).saturating_sub(padding)
}

fn validate_base64_size(encoded: &str) -> Result<(), ValidationError> {
    let size = base64_decoded_size(encoded);
    if size > MAX_FILE_SIZE_BYTES {
        tracing::info!(size, max = MAX_FILE_SIZE_BYTES, "Rejected oversized file");
        return Err(ValidationError::new("file_size")
            .with_message(format!("file must not exceed {} bytes", MAX_FILE_SIZE_BYTES).into()));
    }
    Ok(())
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Serialized as a decimal string, e.g. `"999.99"`
    pub price: Decimal,
    pub in_stock: bool,
    pub stock: i32,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product loaded together with its category in one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category: Option<Category>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(range(min = 1))]
    pub category_id: Option<i64>,
    /// Optional base64 attachment, at most 5 MiB once decoded
    #[serde(default, skip_serializing)]
    #[validate(custom(function = "validate_base64_size"))]
    pub base64_file: Option<String>,
}

/// DTO for a partial update; only supplied fields are written
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    pub in_stock: Option<bool>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(range(min = 1))]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing)]
    #[validate(custom(function = "validate_base64_size"))]
    pub base64_file: Option<String>,
}

/// Columns a product listing may be sorted by
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
pub enum ProductSortField {
    #[default]
    Id,
    Name,
    Description,
    Price,
    InStock,
    Stock,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for ProductSortField {
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

fn validate_has_primary_criterion(filter: &ProductFilter) -> Result<(), ValidationError> {
    let present = filter.name.is_some()
        || filter.min_price.is_some()
        || filter.max_price.is_some()
        || filter.category_id.is_some()
        || filter.description.is_some();
    if present {
        return Ok(());
    }
    Err(ValidationError::new("at_least_one_field").with_message(
        "At least one of name, min_price, max_price, category_id or description is required"
            .into(),
    ))
}

/// Search criteria plus pagination for `POST /products/filter`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "validate_has_primary_criterion"))]
pub struct ProductFilter {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<i64>,
    #[validate(custom(function = "validate_non_negative"))]
    pub min_price: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,
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

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            category_id: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            min_stock: None,
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

impl ProductFilter {
    pub fn page_request(&self) -> Result<PageRequest<ProductSortField>, PaginationError> {
        page_request(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.sort_direction,
            ProductSortField::Id,
        )
    }
}

/// `?name=` query for the search endpoints
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    /// Case-insensitive substring of the product name
    #[validate(length(max = 255))]
    pub name: String,
}

/// `?price=` query for the under-price endpoints
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    /// Exclusive upper bound
    #[param(value_type = String)]
    pub price: Decimal,
}

/// `?term=` query for the category text search
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermQuery {
    /// Matched against name or description, ignoring case
    #[validate(length(max = 255))]
    pub term: String,
}

/// Optional narrowing for `GET /categories/{id}/products/filter`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryProductsQuery {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[param(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative"))]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative"))]
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
}

impl Product {
    /// Builds a product from the create DTO; `id` is assigned by the store.
    pub fn new(id: i64, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            in_stock: input.in_stock,
            stock: input.stock,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(in_stock) = update.in_stock {
            self.in_stock = in_stock;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(price: Decimal) -> CreateProduct {
        CreateProduct {
            name: "Smartphone X".into(),
            description: None,
            price,
            in_stock: true,
            stock: 50,
            category_id: None,
            base64_file: None,
        }
    }

    #[test]
    fn test_price_must_be_positive() {
        assert!(create(Decimal::new(99999, 2)).validate().is_ok());
        assert!(create(Decimal::ZERO).validate().is_err());
        assert!(create(Decimal::new(-1, 0)).validate().is_err());
    }

    #[test]
    fn test_price_must_fit_numeric_column() {
        let largest = Decimal::from_str("9999999999.99").unwrap();
        assert!(create(largest).validate().is_ok());
        // trailing zeros do not count as decimal places
        assert!(create(Decimal::from_str("1.5000").unwrap()).validate().is_ok());

        for raw in ["10000000000", "1.999", "0.001"] {
            let errors = create(Decimal::from_str(raw).unwrap()).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("price"), "{} accepted", raw);
        }

        let update = UpdateProduct {
            price: Some(Decimal::from_str("12.345").unwrap()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_negative_stock_is_invalid() {
        let mut input = create(Decimal::ONE);
        input.stock = -1;
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock"));
    }

    #[test]
    fn test_base64_size_ignores_data_uri_prefix_and_padding() {
        assert_eq!(base64_decoded_size("aGVsbG8="), 5);
        assert_eq!(base64_decoded_size("data:text/plain;base64,aGVsbG8="), 5);
        assert_eq!(base64_decoded_size("aGk="), 2);
        assert_eq!(base64_decoded_size(""), 0);
    }

    #[test]
    fn test_base64_file_over_limit_is_rejected() {
        let mut input = create(Decimal::ONE);
        input.base64_file = Some("A".repeat(7 * 1024 * 1024 + 4));
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("base64_file"));

        input.base64_file = Some(String::new());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_filter_requires_a_primary_criterion() {
        let filter = ProductFilter {
            in_stock: Some(true),
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = ProductFilter {
            min_price: Some(Decimal::new(500, 0)),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("inStock".parse(), Ok(ProductSortField::InStock));
        assert_eq!("in_stock".parse(), Ok(ProductSortField::InStock));
        assert_eq!("category_id".parse(), Ok(ProductSortField::CategoryId));
        assert!("weight".parse::<ProductSortField>().is_err());
    }

    #[test]
    fn test_update_leaves_unsupplied_fields() {
        let mut product = Product::new(1, create(Decimal::new(1999, 2)));
        product.apply_update(UpdateProduct {
            stock: Some(0),
            in_stock: Some(false),
            ..Default::default()
        });

        assert_eq!(product.name, "Smartphone X");
        assert_eq!(product.price, Decimal::new(1999, 2));
        assert_eq!(product.stock, 0);
        assert!(!product.in_stock);
    }
}
