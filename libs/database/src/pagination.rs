//! Counted and uncounted pagination.
//!
//! A [`Page`] answers "how many in total?" with an extra `COUNT(*)`; a
//! [`Slice`] only answers "is there more?" by fetching one row past the
//! requested size. Both are built either from a sea-orm [`Select`]
//! ([`fetch_page`], [`fetch_slice`]) or from an already filtered and sorted
//! `Vec` ([`Page::from_items`], [`Slice::from_items`]) for in-memory stores.

use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Iterable, Order, PaginatorTrait,
    PrimaryKeyToColumn, QueryOrder, QuerySelect, Select,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page number whose offset still fits a SQL `BIGINT`
pub const MAX_PAGE_NUMBER: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Unknown sort field '{0}'")]
    UnknownSortField(String),

    #[error("Invalid sort direction '{0}': expected ASC or DESC")]
    InvalidDirection(String),

    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidSize(u64),

    #[error("Page number must not exceed {MAX_PAGE_NUMBER}, got {0}")]
    InvalidPage(u64),
}

impl PaginationError {
    fn field(&self) -> &'static str {
        match self {
            PaginationError::UnknownSortField(_) => "sort",
            PaginationError::InvalidDirection(_) => "direction",
            PaginationError::InvalidSize(_) => "size",
            PaginationError::InvalidPage(_) => "page",
        }
    }
}

/// Lets pagination problems surface as ordinary field validation failures.
impl From<PaginationError> for ValidationErrors {
    fn from(err: PaginationError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            err.field(),
            ValidationError::new("invalid_pagination").with_message(err.to_string().into()),
        );
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

impl FromStr for SortDirection {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(PaginationError::InvalidDirection(s.to_string())),
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// An allow-listed sortable field of some entity.
///
/// `column` drives SQL ordering; `compare` gives in-memory stores the same
/// order. `compare_ids` is the primary key tie-breaker applied after the
/// field on both paths.
pub trait SortField: Copy + fmt::Debug + Send + Sync + 'static {
    type Column: sea_orm::ColumnTrait;
    type Item;

    fn column(self) -> Self::Column;

    fn compare(self, a: &Self::Item, b: &Self::Item) -> Ordering;

    fn compare_ids(a: &Self::Item, b: &Self::Item) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Sort<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Orders by the field, then by every primary key column ascending.
    pub fn apply<E>(&self, select: Select<E>) -> Select<E>
    where
        E: EntityTrait<Column = F::Column>,
    {
        let mut select = select.order_by(self.field.column(), self.direction.into());
        for key in E::PrimaryKey::iter() {
            select = select.order_by(key.into_column(), Order::Asc);
        }
        select
    }

    pub fn sort_items(&self, items: &mut [F::Item]) {
        let field = self.field;
        let direction = self.direction;
        items.sort_by(|a, b| {
            let ordering = field.compare(a, b);
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| F::compare_ids(a, b))
        });
    }
}

/// Zero-based page number, page size and sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page: u64,
    pub size: u64,
    pub sort: Sort<F>,
}

impl<F: SortField> PageRequest<F> {
    pub fn new(page: u64, size: u64, sort: Sort<F>) -> Result<Self, PaginationError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidSize(size));
        }
        if page > MAX_PAGE_NUMBER {
            return Err(PaginationError::InvalidPage(page));
        }
        Ok(Self { page, size, sort })
    }

    pub fn first(size: u64, sort: Sort<F>) -> Result<Self, PaginationError> {
        Self::new(0, size, sort)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..*self
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// Lowercased name with `_` and `-` removed, so `createdAt`, `created_at`
/// and `CREATED_AT` compare equal.
pub fn sort_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Builds a request, falling back to `default_field` when no sort is given.
pub fn page_request<F>(
    page: u64,
    size: u64,
    sort_by: Option<&str>,
    direction: SortDirection,
    default_field: F,
) -> Result<PageRequest<F>, PaginationError>
where
    F: SortField + FromStr<Err = PaginationError>,
{
    let field = match sort_by.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.parse()?,
        None => default_field,
    };
    PageRequest::new(page, size, Sort { field, direction })
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// `?page=&size=&sort=&direction=` query parameters.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number
    #[serde(default)]
    #[validate(range(max = MAX_PAGE_NUMBER))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: u64,
    /// Sort field name, camelCase or snake_case
    #[validate(length(max = 50))]
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
            direction: None,
        }
    }
}

impl PageParams {
    pub fn to_request<F>(&self, default_field: F) -> Result<PageRequest<F>, PaginationError>
    where
        F: SortField + FromStr<Err = PaginationError>,
    {
        page_request(
            self.page,
            self.size,
            self.sort.as_deref(),
            self.direction.unwrap_or_default(),
            default_field,
        )
    }
}

/// A page of results with totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            last: page.saturating_add(1) >= total_pages,
        }
    }

    /// Cuts one page out of the full, already sorted result.
    pub fn from_items<F>(items: Vec<T>, request: &PageRequest<F>) -> Self {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.page.saturating_mul(request.size) as usize)
            .take(request.size as usize)
            .collect();
        Self::new(content, request.page, request.size, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

/// A page of results without totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub has_next: bool,
    pub first: bool,
}

impl<T> Slice<T> {
    pub fn new(content: Vec<T>, page: u64, size: u64, has_next: bool) -> Self {
        Self {
            content,
            page,
            size,
            has_next,
            first: page == 0,
        }
    }

    /// Takes `size + 1` rows starting at the offset; the extra row only sets
    /// `has_next`.
    pub fn from_items<F>(items: Vec<T>, request: &PageRequest<F>) -> Self {
        let mut content: Vec<T> = items
            .into_iter()
            .skip(request.page.saturating_mul(request.size) as usize)
            .take(request.size as usize + 1)
            .collect();
        let has_next = content.len() as u64 > request.size;
        content.truncate(request.size as usize);
        Self::new(content, request.page, request.size, has_next)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            has_next: self.has_next,
            first: self.first,
        }
    }
}

/// Runs `COUNT(*)` for `select`, then fetches the requested page.
pub async fn fetch_page<E, F, C>(
    db: &C,
    select: Select<E>,
    request: &PageRequest<F>,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait<Column = F::Column>,
    E::Model: FromQueryResult + Send + Sync,
    F: SortField,
    C: ConnectionTrait,
{
    let total = select.clone().count(db).await?;
    let content = request
        .sort
        .apply(select)
        .offset(request.offset())
        .limit(request.size)
        .all(db)
        .await?;

    Ok(Page::new(content, request.page, request.size, total))
}

/// Fetches `size + 1` rows to decide `has_next`; never counts.
pub async fn fetch_slice<E, F, C>(
    db: &C,
    select: Select<E>,
    request: &PageRequest<F>,
) -> Result<Slice<E::Model>, DbErr>
where
    E: EntityTrait<Column = F::Column>,
    E::Model: FromQueryResult + Send + Sync,
    F: SortField,
    C: ConnectionTrait,
{
    let mut content = request
        .sort
        .apply(select)
        .offset(request.offset())
        .limit(request.size + 1)
        .all(db)
        .await?;

    let has_next = content.len() as u64 > request.size;
    content.truncate(request.size as usize);

    Ok(Slice::new(content, request.page, request.size, has_next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    mod widget {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "widgets")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub name: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[derive(Debug, Clone, Copy)]
    enum WidgetSort {
        Id,
        Name,
    }

    impl SortField for WidgetSort {
        type Column = widget::Column;
        type Item = widget::Model;

        fn column(self) -> widget::Column {
            match self {
                WidgetSort::Id => widget::Column::Id,
                WidgetSort::Name => widget::Column::Name,
            }
        }

        fn compare(self, a: &widget::Model, b: &widget::Model) -> Ordering {
            match self {
                WidgetSort::Id => a.id.cmp(&b.id),
                WidgetSort::Name => a.name.cmp(&b.name),
            }
        }

        fn compare_ids(a: &widget::Model, b: &widget::Model) -> Ordering {
            a.id.cmp(&b.id)
        }
    }

    fn widget(id: i64, name: &str) -> widget::Model {
        widget::Model {
            id,
            name: name.to_string(),
        }
    }

    fn request(page: u64, size: u64) -> PageRequest<WidgetSort> {
        PageRequest::new(page, size, Sort::asc(WidgetSort::Id)).unwrap()
    }

    #[test]
    fn test_page_totals() {
        let page = Page::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);

        let last = Page::new(vec![7], 2, 3, 7);
        assert!(last.last);

        let empty: Page<i32> = Page::new(vec![], 0, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first && empty.last);
    }

    #[test]
    fn test_from_items_page_and_slice_agree_on_content() {
        let items: Vec<i32> = (1..=25).collect();

        let page = Page::from_items(items.clone(), &request(2, 10));
        assert_eq!(page.content, (21..=25).collect::<Vec<_>>());
        assert_eq!(page.total_elements, 25);
        assert!(page.last);

        let slice = Slice::from_items(items.clone(), &request(1, 10));
        assert_eq!(slice.content, (11..=20).collect::<Vec<_>>());
        assert!(slice.has_next);

        let tail = Slice::from_items(items, &request(2, 10));
        assert_eq!(tail.content.len(), 5);
        assert!(!tail.has_next);
    }

    #[test]
    fn test_slice_json_has_no_total() {
        let slice = Slice::new(vec![1], 0, 1, true);
        let json = serde_json::to_value(&slice).unwrap();
        assert!(json.get("total_elements").is_none());
        assert_eq!(json["has_next"], true);
    }

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(
            PageRequest::new(0, 0, Sort::asc(WidgetSort::Id)).unwrap_err(),
            PaginationError::InvalidSize(0)
        );
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1, Sort::asc(WidgetSort::Id)).is_err());
        assert_eq!(request(3, 20).offset(), 60);
        assert_eq!(request(3, 20).next().page, 4);
    }

    #[test]
    fn test_page_number_is_bounded_by_bigint_offset() {
        let last = request(MAX_PAGE_NUMBER, MAX_PAGE_SIZE);
        assert!(last.offset() <= i64::MAX as u64);

        assert_eq!(
            PageRequest::new(u64::MAX, 10, Sort::asc(WidgetSort::Id)).unwrap_err(),
            PaginationError::InvalidPage(u64::MAX)
        );
        let errors: ValidationErrors = PaginationError::InvalidPage(u64::MAX).into();
        assert!(errors.field_errors().contains_key("page"));

        let page = Page::new(Vec::<i32>::new(), u64::MAX, 10, 3);
        assert!(page.last);
    }

    #[test]
    fn test_sort_key_ignores_case_and_separators() {
        assert_eq!(sort_key("createdAt"), "createdat");
        assert_eq!(sort_key(" created_at "), "createdat");
        assert_eq!(sort_key("IN_STOCK"), sort_key("inStock"));
    }

    #[test]
    fn test_pagination_error_becomes_field_error() {
        let errors: ValidationErrors = PaginationError::UnknownSortField("color".into()).into();
        assert!(errors.field_errors().contains_key("sort"));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(" ASC ".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_sort_items_breaks_ties_by_id() {
        let mut items = vec![widget(3, "b"), widget(1, "b"), widget(2, "a")];
        Sort::desc(WidgetSort::Name).sort_items(&mut items);
        let ids: Vec<i64> = items.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_apply_adds_primary_key_tiebreaker() {
        let sql = Sort::desc(WidgetSort::Name)
            .apply(widget::Entity::find())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.ends_with(r#"ORDER BY "widgets"."name" DESC, "widgets"."id" ASC"#));
    }

    #[tokio::test]
    async fn test_fetch_slice_detects_next_from_extra_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget(1, "a"), widget(2, "b"), widget(3, "c")]])
            .into_connection();

        let slice = fetch_slice(&db, widget::Entity::find(), &request(0, 2))
            .await
            .unwrap();

        // Only one result set is queued, so a count query would starve the fetch.
        assert_eq!(slice.content.len(), 2);
        assert!(slice.has_next);
    }
}
