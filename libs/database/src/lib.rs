//! Database support for the catalog services.
//!
//! - [`postgres`]: connection pool setup (with startup retry), migrations, health checks
//! - [`pagination`]: counted [`Page`] and uncounted [`Slice`] results, [`PageRequest`] and [`Sort`]
//! - [`specification`]: composable query criteria usable both as SQL conditions and
//!   as in-memory predicates
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry, run_migrations};
//! use core_config::FromEnv;
//! use migration::Migrator;
//!
//! let db = connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! run_migrations::<Migrator>(&db, "catalog_api").await?;
//! ```

pub mod common;
pub mod pagination;
pub mod postgres;
pub mod specification;

pub use common::{DatabaseError, DatabaseResult};
pub use pagination::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE, Page, PageParams, PageRequest,
    PaginationError, Slice, Sort, SortDirection, SortField, fetch_page, fetch_slice, page_request,
    sort_key,
};
pub use specification::{
    Criterion, Specification, contains_ignore_case, normalize_term, text_contains_ignore_case,
};
