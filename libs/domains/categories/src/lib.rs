//! Categories Domain
//!
//! CRUD, name search and criteria filtering for product categories.
//!
//! ```text
//! handlers ─► service ─► repository ─┬─► postgres (sea-orm)
//!                                    └─► in-memory
//! ```
//!
//! Products are not embedded in a category; the products domain owns the
//! `/categories/{id}/products` routes and uses [`CategoryRepository::exists`]
//! to answer 404 for unknown categories.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{handlers, InMemoryCategoryRepository, CategoryService};
//!
//! let service = CategoryService::new(InMemoryCategoryRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod criteria;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use criteria::{CategoryCriterion, CategorySpecification};
pub use error::{CategoryError, CategoryResult};
pub use models::{
    Category, CategoryFilter, CategorySortField, CreateCategory, NameQuery, UpdateCategory,
};
pub use postgres::PgCategoryRepository;
pub use repository::{CategoryDeleteHook, CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
