//! Products Domain
//!
//! Product CRUD, name and price lookups, criteria filtering, the
//! category-scoped product routes and a client for the upstream catalog API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /products and /categories/{id}/products
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, category existence checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Specifications → sea-orm or in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, sort fields
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::InMemoryCategoryRepository;
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//! use std::sync::Arc;
//!
//! let categories = InMemoryCategoryRepository::new();
//! let products = InMemoryProductRepository::with_categories(categories.clone());
//! let service = ProductService::new(products, Arc::new(categories));
//!
//! let products_router = handlers::router(service.clone());
//! let category_products_router = handlers::category_products_router(service);
//! ```

pub mod criteria;
pub mod entity;
pub mod error;
pub mod external;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use criteria::{ProductCriterion, ProductSpecification};
pub use error::{ProductError, ProductResult};
pub use external::{ExternalApiError, ExternalCatalogClient, ExternalProduct};
pub use handlers::{ApiDoc, CategoryProductsApiDoc};
pub use models::{
    CategoryProductsQuery, CreateProduct, Product, ProductFilter, ProductSortField,
    ProductWithCategory, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
