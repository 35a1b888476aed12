//! Handler tests for Products domain
//!
//! The product and category routers are assembled the way the API does it,
//! over shared in-memory repositories.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use database::{Page, Slice};
use domain_categories::{
    Category, CategoryService, CreateCategory, InMemoryCategoryRepository,
    handlers as category_handlers,
};
use domain_products::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

type Service = ProductService<InMemoryProductRepository, InMemoryCategoryRepository>;

struct TestApp {
    router: Router,
    products: Service,
    categories: CategoryService<InMemoryCategoryRepository>,
}

fn app() -> TestApp {
    let category_repo = InMemoryCategoryRepository::new();
    let products = ProductService::new(
        InMemoryProductRepository::with_categories(category_repo.clone()),
        Arc::new(category_repo.clone()),
    );
    let categories = CategoryService::new(category_repo);

    let router = Router::new()
        .nest("/products", handlers::router(products.clone()))
        .nest(
            "/categories",
            category_handlers::router(categories.clone())
                .merge(handlers::category_products_router(products.clone())),
        );

    TestApp {
        router,
        products,
        categories,
    }
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn category(app: &TestApp, name: &str) -> Category {
    app.categories
        .create_category(CreateCategory {
            name: name.into(),
            description: None,
        })
        .await
        .unwrap()
}

async fn product(
    app: &TestApp,
    name: &str,
    price: &str,
    in_stock: bool,
    category_id: Option<i64>,
) -> Product {
    app.products
        .create_product(CreateProduct {
            name: name.into(),
            description: Some(format!("{} description", name)),
            price: dec(price),
            in_stock,
            stock: if in_stock { 10 } else { 0 },
            category_id,
            base64_file: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_product_in_category_then_list_by_category() {
    let app = app();
    let electronics = category(&app, "Electronics").await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/products",
            json!({
                "name": "Smartphone X",
                "price": "999.99",
                "in_stock": true,
                "stock": 50,
                "category_id": electronics.id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.price, dec("999.99"));
    assert_eq!(created.category_id, Some(electronics.id));

    let response = app
        .router
        .oneshot(get(&format!("/categories/{}/products", electronics.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products, vec![created]);
}

#[tokio::test]
async fn test_create_with_unknown_category_is_category_not_found() {
    let app = app();

    let response = app
        .router
        .oneshot(post_json(
            "/products",
            json!({ "name": "Orphan", "price": "1.00", "category_id": 42 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem: Value = json_body(response.into_body()).await;
    assert_eq!(problem["title"], "Category Not Found");
}

#[tokio::test]
async fn test_create_with_zero_price_is_validation_problem() {
    let app = app();

    let response = app
        .router
        .oneshot(post_json("/products", json!({ "name": "Free", "price": "0" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem: Value = json_body(response.into_body()).await;
    assert_eq!(problem["code"], "VALIDATION_ERROR");
    assert!(problem["errors"]["price"].is_string());
}

#[tokio::test]
async fn test_get_missing_product_is_product_not_found() {
    let app = app();

    let response = app.router.oneshot(get("/products/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem: Value = json_body(response.into_body()).await;
    assert_eq!(problem["title"], "Product Not Found");
    assert_eq!(problem["detail"], "Product not found with id: 7");
}

#[tokio::test]
async fn test_filter_by_price_range() {
    let app = app();
    product(&app, "Budget", "200.00", true, None).await;
    product(&app, "Mid", "800.00", true, None).await;
    product(&app, "Upper", "1400.00", false, None).await;
    product(&app, "Premium", "2000.00", true, None).await;

    let response = app
        .router
        .oneshot(post_json(
            "/products/filter",
            json!({ "min_price": "500", "max_price": "1500", "sort_by": "price" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Page<Product> = json_body(response.into_body()).await;
    let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Mid", "Upper"]);
    assert_eq!(page.total_elements, 2);
}

#[tokio::test]
async fn test_filter_requires_a_primary_criterion() {
    let app = app();

    let response = app
        .router
        .oneshot(post_json("/products/filter", json!({ "in_stock": true })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_under_price_is_exclusive() {
    let app = app();
    product(&app, "Cheap", "9.99", true, None).await;
    product(&app, "Exact", "10.00", true, None).await;

    let response = app
        .router
        .oneshot(get("/products/under-price?price=10.00"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Cheap");
}

#[tokio::test]
async fn test_in_stock_slice_has_next() {
    let app = app();
    product(&app, "A", "1.00", true, None).await;
    product(&app, "B", "1.00", false, None).await;
    product(&app, "C", "1.00", true, None).await;

    let response = app
        .router
        .oneshot(get("/products/in-stock/slice?size=1"))
        .await
        .unwrap();

    let slice: Slice<Product> = json_body(response.into_body()).await;
    assert_eq!(slice.content[0].name, "A");
    assert!(slice.has_next);
}

#[tokio::test]
async fn test_category_routes_answer_404_for_unknown_category() {
    let app = app();

    for uri in [
        "/categories/5/products",
        "/categories/5/products/paged",
        "/categories/5/products/counted",
        "/categories/5/products/filter",
        "/categories/5/products/by-stock-status",
        "/categories/5/products/with-category",
    ] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_category_text_search_for_unknown_category_is_empty() {
    let app = app();

    let response = app
        .router
        .oneshot(get("/categories/5/products/search?term=phone"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_category_text_search_matches_description() {
    let app = app();
    let books = category(&app, "Books").await;
    product(&app, "Novel", "12.00", true, Some(books.id)).await;
    product(&app, "Atlas", "30.00", true, Some(books.id)).await;

    let response = app
        .router
        .oneshot(get(&format!(
            "/categories/{}/products/search?term=NOVEL%20DESC",
            books.id
        )))
        .await
        .unwrap();

    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Novel");
}

#[tokio::test]
async fn test_category_filter_narrows_by_stock_and_price() {
    let app = app();
    let tools = category(&app, "Tools").await;
    product(&app, "Hammer", "15.00", true, Some(tools.id)).await;
    product(&app, "Drill", "120.00", true, Some(tools.id)).await;
    product(&app, "Saw", "25.00", false, Some(tools.id)).await;

    let response = app
        .router
        .oneshot(get(&format!(
            "/categories/{}/products/filter?max_price=100&in_stock=true",
            tools.id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Hammer");
}

#[tokio::test]
async fn test_stock_status_lists_in_stock_first() {
    let app = app();
    let garden = category(&app, "Garden").await;
    product(&app, "Hose", "20.00", false, Some(garden.id)).await;
    product(&app, "Rake", "18.00", true, Some(garden.id)).await;

    let response = app
        .router
        .oneshot(get(&format!(
            "/categories/{}/products/by-stock-status",
            garden.id
        )))
        .await
        .unwrap();

    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Rake", "Hose"]);
}

#[tokio::test]
async fn test_with_category_embeds_the_category() {
    let app = app();
    let toys = category(&app, "Toys").await;
    product(&app, "Kite", "9.00", true, Some(toys.id)).await;

    let response = app
        .router
        .oneshot(get(&format!("/categories/{}/products/with-category", toys.id)))
        .await
        .unwrap();

    let rows: Vec<ProductWithCategory> = json_body(response.into_body()).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category.as_ref(), Some(&toys));
}

#[tokio::test]
async fn test_category_counted_and_paged_shapes() {
    let app = app();
    let office = category(&app, "Office").await;
    for name in ["Pen", "Stapler", "Tape"] {
        product(&app, name, "2.00", true, Some(office.id)).await;
    }

    let response = app
        .router
        .clone()
        .oneshot(get(&format!(
            "/categories/{}/products/counted?size=2",
            office.id
        )))
        .await
        .unwrap();
    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["total_elements"], 3);
    assert_eq!(page["total_pages"], 2);

    let response = app
        .router
        .oneshot(get(&format!(
            "/categories/{}/products/paged?size=2&page=1",
            office.id
        )))
        .await
        .unwrap();
    let slice: Value = json_body(response.into_body()).await;
    assert_eq!(slice["content"].as_array().unwrap().len(), 1);
    assert_eq!(slice["has_next"], false);
    assert!(slice.get("total_elements").is_none());
}

#[tokio::test]
async fn test_deleting_category_detaches_its_products() {
    let app = app();
    let music = category(&app, "Music").await;
    let guitar = product(&app, "Guitar", "300.00", true, Some(music.id)).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/categories/{}", music.id))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router
        .oneshot(get(&format!("/products/{}", guitar.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let kept: Product = json_body(response.into_body()).await;
    assert_eq!(kept.name, "Guitar");
    assert_eq!(kept.category_id, None);
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_update_writes_only_supplied_fields() {
    let app = app();
    let garden = category(&app, "Garden").await;
    let hose = product(&app, "Hose", "25.00", true, None).await;

    let response = app
        .router
        .oneshot(put_json(
            &format!("/products/{}", hose.id),
            json!({ "price": "19.50", "category_id": garden.id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price, dec("19.50"));
    assert_eq!(updated.category_id, Some(garden.id));
    assert_eq!(updated.name, "Hose");
    assert_eq!(updated.description, hose.description);
    assert_eq!(updated.stock, 10);
    assert_eq!(updated.created_at, hose.created_at);
    assert!(updated.updated_at >= hose.updated_at);
}

#[tokio::test]
async fn test_update_missing_product_is_product_not_found() {
    let app = app();

    let response = app
        .router
        .oneshot(put_json("/products/404", json!({ "name": "Ghost" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem: Value = json_body(response.into_body()).await;
    assert_eq!(problem["title"], "Product Not Found");
}

#[tokio::test]
async fn test_update_to_unknown_category_is_category_not_found() {
    let app = app();
    let hose = product(&app, "Hose", "25.00", true, None).await;

    let response = app
        .router
        .clone()
        .oneshot(put_json(
            &format!("/products/{}", hose.id),
            json!({ "category_id": 77 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem: Value = json_body(response.into_body()).await;
    assert_eq!(problem["title"], "Category Not Found");

    let unchanged = app.products.get_product(hose.id).await.unwrap();
    assert_eq!(unchanged.category_id, None);
}

#[tokio::test]
async fn test_price_beyond_column_precision_is_validation_problem() {
    let app = app();

    for price in ["10000000000.00", "1.999"] {
        let response = app
            .router
            .clone()
            .oneshot(post_json("/products", json!({ "name": "Gold", "price": price })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {}", price);
        let problem: Value = json_body(response.into_body()).await;
        assert_eq!(problem["code"], "VALIDATION_ERROR");
        assert!(problem["errors"]["price"].is_string());
    }
}

#[tokio::test]
async fn test_huge_page_number_is_bad_request() {
    let app = app();
    product(&app, "Only", "1.00", true, None).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/products/paged?page=18446744073709551615"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(post_json(
            "/products/filter",
            json!({ "name": "Only", "page": u64::MAX }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem: Value = json_body(response.into_body()).await;
    assert!(problem["errors"]["page"].is_string());
}
