//! Demo catalog inserted on first start

use domain_categories::{CategoryRepository, CategoryService, CreateCategory};
use domain_products::{CreateProduct, ProductRepository, ProductService};
use eyre::WrapErr;
use rust_decimal::Decimal;
use tracing::info;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    /// Price in cents
    price: i64,
    stock: i32,
}

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    products: [SeedProduct; 3],
}

const fn product(
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
) -> SeedProduct {
    SeedProduct {
        name,
        description,
        price,
        stock,
    }
}

const CATALOG: [SeedCategory; 4] = [
    SeedCategory {
        name: "Electronics",
        description: "Electronic devices and accessories",
        products: [
            product("Smartphone X", "Latest smartphone with advanced features", 99999, 50),
            product("Laptop Pro", "High-performance laptop for professionals", 149999, 30),
            product("Wireless Headphones", "Noise-cancelling wireless headphones", 19999, 100),
        ],
    },
    SeedCategory {
        name: "Clothing",
        description: "Apparel and fashion items",
        products: [
            product("Cotton T-Shirt", "Comfortable cotton t-shirt in various colors", 1999, 200),
            product("Slim Fit Jeans", "Classic slim fit jeans for everyday wear", 4999, 150),
            product("Winter Jacket", "Warm winter jacket with water-resistant exterior", 12999, 75),
        ],
    },
    SeedCategory {
        name: "Books",
        description: "Books, e-books, and publications",
        products: [
            product("Bestselling Novel", "Award-winning fiction novel by renowned author", 1499, 300),
            product("Gourmet Cookbook", "Collection of gourmet recipes from around the world", 2999, 120),
            product("Computer Science Textbook", "Comprehensive guide to computer science principles", 7999, 0),
        ],
    },
    SeedCategory {
        name: "Home & Kitchen",
        description: "Home appliances and kitchen essentials",
        products: [
            product("High-Speed Blender", "Powerful blender for smoothies and food preparation", 8999, 60),
            product("Programmable Coffee Maker", "Automatic coffee maker with timer and multiple settings", 5999, 45),
            product("4-Slice Toaster", "Stainless steel toaster with multiple browning settings", 3999, 80),
        ],
    },
];

/// Inserts the demo categories and products unless any category exists.
///
/// Returns whether anything was inserted.
pub async fn seed_catalog<P, C>(
    categories: &CategoryService<C>,
    products: &ProductService<P, C>,
) -> eyre::Result<bool>
where
    P: ProductRepository,
    C: CategoryRepository,
{
    let existing = categories
        .count_categories()
        .await
        .wrap_err("Failed to count categories before seeding")?;
    if existing > 0 {
        info!(existing, "Categories already present, skipping seed data");
        return Ok(false);
    }

    for seed in &CATALOG {
        let category = categories
            .create_category(CreateCategory {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
            })
            .await
            .wrap_err_with(|| format!("Failed to seed category {}", seed.name))?;

        for item in &seed.products {
            products
                .create_product(CreateProduct {
                    name: item.name.to_string(),
                    description: Some(item.description.to_string()),
                    price: Decimal::new(item.price, 2),
                    in_stock: item.stock > 0,
                    stock: item.stock,
                    category_id: Some(category.id),
                    base64_file: None,
                })
                .await
                .wrap_err_with(|| format!("Failed to seed product {}", item.name))?;
        }
    }

    info!(
        categories = CATALOG.len(),
        products = CATALOG.len() * 3,
        "Seed data inserted"
    );
    Ok(true)
}
