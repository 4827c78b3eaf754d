//! Catalog seeding command.
//!
//! Inserts the furniture lineup when the catalog is empty. Existing data is
//! never touched, so the command is safe to run on every deploy.

use rust_decimal::Decimal;

use super::{CliError, connect};

/// One seed row. Prices are written as strings to keep them exact.
struct SeedProduct {
    name: &'static str,
    price: &'static str,
    description: &'static str,
    image_url: &'static str,
    category: Option<&'static str>,
    stock: i32,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Modern Sofa",
        price: "999.99",
        description: "A comfortable modern sofa perfect for any living room.",
        image_url: "https://dukaan.b-cdn.net/700x700/webp/upload_file_service/b9ad04a1-66fd-4bb8-b82c-7521d140a2ad/e6a259e677860331e4474bd616f1fccf.webp",
        category: Some("Living Room"),
        stock: 10,
    },
    SeedProduct {
        name: "Dining Table",
        price: "599.99",
        description: "Elegant dining table that seats 6 people.",
        image_url: "https://rukminim2.flixcart.com/image/850/1000/k47cgi80/dining-set/f/g/k/8-seater-brown-rosewood-sheesham-hhfk-17-hariom-handicraft-original-imafn66rskcnv96g.jpeg?q=90&crop=false",
        category: Some("Dining Room"),
        stock: 5,
    },
    SeedProduct {
        name: "Queen Bed Frame",
        price: "799.99",
        description: "Queen size bed frame with headboard.",
        image_url: "https://www.nilkamalsleep.com/cdn/shop/files/1_61f9365a-c5b3-4b95-a64a-69b40203187c_650x.jpg?v=1724666320",
        category: Some("Bedroom"),
        stock: 8,
    },
    SeedProduct {
        name: "Wooden bench",
        price: "1999.99",
        description: "Comfort cushion bench with sleek design.",
        image_url: "https://images.woodenstreet.de/image/data/benches/cambrey-bench-with-back-rest/revised/honey-finish/updated/new-logo/1.jpg",
        category: None,
        stock: 0,
    },
    SeedProduct {
        name: "Sheesham Wooden Table",
        price: "3199.99",
        description: "4 Seater with a beautiful designed table.",
        image_url: "https://thetimberguy.com/cdn/shop/collections/sheesham_wood_furniture_online_suppliers_manufactureres_exporters_from_india_2048x.jpg?v=1565437409",
        category: None,
        stock: 0,
    },
    SeedProduct {
        name: "Burma Wood Cot",
        price: "4199.99",
        description: "Comfort cot where a King size mattress can be used.",
        image_url: "https://www.ediy.in/beds/images/burma/Burma-size-001.jpg",
        category: None,
        stock: 0,
    },
];

/// Seed the product catalog if it is empty.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        tracing::info!("Catalog already has {count} products, nothing to do");
        return Ok(());
    }

    for product in CATALOG {
        let price: Decimal = product.price.parse()?;
        sqlx::query(
            "INSERT INTO product (name, price, description, image_url, category, stock) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(product.name)
        .bind(price)
        .bind(product.description)
        .bind(product.image_url)
        .bind(product.category)
        .bind(product.stock)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeded {} products", CATALOG.len());

    Ok(())
}
