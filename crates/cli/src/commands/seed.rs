//! Demo data seeding.
//!
//! Inserts a small catalog (categories, tagged products with images), a
//! demo coupon and two demo accounts, so a fresh database has something to
//! browse. Every insert is idempotent via `ON CONFLICT DO NOTHING`.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use super::CommandError;

/// Demo accounts created by the seed, with their passwords.
const DEMO_USERS: [(&str, &str, &str, &str, &str); 2] = [
    ("admin@electro.example", "admin123!", "Admin", "User", "admin"),
    ("user@electro.example", "user1234", "Demo", "User", "customer"),
];

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing or any insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    seed_users(&pool).await?;
    seed_catalog(&pool).await?;
    seed_coupons(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), CommandError> {
    for (email, password, first_name, last_name, role) in DEMO_USERS {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| CommandError::PasswordHash)?
            .to_string();

        sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(hash)
        .bind(first_name)
        .bind(last_name)
        .bind(role)
        .execute(pool)
        .await?;
    }

    tracing::info!("Seeded {} demo users", DEMO_USERS.len());
    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), CommandError> {
    let categories = [
        ("Laptops", "laptops"),
        ("Smartphones", "smartphones"),
        ("Accessories", "accessories"),
        ("Cameras", "cameras"),
    ];

    for (name, slug) in categories {
        sqlx::query("INSERT INTO categories (name, slug) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING")
            .bind(name)
            .bind(slug)
            .execute(pool)
            .await?;
    }

    // (slug, sku, name, brand, price, stock, rating, featured, category slug, tags)
    let products: [(&str, &str, &str, &str, &str, i32, &str, bool, &str, &[&str]); 6] = [
        ("aurora-15-laptop", "LPT-001", "Aurora 15 Laptop", "Nimbus", "1299.00", 12, "4.60", true, "laptops", &["gaming", "portable"]),
        ("breeze-air-13", "LPT-002", "Breeze Air 13", "Nimbus", "899.00", 20, "4.30", false, "laptops", &["portable", "office"]),
        ("pulse-x-phone", "PHN-001", "Pulse X Phone", "Vertex", "749.00", 35, "4.50", true, "smartphones", &["5g", "camera"]),
        ("pulse-mini", "PHN-002", "Pulse Mini", "Vertex", "449.00", 50, "4.10", false, "smartphones", &["5g", "compact"]),
        ("orbit-wireless-mouse", "ACC-001", "Orbit Wireless Mouse", "Kite", "39.00", 120, "4.70", true, "accessories", &["wireless", "office"]),
        ("zoom-pro-camera", "CAM-001", "Zoom Pro Camera", "Opti", "1150.00", 8, "4.80", false, "cameras", &["camera", "4k"]),
    ];

    for (slug, sku, name, brand, price, stock, rating, featured, category_slug, tags) in products {
        let product_id: Option<i32> = sqlx::query_scalar(
            "INSERT INTO products \
             (slug, sku, name, brand, price, stock_quantity, rating_avg, is_featured, category_id) \
             SELECT $1, $2, $3, $4, $5::numeric, $6, $7::numeric, $8, c.id \
             FROM categories c WHERE c.slug = $9 \
             ON CONFLICT (slug) DO NOTHING \
             RETURNING id",
        )
        .bind(slug)
        .bind(sku)
        .bind(name)
        .bind(brand)
        .bind(price)
        .bind(stock)
        .bind(rating)
        .bind(featured)
        .bind(category_slug)
        .fetch_optional(pool)
        .await?;

        let Some(product_id) = product_id else {
            // Already seeded on a previous run.
            continue;
        };

        sqlx::query(
            "INSERT INTO product_images (product_id, image_url, alt_text, is_primary) \
             VALUES ($1, $2, $3, TRUE)",
        )
        .bind(product_id)
        .bind(format!("/images/products/{slug}.jpg"))
        .bind(name)
        .execute(pool)
        .await?;

        for tag in tags {
            sqlx::query("INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(tag)
                .execute(pool)
                .await?;
            sqlx::query(
                "INSERT INTO product_tags (product_id, tag_id) \
                 SELECT $1, t.id FROM tags t WHERE t.name = $2 \
                 ON CONFLICT DO NOTHING",
            )
            .bind(product_id)
            .bind(tag)
            .execute(pool)
            .await?;
        }
    }

    tracing::info!("Seeded demo catalog");
    Ok(())
}

async fn seed_coupons(pool: &PgPool) -> Result<(), CommandError> {
    sqlx::query(
        "INSERT INTO coupons \
         (code, discount_type, discount_value, minimum_order_amount, maximum_discount) \
         VALUES ('WELCOME10', 'percentage', 10, 100, 50) \
         ON CONFLICT (code) DO NOTHING",
    )
    .execute(pool)
    .await?;

    tracing::info!("Seeded demo coupon");
    Ok(())
}
