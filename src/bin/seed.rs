use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use bookstore_api::{
    config::AppConfig,
    db::create_pool,
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id =
        ensure_user(&pool, "admin", "admin@example.com", "admin1234", ROLE_ADMIN).await?;
    let user_id =
        ensure_user(&pool, "reader", "reader@example.com", "reader1234", ROLE_USER).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch its id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let books = ensure_category(pool, "Books", None).await?;
    let fiction = ensure_category(pool, "Fiction", Some(books)).await?;
    let technical = ensure_category(pool, "Technical", Some(books)).await?;

    let products = vec![
        (
            "The Rust Programming Language",
            "The official book on Rust",
            Decimal::new(3999, 2),
            technical,
            r#"{"pages": 560, "format": "paperback"}"#,
        ),
        (
            "Programming Rust",
            "Fast, safe systems development",
            Decimal::new(4950, 2),
            technical,
            r#"{"pages": 738}"#,
        ),
        (
            "The Hobbit",
            "There and back again",
            Decimal::new(1299, 2),
            fiction,
            r#"{"format": "hardcover"}"#,
        ),
        (
            "Dune",
            "Science-fiction classic",
            Decimal::new(999, 2),
            fiction,
            "{}",
        ),
    ];

    for (name, desc, price, category_id, attributes) in products {
        ensure_product(pool, name, desc, price, category_id, attributes).await?;
    }

    println!("Seeded catalog");
    Ok(())
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    parent_id: Option<Uuid>,
) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name, parent_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(parent_id)
        .execute(pool)
        .await?;
    Ok(id)
}

async fn ensure_product(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
    price: Decimal,
    category_id: Uuid,
    attributes: &str,
) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM products WHERE display_name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO products (id, display_name, description, price, category_id, attributes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(category_id)
    .bind(attributes)
    .execute(pool)
    .await?;
    Ok(())
}
