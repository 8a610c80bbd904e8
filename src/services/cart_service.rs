use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::cart::{CartDto, CartItemDto, CartItemRequest},
    dto::products::ProductDto,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_USER, ensure_role},
    response::{ApiResponse, Meta},
};

const MAX_QUANTITY: i32 = 10_000;

#[derive(FromRow)]
struct CartProductRow {
    product_id: Uuid,
    quantity: i32,
    display_name: String,
    description: Option<String>,
    price: Decimal,
    category_id: Uuid,
    is_deactive: bool,
    attributes: String,
}

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    display_name: String,
    description: Option<String>,
    price: Decimal,
    category_id: Uuid,
    is_deactive: bool,
    attributes: String,
}

pub async fn get_cart(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<CartDto>> {
    ensure_role(user, ROLE_USER)?;

    let rows = sqlx::query_as::<_, CartProductRow>(
        r#"
        SELECT ci.product_id, ci.quantity,
               p.display_name, p.description, p.price, p.category_id, p.is_deactive, p.attributes
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.customer_id = $1
        ORDER BY ci.created_at
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| CartItemDto {
            product_id: row.product_id,
            quantity: row.quantity,
            product: Some(ProductDto {
                id: row.product_id,
                display_name: row.display_name,
                description: row.description,
                price: row.price,
                category_id: row.category_id,
                is_deactive: row.is_deactive,
                attributes: serde_json::from_str(&row.attributes).unwrap_or_default(),
            }),
        })
        .collect();

    let cart = CartDto {
        customer_id: user.user_id,
        items,
    };
    Ok(ApiResponse::success("Cart", cart, None))
}

pub async fn add_item(
    pool: &DbPool,
    user: &AuthUser,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartItemDto>> {
    ensure_role(user, ROLE_USER)?;
    verify_quantity(payload.quantity)?;

    let product = find_product(pool, payload.product_id).await?;

    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO cart_items (customer_id, product_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (customer_id, product_id) DO NOTHING
        RETURNING product_id
        "#,
    )
    .bind(user.user_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .fetch_optional(pool)
    .await?;

    if inserted.is_none() {
        return Err(AppError::BadRequest("Item is already in the cart".into()));
    }

    Ok(ApiResponse::success(
        "Added to cart",
        item_dto(payload.quantity, product),
        None,
    ))
}

pub async fn update_item(
    pool: &DbPool,
    user: &AuthUser,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartItemDto>> {
    ensure_role(user, ROLE_USER)?;
    verify_quantity(payload.quantity)?;

    let product = find_product(pool, payload.product_id).await?;

    let updated: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE cart_items
        SET quantity = $3
        WHERE customer_id = $1 AND product_id = $2
        RETURNING product_id
        "#,
    )
    .bind(user.user_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Cart updated",
        item_dto(payload.quantity, product),
        None,
    ))
}

pub async fn remove_item(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_role(user, ROLE_USER)?;

    let result = sqlx::query("DELETE FROM cart_items WHERE customer_id = $1 AND product_id = $2")
        .bind(user.user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn verify_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 || quantity > MAX_QUANTITY {
        return Err(AppError::Unprocessable(format!(
            "Quantity must be between 1 and {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

async fn find_product(pool: &DbPool, product_id: Uuid) -> AppResult<ProductRow> {
    let product = sqlx::query_as::<_, ProductRow>(
        "SELECT id, display_name, description, price, category_id, is_deactive, attributes FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    match product {
        Some(p) => Ok(p),
        None => Err(AppError::BadRequest("Product cannot be found".into())),
    }
}

fn item_dto(quantity: i32, product: ProductRow) -> CartItemDto {
    CartItemDto {
        product_id: product.id,
        quantity,
        product: Some(ProductDto {
            id: product.id,
            display_name: product.display_name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            is_deactive: product.is_deactive,
            attributes: serde_json::from_str(&product.attributes).unwrap_or_default(),
        }),
    }
}
