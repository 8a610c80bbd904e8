use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::products::{self, CreateProductRequest, ProductDto, ProductList},
    entity::{
        categories::Entity as Categories,
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_SORT_BY: &str = "price";

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();

    if let Some(category_id) = query.category {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    if let Some(key_words) = query.key_words.as_ref() {
        // Every word must match the display name.
        for word in key_words.split_whitespace() {
            let pattern = format!("%{}%", word);
            condition = condition.add(Expr::col(Column::DisplayName).ilike(pattern));
        }
    }

    condition = condition.add(Column::IsDeactive.eq(query.is_deactive.unwrap_or(false)));

    let filter = query.pagination();
    let sort_by = filter.sort_by(DEFAULT_SORT_BY);
    let is_ascend = filter.is_ascend(true);

    let mut finder = Products::find().filter(condition);
    if sort_by.eq_ignore_ascii_case("price") {
        finder = if is_ascend {
            finder.order_by_asc(Column::Price)
        } else {
            finder.order_by_desc(Column::Price)
        };
    }

    let total = finder.clone().count(&state.orm).await? as i64;

    let page = filter.page();
    let page_size = filter.page_size(DEFAULT_PAGE_SIZE);
    let items = finder
        .limit(page_size)
        .offset(filter.skip_count(DEFAULT_PAGE_SIZE))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(products::from_entity)
        .collect();

    let meta = Meta::paged(page, page_size, sort_by, is_ascend, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(
    state: &AppState,
    id: Uuid,
    is_deactive: Option<bool>,
) -> AppResult<ApiResponse<ProductDto>> {
    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) if p.is_deactive == is_deactive.unwrap_or(false) => p,
        _ => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Product",
        products::from_entity(product),
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;
    verify_product(&payload.display_name, payload.price)?;

    let category = Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::Unprocessable("Category cannot be found".into()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        display_name: Set(payload.display_name),
        description: Set(payload.description),
        price: Set(payload.price),
        category_id: Set(payload.category_id),
        is_deactive: Set(payload.is_deactive),
        attributes: Set(products::attributes_to_text(&payload.attributes)),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        products::from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductDto,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;

    if id != payload.id {
        return Err(AppError::BadRequest("ProductId doesn't match".into()));
    }
    verify_product(&payload.display_name, payload.price)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.display_name = Set(payload.display_name);
    active.description = Set(payload.description);
    active.price = Set(payload.price);
    active.category_id = Set(payload.category_id);
    active.is_deactive = Set(payload.is_deactive);
    active.attributes = Set(products::attributes_to_text(&payload.attributes));

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        products::from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn verify_product(display_name: &str, price: Decimal) -> AppResult<()> {
    if display_name.trim().is_empty() {
        return Err(AppError::Unprocessable(
            "DisplayName cannot be blank".into(),
        ));
    }
    if price < Decimal::ZERO {
        return Err(AppError::Unprocessable(
            "Price cannot be negative".into(),
        ));
    }
    Ok(())
}
