use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderDto, OrderList, UpdateOrderStateRequest},
    entity::{
        order_lines::{Column as LineCol, Entity as OrderLines},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderState,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_SORT_BY: &str = "createdtime";

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let state_filter = match query.state.as_deref().filter(|s| !s.is_empty()) {
        Some(value) => Some(
            OrderState::parse(value)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown order state {value}")))?,
        ),
        None => None,
    };

    let filter = query.pagination();
    let sort_by = filter.sort_by(DEFAULT_SORT_BY);
    let is_ascend = filter.is_ascend(false);

    let mut finder = Orders::find().filter(order_service::order_condition(state_filter));
    if sort_by.eq_ignore_ascii_case(DEFAULT_SORT_BY) {
        finder = if is_ascend {
            finder.order_by_asc(OrderCol::CreatedAt)
        } else {
            finder.order_by_desc(OrderCol::CreatedAt)
        };
    }

    let total = finder.clone().count(&state.orm).await? as i64;

    let page = filter.page();
    let page_size = filter.page_size(DEFAULT_PAGE_SIZE);
    let orders = finder
        .limit(page_size)
        .offset(filter.skip_count(DEFAULT_PAGE_SIZE))
        .all(&state.orm)
        .await?;

    let items = order_service::with_lines(&state.orm, orders).await?;

    let meta = Meta::paged(page, page_size, sort_by, is_ascend, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn update_order_state(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStateRequest,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_admin(user)?;

    let next_state = OrderState::parse(&payload.state)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown order state {}", payload.state)))?;

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = order.into();
    active.state = Set(next_state.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    tracing::info!(order_id = %order.id, state = %next_state, "order state updated");

    Ok(ApiResponse::success(
        "Order state updated",
        order_service::order_dto(order, lines)?,
        Some(Meta::empty()),
    ))
}
