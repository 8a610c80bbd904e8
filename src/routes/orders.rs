use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderDto, OrderList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::PaginationFilter,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/{customer_id}", get(list_orders))
        .route("/{customer_id}/{order_id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders/{customer_id}",
    params(
        ("customer_id" = Uuid, Path, description = "Customer ID"),
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("page_size" = Option<u64>, Query, description = "Page size, default 20"),
        ("sort_by" = Option<String>, Query, description = "Sort field, default createdtime"),
        ("is_ascend" = Option<bool>, Query, description = "Sort direction, default descending")
    ),
    responses(
        (status = 200, description = "Orders of the customer", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(customer_id): Path<Uuid>,
    Query(filter): Query<PaginationFilter>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, customer_id, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{customer_id}/{order_id}",
    params(
        ("customer_id" = Uuid, Path, description = "Customer ID"),
        ("order_id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with lines", body = ApiResponse<OrderDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path((customer_id, order_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<OrderDto>>> {
    let resp = order_service::get_order(&state, &user, customer_id, order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDto>),
        (status = 400, description = "No order items"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid quantity or unknown product")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderDto>>)> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
