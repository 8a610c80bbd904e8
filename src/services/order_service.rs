use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    db::OrmConn,
    dto::orders::{CreateOrderRequest, OrderDto, OrderLineDto, OrderList},
    entity::{
        order_lines::{
            ActiveModel as LineActive, Column as LineCol, Entity as OrderLines,
            Model as LineModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders,
            Model as OrderModel},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_USER, ensure_role, ensure_self_or_admin},
    models::OrderState,
    response::{ApiResponse, Meta},
    routes::params::PaginationFilter,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_SORT_BY: &str = "createdtime";

/// Sum of unit price times quantity over the lines; zero for no lines.
pub fn total_price(lines: &[LineModel]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price_per_unit * Decimal::from(line.quantity))
        .sum()
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    customer_id: Uuid,
    filter: PaginationFilter,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_self_or_admin(user, customer_id)?;

    let sort_by = filter.sort_by(DEFAULT_SORT_BY);
    let is_ascend = filter.is_ascend(false);

    let mut finder = Orders::find().filter(OrderCol::CustomerId.eq(customer_id));
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

    let items = with_lines(&state.orm, orders).await?;

    let meta = Meta::paged(page, page_size, sort_by, is_ascend, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    customer_id: Uuid,
    order_id: Uuid,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_self_or_admin(user, customer_id)?;

    let order = Orders::find_by_id(order_id).one(&state.orm).await?;
    let order = match order {
        Some(o) if o.customer_id == customer_id => o,
        _ => return Err(AppError::NotFound),
    };

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Order",
        order_dto(order, lines)?,
        None,
    ))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_role(user, ROLE_USER)?;

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("No order items".into()));
    }
    if payload.items.iter().any(|item| item.quantity < 1) {
        return Err(AppError::Unprocessable(
            "Quantity must be larger than zero".into(),
        ));
    }

    let mut seen = HashSet::new();
    if !payload.items.iter().all(|item| seen.insert(item.product_id)) {
        return Err(AppError::Unprocessable(
            "Order items contain a duplicated product".into(),
        ));
    }

    let product_ids: Vec<Uuid> = payload.items.iter().map(|item| item.product_id).collect();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProductCol::Id.is_in(product_ids.clone()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    if products.len() != product_ids.len() {
        return Err(AppError::Unprocessable("Product cannot be found".into()));
    }

    let order_id = Uuid::new_v4();
    let mut lines: Vec<LineActive> = Vec::with_capacity(payload.items.len());
    let mut total = Decimal::ZERO;
    for item in &payload.items {
        let product = &products[&item.product_id];
        // Snapshot price and name; later product edits must not change the order.
        total += product.price * Decimal::from(item.quantity);
        lines.push(LineActive {
            order_id: Set(order_id),
            product_id: Set(product.id),
            quantity: Set(item.quantity),
            price_per_unit: Set(product.price),
            display_name: Set(product.display_name.clone()),
        });
    }

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(order_id),
        customer_id: Set(user.user_id),
        total_price: Set(total),
        state: Set(OrderState::CheckingOut.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut line_models = Vec::with_capacity(lines.len());
    for line in lines {
        line_models.push(line.insert(&txn).await?);
    }

    txn.commit().await?;

    tracing::info!(order_id = %order.id, customer_id = %user.user_id, "order created");

    Ok(ApiResponse::success(
        "Order created",
        order_dto(order, line_models)?,
        Some(Meta::empty()),
    ))
}

/// Attach lines to a page of orders with a single query.
pub async fn with_lines(conn: &OrmConn, orders: Vec<OrderModel>) -> AppResult<Vec<OrderDto>> {
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<Uuid, Vec<LineModel>> = HashMap::new();
    if !order_ids.is_empty() {
        for line in OrderLines::find()
            .filter(LineCol::OrderId.is_in(order_ids))
            .all(conn)
            .await?
        {
            by_order.entry(line.order_id).or_default().push(line);
        }
    }

    orders
        .into_iter()
        .map(|order| {
            let lines = by_order.remove(&order.id).unwrap_or_default();
            order_dto(order, lines)
        })
        .collect()
}

pub fn order_dto(order: OrderModel, lines: Vec<LineModel>) -> AppResult<OrderDto> {
    let state = OrderState::parse(&order.state).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown order state {:?}", order.state))
    })?;

    Ok(OrderDto {
        id: order.id,
        customer_id: order.customer_id,
        created_at: order.created_at.with_timezone(&chrono::Utc),
        updated_at: order.updated_at.with_timezone(&chrono::Utc),
        total_price: order.total_price,
        state,
        lines: lines
            .into_iter()
            .map(|line| OrderLineDto {
                product_id: line.product_id,
                quantity: line.quantity,
                price_per_unit: line.price_per_unit,
                display_name: line.display_name,
            })
            .collect(),
    })
}

pub(crate) fn order_condition(state_filter: Option<OrderState>) -> Condition {
    let mut condition = Condition::all();
    if let Some(state) = state_filter {
        condition = condition.add(OrderCol::State.eq(state.as_str()));
    }
    condition
}
