use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::categories::{
        self, CategoryDto, CategoryList, CreateCategoryRequest, UpdateCategoryRequest,
    },
    entity::{
        categories::{ActiveModel, Entity as Categories},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    in_tree: bool,
) -> AppResult<ApiResponse<CategoryList>> {
    let rows = Categories::find().all(&state.orm).await?;

    let items = if in_tree {
        categories::build_tree(rows)
    } else {
        categories::flat_list(rows)
    };

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        None,
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CategoryDto>> {
    // The whole list is needed to attach descendants.
    let rows = Categories::find().all(&state.orm).await?;
    let category = match categories::tree_node(id, rows) {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Unprocessable("Name cannot be blank".into()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        parent_id: Set(payload.parent_id),
    };
    let category = active.insert(&state.orm).await?;

    tracing::info!(category_id = %category.id, "category created");

    Ok(ApiResponse::success(
        "Category created",
        CategoryDto {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            children: Vec::new(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;

    if id != payload.id {
        return Err(AppError::BadRequest("Category Id doesn't match".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::Unprocessable("Name cannot be blank".into()));
    }

    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.parent_id = Set(payload.parent_id);
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        CategoryDto {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            children: Vec::new(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    let used = Products::find()
        .filter(ProductCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if used > 0 {
        return Err(AppError::Unprocessable(
            "The category has been used".into(),
        ));
    }

    Categories::delete_by_id(id).exec(&state.orm).await?;

    tracing::info!(category_id = %id, "category deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
