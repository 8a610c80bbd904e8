use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::params::page_count;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub page_count: Option<u64>,
    pub total: Option<i64>,
    pub sort_by: Option<String>,
    pub is_ascend: Option<bool>,
}

impl Meta {
    pub fn paged(
        page: u64,
        page_size: u64,
        sort_by: impl Into<String>,
        is_ascend: bool,
        total: i64,
    ) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            page_count: page_count(total, page_size),
            total: Some(total),
            sort_by: Some(sort_by.into()),
            is_ascend: Some(is_ascend),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            page_size: None,
            page_count: None,
            total: None,
            sort_by: None,
            is_ascend: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
