use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Page info for list requests. Field accessors mirror the query-string
/// names and substitute caller-provided defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationFilter {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_by: Option<String>,
    pub is_ascend: Option<bool>,
}

impl PaginationFilter {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size; 0 or absent means the caller's default applies.
    pub fn page_size(&self, default_page_size: u64) -> u64 {
        match self.page_size {
            Some(0) | None => default_page_size,
            Some(size) => size,
        }
    }

    /// Zero-based skip count for the requested page. Saturates instead of
    /// overflowing, so an absurd page number yields an empty page.
    pub fn skip_count(&self, default_page_size: u64) -> u64 {
        self.page()
            .saturating_sub(1)
            .saturating_mul(self.page_size(default_page_size))
    }

    pub fn sort_by(&self, default_sort_by: &str) -> String {
        match self.sort_by.as_deref() {
            Some(field) if !field.trim().is_empty() => field.to_string(),
            _ => default_sort_by.to_string(),
        }
    }

    pub fn is_ascend(&self, default_ascend: bool) -> bool {
        self.is_ascend.unwrap_or(default_ascend)
    }
}

/// Total page count for a record count, undefined for a negative count.
pub fn page_count(total_records: i64, page_size: u64) -> Option<u64> {
    if total_records < 0 || page_size == 0 {
        return None;
    }
    let total = total_records as u64;
    Some(total / page_size + u64::from(total % page_size != 0))
}

// Paging fields are inlined rather than flattened: `Query` goes through
// serde_urlencoded, which cannot deserialize numbers or bools behind
// `#[serde(flatten)]`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_by: Option<String>,
    pub is_ascend: Option<bool>,
    /// Restrict to one category.
    pub category: Option<Uuid>,
    /// Whitespace-separated words, each matched against the display name.
    pub key_words: Option<String>,
    pub is_deactive: Option<bool>,
}

impl ProductQuery {
    pub fn pagination(&self) -> PaginationFilter {
        PaginationFilter {
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            is_ascend: self.is_ascend,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_by: Option<String>,
    pub is_ascend: Option<bool>,
    pub state: Option<String>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> PaginationFilter {
        PaginationFilter {
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            is_ascend: self.is_ascend,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryListQuery {
    /// Return the categories as a rooted tree instead of a flat list.
    pub tree: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductLookupQuery {
    pub is_deactive: Option<bool>,
}
