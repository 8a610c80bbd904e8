use axum::extract::Query;
use axum::http::Uri;
use bookstore_api::routes::params::{OrderListQuery, PaginationFilter, ProductQuery, page_count};

fn filter(page: Option<u64>, page_size: Option<u64>) -> PaginationFilter {
    PaginationFilter {
        page,
        page_size,
        sort_by: None,
        is_ascend: None,
    }
}

#[test]
fn skip_count_is_zero_based() {
    assert_eq!(filter(Some(2), Some(10)).skip_count(20), 10);
    assert_eq!(filter(Some(1), Some(10)).skip_count(20), 0);
    assert_eq!(filter(Some(5), Some(7)).skip_count(20), 28);
}

#[test]
fn missing_or_zero_page_defaults_to_first() {
    assert_eq!(filter(None, Some(10)).page(), 1);
    assert_eq!(filter(Some(0), Some(10)).page(), 1);
    assert_eq!(filter(None, Some(10)).skip_count(20), 0);
}

#[test]
fn zero_page_size_substitutes_caller_default() {
    assert_eq!(filter(Some(3), Some(0)).page_size(20), 20);
    assert_eq!(filter(Some(3), Some(0)).skip_count(20), 40);
    assert_eq!(filter(Some(3), None).page_size(15), 15);
    assert_eq!(filter(Some(3), None).skip_count(15), 30);
}

#[test]
fn out_of_range_page_saturates_instead_of_overflowing() {
    assert_eq!(filter(Some(u64::MAX), Some(2)).skip_count(20), u64::MAX);
    assert_eq!(filter(Some(u64::MAX), Some(1)).skip_count(20), u64::MAX - 1);
}

#[test]
fn product_listing_query_parses_numeric_paging() {
    let uri: Uri = "/api/products?page=2&page_size=10&sort_by=price&is_ascend=false&key_words=rust"
        .parse()
        .unwrap();
    let Query(query) = Query::<ProductQuery>::try_from_uri(&uri).expect("product query");

    let paging = query.pagination();
    assert_eq!(paging.page(), 2);
    assert_eq!(paging.skip_count(20), 10);
    assert!(!paging.is_ascend(true));
    assert_eq!(query.key_words.as_deref(), Some("rust"));
}

#[test]
fn admin_order_query_parses_state_and_direction() {
    let uri: Uri = "/api/admin/orders?page=1&is_ascend=true&state=Placed"
        .parse()
        .unwrap();
    let Query(query) = Query::<OrderListQuery>::try_from_uri(&uri).expect("order query");

    assert!(query.pagination().is_ascend(false));
    assert_eq!(query.state.as_deref(), Some("Placed"));
}

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(25, 10), Some(3));
    assert_eq!(page_count(20, 10), Some(2));
    assert_eq!(page_count(1, 10), Some(1));
    assert_eq!(page_count(0, 10), Some(0));
}

#[test]
fn page_count_is_undefined_for_negative_totals() {
    assert_eq!(page_count(-1, 10), None);
    assert_eq!(page_count(-100, 10), None);
}

#[test]
fn sort_defaults_fall_back_to_caller() {
    let unset = PaginationFilter::default();
    assert_eq!(unset.sort_by("price"), "price");
    assert!(unset.is_ascend(true));
    assert!(!unset.is_ascend(false));

    let set = PaginationFilter {
        sort_by: Some("createdtime".into()),
        is_ascend: Some(true),
        ..Default::default()
    };
    assert_eq!(set.sort_by("price"), "createdtime");
    assert!(set.is_ascend(false));
}

#[test]
fn blank_sort_field_falls_back_to_caller() {
    let blank = PaginationFilter {
        sort_by: Some("  ".into()),
        ..Default::default()
    };
    assert_eq!(blank.sort_by("price"), "price");
}
