use bookstore_api::entity::order_lines::Model;
use bookstore_api::services::order_service::total_price;
use rust_decimal::Decimal;
use uuid::Uuid;

fn line(price_per_unit: Decimal, quantity: i32) -> Model {
    Model {
        order_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        quantity,
        price_per_unit,
        display_name: "A book".to_string(),
    }
}

#[test]
fn total_sums_unit_price_times_quantity() {
    let lines = vec![line(Decimal::from(10), 2), line(Decimal::from(5), 3)];
    assert_eq!(total_price(&lines), Decimal::from(35));
}

#[test]
fn total_of_empty_lines_is_zero() {
    assert_eq!(total_price(&[]), Decimal::ZERO);
}

#[test]
fn total_keeps_decimal_precision() {
    // 19.99 * 3 + 0.01 * 1 = 59.98
    let lines = vec![line(Decimal::new(1999, 2), 3), line(Decimal::new(1, 2), 1)];
    assert_eq!(total_price(&lines), Decimal::new(5998, 2));
}
