use bookstore_api::models::User;
use bookstore_api::services::auth_service::build_claims;
use chrono::Utc;
use uuid::Uuid;

fn user(role: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: "reader".to_string(),
        email: "reader@example.com".to_string(),
        password_hash: "dummy".to_string(),
        role: role.to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn claims_carry_the_fixed_identity_set() {
    let user = user("User");
    let claims = build_claims(&user, 30).expect("claims");

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.name, "reader");
    assert_eq!(claims.email, "reader@example.com");
    assert_eq!(claims.role, "User");
    assert!(Uuid::parse_str(&claims.jti).is_ok());
}

#[test]
fn expiry_is_issue_time_plus_configured_minutes() {
    let claims = build_claims(&user("Admin"), 30).expect("claims");
    assert_eq!(claims.exp - claims.iat, 30 * 60);

    let claims = build_claims(&user("Admin"), 5).expect("claims");
    assert_eq!(claims.exp - claims.iat, 5 * 60);
}

#[test]
fn token_ids_are_unique_per_issue() {
    let user = user("User");
    let first = build_claims(&user, 30).expect("claims");
    let second = build_claims(&user, 30).expect("claims");
    assert_ne!(first.jti, second.jti);
}
