use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::auth::{
        Claims, LoginRequest, LoginResponse, RegisterRequest, UpdateRoleRequest, UserInfo,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER, ensure_admin, ensure_self_or_admin},
    models::User,
    response::{ApiResponse, Meta},
};

const DEFAULT_EXPIRATION_MINUTES: i64 = 30;

/// Token lifetime in minutes, from `JWT_EXPIRATION_MINUTES`.
pub fn expiration_minutes() -> i64 {
    std::env::var("JWT_EXPIRATION_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRATION_MINUTES)
}

/// Fixed claim set for token issuance: subject, token id, issue time,
/// username, email, role, and expiry `expiration_minutes` from now.
pub fn build_claims(user: &User, expiration_minutes: i64) -> AppResult<Claims> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::minutes(expiration_minutes))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    Ok(Claims {
        sub: user.id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        name: user.username.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    })
}

pub async fn register_user(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserInfo>> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;

    if username.trim().len() < 5 {
        return Err(AppError::BadRequest(
            "Username must be at least 5 characters".to_string(),
        ));
    }
    if email.trim().len() < 5 || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if password.len() < 8 || password.len() > 32 {
        return Err(AppError::BadRequest(
            "Password must be 8 to 32 characters".to_string(),
        ));
    }

    let exist: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(email.as_str())
            .bind(username.as_str())
            .fetch_optional(pool)
            .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest(
            "Email or username is already taken".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(
        "INSERT INTO users (id, username, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(id)
    .bind(username.as_str())
    .bind(email.as_str())
    .bind(password_hash)
    .bind(ROLE_USER)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success("User created", user_info(user), None))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Bad credentials".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Bad credentials".into()));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let claims = build_claims(&user, expiration_minutes())?;

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user_id = %user.id, "token issued");

    let resp = LoginResponse {
        username: user.username,
        email: user.email,
        token,
    };

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn get_user(
    pool: &DbPool,
    auth: &AuthUser,
    id: Option<Uuid>,
) -> AppResult<ApiResponse<UserInfo>> {
    let id = id.unwrap_or(auth.user_id);
    ensure_self_or_admin(auth, id)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success("User", user_info(user), None))
}

pub async fn update_role(
    pool: &DbPool,
    auth: &AuthUser,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<UserInfo>> {
    ensure_admin(auth)?;

    if payload.role != ROLE_USER && payload.role != ROLE_ADMIN {
        return Err(AppError::BadRequest(format!(
            "Unknown role {}",
            payload.role
        )));
    }

    let user: Option<User> =
        sqlx::query_as("UPDATE users SET role = $2 WHERE email = $1 RETURNING *")
            .bind(payload.email.as_str())
            .bind(payload.role.as_str())
            .fetch_optional(pool)
            .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Cannot find the user".into())),
    };

    tracing::info!(user_id = %user.id, role = %user.role, "role updated");

    Ok(ApiResponse::success(
        "Role updated",
        user_info(user),
        Some(Meta::empty()),
    ))
}

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }
}
