use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::utils::password;
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at.with_timezone(&Utc),
        }
    }
}

/// Emails are stored trimmed and lowercased so lookups are a plain
/// equality match.
fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(email)
}

fn issue_session(state: &AppState, user: user::Model) -> AppResult<SessionResponse> {
    let token = Claims::for_user(&user, state.config.jwt_expiration_hours)
        .encode(&state.config.jwt_secret)?;

    Ok(SessionResponse {
        token,
        user: user.into(),
    })
}

/// Register a customer account and open a session
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<SessionResponse>> {
    let email = normalize_email(&payload.email)?;

    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some();

    if taken {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password::hash(&payload.password)?),
        name: Set(name.to_string()),
        role: Set(UserRole::Customer),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(issue_session(&state, user)?))
}

/// Exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let email = normalize_email(&payload.email)?;

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Ok(Json(issue_session(&state, user)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Driver@TruckFare.COM ").unwrap(),
            "driver@truckfare.com"
        );
        assert!(normalize_email("   ").is_err());
        assert!(normalize_email("no-at-sign").is_err());
    }
}
