use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::account::{Account, CreateAccount, Role};
use crate::models::session::SessionRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        AccountInfo {
            id: account.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: account.name,
            username: account.username,
            role: account.role,
            created_at: account.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub username: String,
    pub role: Role,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> Result<Json<AccountInfo>, AppError> {
    if input.role == Role::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts are created from the admin panel".to_string(),
        ));
    }
    let account = Account::create(&state.db, input).await?;
    Ok(Json(account.into()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = Account::verify_login(&state.db, &input.username, &input.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = SessionRecord::create(&state.db, &account.username, state.session_ttl).await?;

    Ok(Json(LoginResponse {
        token,
        name: account.name,
        username: account.username,
        role: account.role,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    SessionRecord::revoke(&state.db, &user.token_hash).await?;
    state.transcripts.clear(&user.token_hash);
    Ok(Json(serde_json::json!({ "logged_out": true })))
}

pub async fn me(user: CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "username": user.username,
        "name": user.name,
        "role": user.role,
    }))
}
