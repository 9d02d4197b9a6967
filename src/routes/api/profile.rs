use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::account::Role;
use crate::models::profile::{Profile, UpsertProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub education: String,
    pub languages: String,
    pub summary: String,
    pub experience: String,
    pub skills: String,
    pub updated_at: DateTime<Utc>,
    pub account_username: Option<String>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        ProfileView {
            id: profile.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: profile.name,
            education: profile.education,
            languages: profile.languages,
            summary: profile.summary,
            experience: profile.experience,
            skills: profile.skills,
            updated_at: profile.updated_at.to_chrono(),
            account_username: profile.account_username,
        }
    }
}

/// The caller's own resume, if one exists yet.
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Option<ProfileView>>, AppError> {
    user.require_role(Role::Candidate)?;
    let profile = Profile::find_for_account(&state.db, &user.username, &user.name).await?;
    Ok(Json(profile.map(Into::into)))
}

pub async fn save(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<UpsertProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_role(Role::Candidate)?;
    Profile::upsert_for_account(&state.db, &user.username, input).await?;
    Ok(Json(serde_json::json!({ "saved": true })))
}
