use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::account::{Account, CreateAccount, Role};
use crate::models::application::Application;
use crate::models::posting::{CreatePosting, Posting};
use crate::models::profile::{Profile, UpsertProfile};
use crate::routes::api::applications::ApplicationView;
use crate::routes::api::auth::AccountInfo;
use crate::routes::api::postings::PostingView;
use crate::routes::api::profile::ProfileView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WorkModeCount {
    pub work_mode: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub postings: u64,
    pub profiles: u64,
    pub accounts: u64,
    pub applications: u64,
    pub postings_by_work_mode: Vec<WorkModeCount>,
}

pub async fn stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<StatsView>, AppError> {
    user.require_role(Role::Admin)?;

    let postings = Posting::count(&state.db).await?;
    let profiles = Profile::count(&state.db).await?;
    let accounts = Account::count(&state.db).await?;
    let applications = Application::count(&state.db).await?;
    let postings_by_work_mode = Posting::count_by_work_mode(&state.db)
        .await?
        .into_iter()
        .map(|(work_mode, count)| WorkModeCount { work_mode, count })
        .collect();

    Ok(Json(StatsView {
        postings,
        profiles,
        accounts,
        applications,
        postings_by_work_mode,
    }))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<AccountInfo>>, AppError> {
    user.require_role(Role::Admin)?;
    let accounts = Account::list(&state.db).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

pub async fn create_account(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateAccount>,
) -> Result<Json<AccountInfo>, AppError> {
    user.require_role(Role::Admin)?;
    let account = Account::create(&state.db, input).await?;
    Ok(Json(account.into()))
}

pub async fn list_postings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<PostingView>>, AppError> {
    user.require_role(Role::Admin)?;
    let postings = Posting::list_recent(&state.db).await?;
    Ok(Json(postings.into_iter().map(Into::into).collect()))
}

pub async fn create_posting(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreatePosting>,
) -> Result<Json<PostingView>, AppError> {
    user.require_role(Role::Admin)?;
    let posting = Posting::create(&state.db, input, &user.name).await?;
    Ok(Json(posting.into()))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ProfileView>>, AppError> {
    user.require_role(Role::Admin)?;
    let profiles = Profile::list(&state.db).await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// Admin-entered resumes are keyed on the name, like the deployed data.
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<UpsertProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_role(Role::Admin)?;
    Profile::admin_upsert(&state.db, input).await?;
    Ok(Json(serde_json::json!({ "saved": true })))
}

pub async fn list_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    user.require_role(Role::Admin)?;
    let applications = Application::list(&state.db).await?;
    Ok(Json(applications.into_iter().map(Into::into).collect()))
}
