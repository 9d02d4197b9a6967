use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, HtmlError};
use crate::models::account::{Account, CreateAccount, Role};
use crate::models::application::Application;
use crate::models::posting::{CreatePosting, Posting, WORK_MODES};
use crate::models::profile::{EDUCATION_LEVELS, Profile, UpsertProfile};
use crate::routes::ui::{FlashParams, Shell, flash_text, require_user, shell};
use crate::state::AppState;

struct WorkModeBar {
    mode: String,
    count: i64,
    percent: i64,
}

struct AccountRow {
    name: String,
    username: String,
    role: &'static str,
    created: String,
}

struct PostingRow {
    title: String,
    company: String,
    work_mode: String,
    created_by: String,
    created: String,
}

struct ProfileRow {
    name: String,
    skills: String,
    linked_to: String,
    updated: String,
}

struct ApplicationRow {
    posting_title: String,
    posting_company: String,
    username: String,
    applied: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    shell: Shell,
    flash: Option<String>,
    posting_count: u64,
    profile_count: u64,
    account_count: u64,
    application_count: u64,
    work_mode_bars: Vec<WorkModeBar>,
    accounts: Vec<AccountRow>,
    postings: Vec<PostingRow>,
    profiles: Vec<ProfileRow>,
    applications: Vec<ApplicationRow>,
    work_modes: &'static [&'static str],
    education_levels: &'static [&'static str],
}

pub async fn page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Admin)?;

    let posting_count = Posting::count(&state.db).await?;
    let profile_count = Profile::count(&state.db).await?;
    let account_count = Account::count(&state.db).await?;
    let application_count = Application::count(&state.db).await?;

    let mode_counts = Posting::count_by_work_mode(&state.db).await?;
    let total: i64 = mode_counts.iter().map(|(_, count)| count).sum();
    let work_mode_bars = mode_counts
        .into_iter()
        .map(|(mode, count)| WorkModeBar {
            mode,
            count,
            percent: if total > 0 { count * 100 / total } else { 0 },
        })
        .collect();

    let accounts = Account::list(&state.db)
        .await?
        .into_iter()
        .map(|account| AccountRow {
            name: account.name,
            username: account.username,
            role: account.role.label(),
            created: account.created_at.to_chrono().format("%d/%m/%Y").to_string(),
        })
        .collect();

    let postings = Posting::list_recent(&state.db)
        .await?
        .into_iter()
        .map(|posting| PostingRow {
            title: posting.title,
            company: posting.company,
            work_mode: posting.work_mode,
            created_by: posting.created_by,
            created: posting.created_at.to_chrono().format("%d/%m/%Y").to_string(),
        })
        .collect();

    let profiles = Profile::list(&state.db)
        .await?
        .into_iter()
        .map(|profile| ProfileRow {
            name: profile.name,
            skills: profile.skills,
            linked_to: profile.account_username.unwrap_or_else(|| "—".to_string()),
            updated: profile.updated_at.to_chrono().format("%d/%m/%Y").to_string(),
        })
        .collect();

    let applications = Application::list(&state.db)
        .await?
        .into_iter()
        .map(|application| ApplicationRow {
            posting_title: application.posting_title,
            posting_company: application.posting_company,
            username: application.username,
            applied: application
                .applied_at
                .to_chrono()
                .format("%d/%m/%Y")
                .to_string(),
        })
        .collect();

    let tmpl = AdminTemplate {
        shell: shell(Some(&user)),
        flash: flash_text(&params),
        posting_count,
        profile_count,
        account_count,
        application_count,
        work_mode_bars,
        accounts,
        postings,
        profiles,
        applications,
        work_modes: WORK_MODES,
        education_levels: EDUCATION_LEVELS,
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct AdminPostingForm {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_mode: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
}

pub async fn create_posting(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<AdminPostingForm>,
) -> Result<Response, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Admin)?;

    let result = Posting::create(
        &state.db,
        CreatePosting {
            title: input.title,
            company: input.company,
            location: input.location,
            work_mode: input.work_mode,
            salary: String::new(),
            seniority: String::new(),
            description: input.description,
            requirements: input.requirements,
        },
        &user.name,
    )
    .await;

    match result {
        Ok(_) => Ok(Redirect::to("/admin?msg=posted").into_response()),
        Err(AppError::BadRequest(_)) => Ok(Redirect::to("/admin?msg=missing").into_response()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminProfileForm {
    pub name: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: String,
}

pub async fn create_profile(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<AdminProfileForm>,
) -> Result<Response, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Admin)?;

    let result = Profile::admin_upsert(
        &state.db,
        UpsertProfile {
            name: input.name,
            education: input.education,
            languages: String::new(),
            summary: input.summary,
            experience: String::new(),
            skills: input.skills,
        },
    )
    .await;

    match result {
        Ok(()) => Ok(Redirect::to("/admin?msg=saved").into_response()),
        Err(AppError::BadRequest(_)) => Ok(Redirect::to("/admin?msg=missing").into_response()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminAccountForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub async fn create_account(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<AdminAccountForm>,
) -> Result<Response, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Admin)?;

    let result = Account::create(
        &state.db,
        CreateAccount {
            name: input.name,
            username: input.username,
            password: input.password,
            role: input.role,
        },
    )
    .await;

    match result {
        Ok(_) => Ok(Redirect::to("/admin?msg=created").into_response()),
        Err(AppError::Conflict(_)) => Ok(Redirect::to("/admin?msg=taken").into_response()),
        Err(AppError::BadRequest(_)) => Ok(Redirect::to("/admin?msg=missing").into_response()),
        Err(e) => Err(e.into()),
    }
}
