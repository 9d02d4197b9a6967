use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, HtmlError};
use crate::models::application::Application;
use crate::models::posting::{
    CreatePosting, Posting, SENIORITY_LEVELS, WORK_MODES,
};
use crate::models::profile::Profile;
use crate::routes::ui::{FlashParams, Shell, flash_text, require_user, shell};
use crate::state::AppState;

struct ApplicantRow {
    username: String,
    name: String,
    skills: String,
    education: String,
    applied: String,
}

struct PostingRow {
    title: String,
    location: String,
    work_mode: String,
    salary: String,
    created: String,
    applicants: Vec<ApplicantRow>,
}

#[derive(Template)]
#[template(path = "employer.html")]
struct EmployerTemplate {
    shell: Shell,
    flash: Option<String>,
    company_default: String,
    work_modes: &'static [&'static str],
    seniority_levels: &'static [&'static str],
    postings: Vec<PostingRow>,
}

pub async fn page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let user = require_user(user)?;
    user.require_employer()?;

    let postings = Posting::list_for_employer(&state.db, &user.name).await?;
    let mut rows = Vec::with_capacity(postings.len());
    for posting in postings {
        let applicants = match posting.id {
            Some(posting_id) => applicant_rows(&state, posting_id).await?,
            None => Vec::new(),
        };
        rows.push(PostingRow {
            title: posting.title,
            location: posting.location,
            work_mode: posting.work_mode,
            salary: posting.salary,
            created: posting.created_at.to_chrono().format("%d/%m/%Y").to_string(),
            applicants,
        });
    }

    let tmpl = EmployerTemplate {
        shell: shell(Some(&user)),
        flash: flash_text(&params),
        company_default: user.name.clone(),
        work_modes: WORK_MODES,
        seniority_levels: SENIORITY_LEVELS,
        postings: rows,
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

async fn applicant_rows(
    state: &AppState,
    posting_id: mongodb::bson::oid::ObjectId,
) -> Result<Vec<ApplicantRow>, AppError> {
    let applications = Application::list_for_posting(&state.db, posting_id).await?;
    let mut rows = Vec::with_capacity(applications.len());
    for application in applications {
        let profile = Profile::find_for_applicant(&state.db, &application.username).await?;
        let (name, skills, education) = match profile {
            Some(profile) => (profile.name, profile.skills, profile.education),
            // Accounts can apply before filling in a resume.
            None => ("(no resume)".to_string(), String::new(), String::new()),
        };
        rows.push(ApplicantRow {
            username: application.username,
            name,
            skills,
            education,
            applied: application
                .applied_at
                .to_chrono()
                .format("%d/%m/%Y")
                .to_string(),
        });
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub struct PostingForm {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_mode: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub seniority: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
}

pub async fn create_posting(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<PostingForm>,
) -> Result<Response, HtmlError> {
    let user = require_user(user)?;
    user.require_employer()?;

    let result = Posting::create(
        &state.db,
        CreatePosting {
            title: input.title,
            company: input.company,
            location: input.location,
            work_mode: input.work_mode,
            salary: input.salary,
            seniority: input.seniority,
            description: input.description,
            requirements: input.requirements,
        },
        &user.name,
    )
    .await;

    match result {
        Ok(_) => Ok(Redirect::to("/employer?msg=posted").into_response()),
        Err(AppError::BadRequest(_)) => {
            Ok(Redirect::to("/employer?msg=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
