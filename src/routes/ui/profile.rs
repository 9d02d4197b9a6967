use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, HtmlError};
use crate::models::account::Role;
use crate::models::profile::{EDUCATION_LEVELS, Profile, UpsertProfile};
use crate::routes::ui::{FlashParams, Shell, flash_text, require_user, shell};
use crate::state::AppState;

struct EducationOption {
    value: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    shell: Shell,
    flash: Option<String>,
    name: String,
    education_options: Vec<EducationOption>,
    languages: String,
    summary: String,
    experience: String,
    skills: String,
}

pub async fn page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Candidate)?;

    let existing = Profile::find_for_account(&state.db, &user.username, &user.name).await?;
    let (name, education, languages, summary, experience, skills) = match existing {
        Some(profile) => (
            profile.name,
            profile.education,
            profile.languages,
            profile.summary,
            profile.experience,
            profile.skills,
        ),
        None => (
            user.name.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ),
    };

    let education_options = EDUCATION_LEVELS
        .iter()
        .map(|level| EducationOption {
            value: level,
            selected: *level == education,
        })
        .collect();

    let tmpl = ProfileTemplate {
        shell: shell(Some(&user)),
        flash: flash_text(&params),
        name,
        education_options,
        languages,
        summary,
        experience,
        skills,
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub languages: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
}

pub async fn save(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<ProfileForm>,
) -> Result<Response, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Candidate)?;

    let result = Profile::upsert_for_account(
        &state.db,
        &user.username,
        UpsertProfile {
            name: input.name,
            education: input.education,
            languages: input.languages,
            summary: input.summary,
            experience: input.experience,
            skills: input.skills,
        },
    )
    .await;

    match result {
        Ok(()) => Ok(Redirect::to("/profile?msg=saved").into_response()),
        Err(AppError::BadRequest(_)) => {
            Ok(Redirect::to("/profile?msg=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
