use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::account::Role;
use crate::models::application::{Application, ApplyOutcome};
use crate::models::posting::Posting;
use crate::models::profile::Profile;
use crate::routes::api::parse_object_id;
use crate::routes::api::profile::ProfileView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub applied: bool,
    pub duplicate: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationView {
    pub id: String,
    pub posting_id: String,
    pub posting_title: String,
    pub posting_company: String,
    pub username: String,
    pub applied_at: DateTime<Utc>,
}

impl From<Application> for ApplicationView {
    fn from(application: Application) -> Self {
        ApplicationView {
            id: application.id.map(|id| id.to_hex()).unwrap_or_default(),
            posting_id: application.posting_id.to_hex(),
            posting_title: application.posting_title,
            posting_company: application.posting_company,
            username: application.username,
            applied_at: application.applied_at.to_chrono(),
        }
    }
}

/// The applicant as the employer sees them: account username plus the
/// resume, when one could be resolved.
#[derive(Debug, Serialize)]
pub struct ApplicantView {
    pub username: String,
    pub applied_at: DateTime<Utc>,
    pub profile: Option<ProfileView>,
}

pub async fn apply(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApplyResponse>, AppError> {
    user.require_role(Role::Candidate)?;
    let posting = Posting::get(&state.db, parse_object_id(&id)?).await?;

    let response = match Application::apply(&state.db, &posting, &user.username).await? {
        ApplyOutcome::Applied(_) => ApplyResponse {
            applied: true,
            duplicate: false,
            message: format!("Application sent to {}", posting.company),
        },
        ApplyOutcome::Duplicate => ApplyResponse {
            applied: false,
            duplicate: true,
            message: "You have already applied to this posting".to_string(),
        },
    };
    Ok(Json(response))
}

pub async fn applicants(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<ApplicantView>>, AppError> {
    user.require_employer()?;
    let posting = Posting::get(&state.db, parse_object_id(&id)?).await?;

    // Employers only see applicants for postings they own; admins see all.
    let owns = posting.created_by == user.name || posting.company == user.name;
    if user.role != Role::Admin && !owns {
        return Err(AppError::Forbidden(
            "Posting belongs to another employer".to_string(),
        ));
    }

    let posting_id = posting
        .id
        .ok_or_else(|| AppError::Internal("Posting without id".to_string()))?;
    let applications = Application::list_for_posting(&state.db, posting_id).await?;
    let mut applicants = Vec::with_capacity(applications.len());
    for application in applications {
        let profile = Profile::find_for_applicant(&state.db, &application.username).await?;
        applicants.push(ApplicantView {
            username: application.username,
            applied_at: application.applied_at.to_chrono(),
            profile: profile.map(Into::into),
        });
    }
    Ok(Json(applicants))
}
