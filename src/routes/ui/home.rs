use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};

use crate::auth::CurrentUser;
use crate::error::{AppError, HtmlError};
use crate::models::account::Role;
use crate::models::application::{Application, ApplyOutcome};
use crate::models::posting::{Posting, summarize};
use crate::routes::api::parse_object_id;
use crate::routes::api::postings::{MapPoint, map_points};
use crate::routes::ui::{FlashParams, Shell, flash_text, require_user, shell};
use crate::state::AppState;

struct FeedItem {
    id: String,
    title: String,
    company: String,
    location: String,
    summary: String,
    requirements: String,
    salary: String,
    work_mode: String,
    seniority: String,
    created: String,
}

impl From<&Posting> for FeedItem {
    fn from(posting: &Posting) -> Self {
        FeedItem {
            id: posting.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: posting.title.clone(),
            company: posting.company.clone(),
            location: posting.location.clone(),
            summary: summarize(&posting.description),
            requirements: posting.requirements.clone(),
            salary: posting.salary.clone(),
            work_mode: posting.work_mode.clone(),
            seniority: posting.seniority.clone(),
            created: posting.created_at.to_chrono().format("%d/%m/%Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    shell: Shell,
    flash: Option<String>,
    postings: Vec<FeedItem>,
    map_points: Vec<MapPoint>,
    can_apply: bool,
}

pub async fn index(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let postings = Posting::list_recent(&state.db).await?;
    let points = map_points(&postings);
    let items = postings.iter().map(FeedItem::from).collect();
    let can_apply = user
        .as_ref()
        .is_some_and(|u| u.role == Role::Candidate);

    let tmpl = IndexTemplate {
        shell: shell(user.as_ref()),
        flash: flash_text(&params),
        postings: items,
        map_points: points,
        can_apply,
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

pub async fn apply(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, HtmlError> {
    let user = require_user(user)?;
    user.require_role(Role::Candidate)?;

    let posting = Posting::get(&state.db, parse_object_id(&id)?).await?;
    match Application::apply(&state.db, &posting, &user.username).await? {
        ApplyOutcome::Applied(_) => Ok(Redirect::to("/?msg=applied")),
        ApplyOutcome::Duplicate => Ok(Redirect::to("/?msg=duplicate")),
    }
}
