use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, HtmlError};
use crate::models::search::{self, SearchTarget};
use crate::routes::ui::{FlashParams, Shell, flash_text, require_user, shell};
use crate::state::{AppState, ChatMessage};

#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate {
    shell: Shell,
    flash: Option<String>,
    transcript: Vec<ChatMessage>,
}

pub async fn page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let user = require_user(user)?;
    let transcript = state.transcripts.transcript(&user.token_hash);

    let tmpl = SearchTemplate {
        shell: shell(Some(&user)),
        flash: flash_text(&params),
        transcript,
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub target: SearchTarget,
    pub query: String,
}

pub async fn run(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Form(input): Form<SearchForm>,
) -> Result<Redirect, HtmlError> {
    let user = require_user(user)?;

    let query = input.query.trim();
    if query.is_empty() {
        return Ok(Redirect::to("/search"));
    }

    let reply = match input.target {
        SearchTarget::Postings => {
            let hits = search::search_postings(&state.db, query).await?;
            search::posting_reply(query, &hits)
        }
        SearchTarget::Profiles => {
            let hits = search::search_profiles(&state.db, query).await?;
            search::profile_reply(query, &hits)
        }
    };

    state
        .transcripts
        .append_exchange(&user.token_hash, query, &reply);
    Ok(Redirect::to("/search"))
}
