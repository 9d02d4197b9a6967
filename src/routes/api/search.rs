use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::search::{self, SearchTarget};
use crate::routes::api::postings::PostingView;
use crate::routes::api::profile::ProfileView;
use crate::state::{AppState, ChatMessage};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub target: SearchTarget,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ScoredPosting {
    pub score: f64,
    #[serde(flatten)]
    pub posting: PostingView,
}

#[derive(Debug, Serialize)]
pub struct ScoredProfile {
    pub score: f64,
    #[serde(flatten)]
    pub profile: ProfileView,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Postings(Vec<ScoredPosting>),
    Profiles(Vec<ScoredProfile>),
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: usize,
    pub reply: String,
    pub results: SearchResults,
}

/// One relevance-ranked query against the selected text index. The
/// exchange is also appended to the caller's transcript.
pub async fn run(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = input.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("Query must not be empty".to_string()));
    }

    let (matches, reply, results) = match input.target {
        SearchTarget::Postings => {
            let hits = search::search_postings(&state.db, query).await?;
            let reply = search::posting_reply(query, &hits);
            let results = hits
                .into_iter()
                .map(|hit| ScoredPosting {
                    score: hit.score,
                    posting: hit.item.into(),
                })
                .collect::<Vec<_>>();
            (results.len(), reply, SearchResults::Postings(results))
        }
        SearchTarget::Profiles => {
            let hits = search::search_profiles(&state.db, query).await?;
            let reply = search::profile_reply(query, &hits);
            let results = hits
                .into_iter()
                .map(|hit| ScoredProfile {
                    score: hit.score,
                    profile: hit.item.into(),
                })
                .collect::<Vec<_>>();
            (results.len(), reply, SearchResults::Profiles(results))
        }
    };

    state
        .transcripts
        .append_exchange(&user.token_hash, query, &reply);

    Ok(Json(SearchResponse {
        matches,
        reply,
        results,
    }))
}

pub async fn transcript(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<ChatMessage>> {
    Json(state.transcripts.transcript(&user.token_hash))
}
