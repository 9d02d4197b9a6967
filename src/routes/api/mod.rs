pub mod admin;
pub mod applications;
pub mod auth;
pub mod postings;
pub mod profile;
pub mod search;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use mongodb::bson::oid::ObjectId;

use crate::auth::require_session;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid id '{raw}'")))
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        // Session
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Postings
        .route("/postings", get(postings::list).post(postings::create))
        .route("/postings/map", get(postings::map))
        .route("/postings/mine", get(postings::mine))
        .route("/postings/{id}/apply", post(applications::apply))
        .route("/postings/{id}/applicants", get(applications::applicants))
        // Candidate resume
        .route("/profile", get(profile::show).put(profile::save))
        // Matching assistant
        .route("/search", post(search::run).get(search::transcript))
        // Admin dashboard
        .route("/admin/stats", get(admin::stats))
        .route(
            "/admin/accounts",
            get(admin::list_accounts).post(admin::create_account),
        )
        .route(
            "/admin/postings",
            get(admin::list_postings).post(admin::create_posting),
        )
        .route(
            "/admin/profiles",
            get(admin::list_profiles).put(admin::upsert_profile),
        )
        .route("/admin/applications", get(admin::list_applications))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}
