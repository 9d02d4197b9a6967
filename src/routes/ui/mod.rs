pub mod admin;
pub mod auth;
pub mod employer;
pub mod home;
pub mod profile;
pub mod search;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::auth::{CurrentUser, load_session};
use crate::error::{AppError, HtmlError};
use crate::models::account::Role;
use crate::state::AppState;

/// Data every page hands to the base template: who is signed in and which
/// navigation links their role unlocks.
pub struct Shell {
    pub user_name: Option<String>,
    pub links: Vec<NavLink>,
}

pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

pub(super) fn shell(user: Option<&CurrentUser>) -> Shell {
    let Some(user) = user else {
        return Shell {
            user_name: None,
            links: Vec::new(),
        };
    };

    let mut links = Vec::new();
    match user.role {
        Role::Candidate => links.push(NavLink {
            href: "/profile",
            label: "My resume",
        }),
        Role::Employer => links.push(NavLink {
            href: "/employer",
            label: "Manage postings",
        }),
        Role::Admin => links.push(NavLink {
            href: "/admin",
            label: "Admin panel",
        }),
    }
    links.push(NavLink {
        href: "/search",
        label: "Search assistant",
    });

    Shell {
        user_name: Some(user.name.clone()),
        links,
    }
}

pub(super) fn require_user(user: Option<CurrentUser>) -> Result<CurrentUser, HtmlError> {
    user.ok_or(HtmlError(AppError::Unauthorized))
}

#[derive(Debug, Deserialize)]
pub struct FlashParams {
    pub msg: Option<String>,
}

/// Flash banners travel as fixed codes in the query string; free text in
/// a redirect URL would need escaping the codes never do.
pub(super) fn flash_text(params: &FlashParams) -> Option<String> {
    let text = match params.msg.as_deref()? {
        "applied" => "Application sent!",
        "duplicate" => "You have already applied to this posting.",
        "saved" => "Resume saved! You can now apply to postings on the home page.",
        "posted" => "Posting published!",
        "created" => "Account created. Sign in to continue.",
        "taken" => "That username is already taken.",
        "missing" => "Fill in the required fields.",
        "invalid" => "Incorrect username or password.",
        _ => return None,
    };
    Some(text.to_string())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/apply/{id}", post(home::apply))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/profile", get(profile::page).post(profile::save))
        .route("/employer", get(employer::page))
        .route("/employer/postings", post(employer::create_posting))
        .route("/admin", get(admin::page))
        .route("/admin/postings", post(admin::create_posting))
        .route("/admin/profiles", post(admin::create_profile))
        .route("/admin/accounts", post(admin::create_account))
        .route("/search", get(search::page).post(search::run))
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .with_state(state)
}
