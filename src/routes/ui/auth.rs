use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::{CurrentUser, SESSION_COOKIE};
use crate::error::{AppError, HtmlError};
use crate::models::account::{Account, CreateAccount, Role};
use crate::models::session::SessionRecord;
use crate::routes::ui::{FlashParams, Shell, flash_text, shell};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    shell: Shell,
    flash: Option<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate {
    shell: Shell,
    flash: Option<String>,
}

pub async fn login_page(
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let tmpl = LoginTemplate {
        shell: shell(user.as_ref()),
        flash: flash_text(&params),
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

pub async fn signup_page(
    user: Option<CurrentUser>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, HtmlError> {
    let tmpl = SignupTemplate {
        shell: shell(user.as_ref()),
        flash: flash_text(&params),
    };
    Ok(Html(
        tmpl.render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Form(input): Form<LoginForm>,
) -> Result<Response, HtmlError> {
    let Some(account) =
        Account::verify_login(&state.db, &input.username, &input.password).await?
    else {
        return Ok(Redirect::to("/login?msg=invalid").into_response());
    };

    let token = SessionRecord::create(&state.db, &account.username, state.session_ttl).await?;
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.session_ttl.num_seconds()
    );
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub async fn signup(
    State(state): State<AppState>,
    Form(input): Form<SignupForm>,
) -> Result<Response, HtmlError> {
    // The public form only offers candidate and employer; reject a forged
    // admin role outright.
    if input.role == Role::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts are created from the admin panel".to_string(),
        )
        .into());
    }

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
        Ok(_) => Ok(Redirect::to("/login?msg=created").into_response()),
        Err(AppError::Conflict(_)) => Ok(Redirect::to("/signup?msg=taken").into_response()),
        Err(AppError::BadRequest(_)) => Ok(Redirect::to("/signup?msg=missing").into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Response, HtmlError> {
    if let Some(user) = user {
        SessionRecord::revoke(&state.db, &user.token_hash).await?;
        state.transcripts.clear(&user.token_hash);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
