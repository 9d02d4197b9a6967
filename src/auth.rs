use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use sha2::{Digest, Sha256};

use crate::error::{AppError, HtmlError};
use crate::models::account::{Account, Role};
use crate::models::session::SessionRecord;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sessao";

/// Hash a raw session token for storage/lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a new random session token.
pub fn generate_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Salted one-way hash for stored passwords (PHC string).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Constant-time verification against the stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// The authenticated caller, resolved once per request by the session
/// middleware and read by handlers through the extractor impls below.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub token_hash: String,
}

impl CurrentUser {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Requires {} access",
                role.label()
            )))
        }
    }

    /// Admins share the employer surfaces (posting creation, applicant view).
    pub fn require_employer(&self) -> Result<(), AppError> {
        match self.role {
            Role::Employer | Role::Admin => Ok(()),
            Role::Candidate => Err(AppError::Forbidden("Requires employer access".to_string())),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

fn extract_token(request: &Request) -> Option<String> {
    let headers = request.headers();
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(token.to_string());
    }
    let cookies = headers.get(COOKIE).and_then(|v| v.to_str().ok())?;
    cookies.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}

async fn resolve_session(state: &AppState, token: &str) -> Result<Option<CurrentUser>, AppError> {
    let token_hash = hash_token(token);

    let Some(session) = SessionRecord::find_valid(&state.db, &token_hash).await? else {
        return Ok(None);
    };
    let Some(account) = Account::find_by_username(&state.db, &session.username).await? else {
        return Ok(None);
    };

    // Update last_used timestamp (fire and forget)
    let db = state.db.clone();
    let hash = token_hash.clone();
    tokio::spawn(async move {
        let _ = SessionRecord::touch(&db, &hash).await;
    });

    Ok(Some(CurrentUser {
        username: account.username,
        name: account.name,
        role: account.role,
        token_hash,
    }))
}

/// Middleware for the API: a valid session token is mandatory.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request).ok_or(AppError::Unauthorized)?;
    let user = resolve_session(&state, &token)
        .await?
        .ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware for the pages: attaches the caller when the session cookie
/// is valid, and lets anonymous visitors through.
pub async fn load_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, HtmlError> {
    if let Some(token) = extract_token(&request)
        && let Some(user) = resolve_session(&state, &token).await?
    {
        request.extensions_mut().insert(user);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(hash_token("abc").len(), 64);
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
