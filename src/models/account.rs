use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::db::Db;
use crate::error::{AppError, is_duplicate_key};
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    // Wire values match the deployed database.
    #[serde(rename = "candidato")]
    Candidate,
    #[serde(rename = "empregador")]
    Employer,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "nome")]
    pub name: String,
    pub username: String,
    #[serde(rename = "senha_hash")]
    pub password_hash: String,
    pub role: Role,
    #[serde(rename = "data_criacao")]
    pub created_at: DateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl CreateAccount {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(AppError::BadRequest(
                "Name, username and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Account {
    /// Register a new account. The username pre-check gives a friendly
    /// message; the unique index on `username` is the backstop for races.
    pub async fn create(db: &Db, input: CreateAccount) -> Result<Account, AppError> {
        input.validate()?;

        let taken = db
            .accounts()
            .find_one(doc! { "username": input.username.trim() })
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let account = Account {
            id: None,
            name: input.name.trim().to_string(),
            username: input.username.trim().to_string(),
            password_hash: auth::hash_password(&input.password)?,
            role: input.role,
            created_at: DateTime::now(),
        };

        let inserted = match db.accounts().insert_one(&account).await {
            Ok(result) => Account {
                id: result.inserted_id.as_object_id(),
                ..account
            },
            Err(e) if is_duplicate_key(&e) => {
                return Err(AppError::Conflict(format!(
                    "Username '{}' is already taken",
                    input.username
                )));
            }
            Err(e) => return Err(e.into()),
        };

        // Candidates get a stub resume linked to the account so employer
        // views never dangle on a fresh signup.
        if inserted.role == Role::Candidate {
            Profile::seed_for_signup(db, &inserted.username, &inserted.name).await?;
        }

        Ok(inserted)
    }

    /// Exact credential check: account must exist and the password must
    /// verify against the stored argon2 hash.
    pub async fn verify_login(
        db: &Db,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        let Some(account) = db.accounts().find_one(doc! { "username": username }).await? else {
            return Ok(None);
        };
        if auth::verify_password(password, &account.password_hash) {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    pub async fn find_by_username(db: &Db, username: &str) -> Result<Option<Account>, AppError> {
        Ok(db.accounts().find_one(doc! { "username": username }).await?)
    }

    pub async fn list(db: &Db) -> Result<Vec<Account>, AppError> {
        use futures_util::TryStreamExt;
        let accounts = db
            .accounts()
            .find(doc! {})
            .sort(doc! { "data_criacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(accounts)
    }

    pub async fn count(db: &Db) -> Result<u64, AppError> {
        Ok(db.accounts().count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Candidate).unwrap(), "\"candidato\"");
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"empregador\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");

        let role: Role = serde_json::from_str("\"empregador\"").unwrap();
        assert_eq!(role, Role::Employer);
    }

    #[test]
    fn test_create_account_requires_fields() {
        let input = CreateAccount {
            name: "  ".to_string(),
            username: "joao".to_string(),
            password: "secret".to_string(),
            role: Role::Candidate,
        };
        assert!(input.validate().is_err());

        let input = CreateAccount {
            name: "João da Silva".to_string(),
            username: "joao".to_string(),
            password: "secret".to_string(),
            role: Role::Candidate,
        };
        assert!(input.validate().is_ok());
    }
}
