use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::db::Db;
use crate::error::AppError;

/// Server-side session record. The raw token lives only with the client;
/// the database stores its sha256 hash. Expired records are reaped by the
/// TTL index and rejected by the expiry filter before then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub token_hash: String,
    pub username: String,
    #[serde(rename = "data_criacao")]
    pub created_at: DateTime,
    #[serde(rename = "expira_em")]
    pub expires_at: DateTime,
    #[serde(rename = "ultimo_uso", default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime>,
}

impl SessionRecord {
    /// Open a session for a verified login and return the raw token.
    pub async fn create(
        db: &Db,
        username: &str,
        ttl: chrono::Duration,
    ) -> Result<String, AppError> {
        let token = auth::generate_token();
        let record = SessionRecord {
            id: None,
            token_hash: auth::hash_token(&token),
            username: username.to_string(),
            created_at: DateTime::now(),
            expires_at: DateTime::from_chrono(Utc::now() + ttl),
            last_used: None,
        };
        db.sessions().insert_one(&record).await?;
        Ok(token)
    }

    pub async fn find_valid(db: &Db, token_hash: &str) -> Result<Option<SessionRecord>, AppError> {
        let record = db
            .sessions()
            .find_one(doc! {
                "token_hash": token_hash,
                "expira_em": { "$gt": DateTime::now() },
            })
            .await?;
        Ok(record)
    }

    pub async fn touch(db: &Db, token_hash: &str) -> Result<(), AppError> {
        db.sessions()
            .update_one(
                doc! { "token_hash": token_hash },
                doc! { "$set": { "ultimo_uso": DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    pub async fn revoke(db: &Db, token_hash: &str) -> Result<(), AppError> {
        db.sessions()
            .delete_one(doc! { "token_hash": token_hash })
            .await?;
        Ok(())
    }
}
