use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};

use crate::db::Db;
use crate::error::{AppError, is_duplicate_key};
use crate::models::posting::Posting;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "vaga_id")]
    pub posting_id: ObjectId,
    // Display snapshot; the stable reference is posting_id.
    #[serde(rename = "vaga_titulo")]
    pub posting_title: String,
    #[serde(rename = "vaga_empresa")]
    pub posting_company: String,
    pub username: String,
    #[serde(rename = "data_aplicacao")]
    pub applied_at: DateTime,
}

/// Applying twice is a soft outcome, not an error: the second attempt is
/// reported as a duplicate and nothing is written.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied(Application),
    Duplicate,
}

impl Application {
    pub async fn apply(
        db: &Db,
        posting: &Posting,
        username: &str,
    ) -> Result<ApplyOutcome, AppError> {
        let posting_id = posting
            .id
            .ok_or_else(|| AppError::Internal("Posting without id".to_string()))?;

        let existing = db
            .applications()
            .find_one(doc! { "vaga_id": posting_id, "username": username })
            .await?;
        if existing.is_some() {
            return Ok(ApplyOutcome::Duplicate);
        }

        let application = Application {
            id: None,
            posting_id,
            posting_title: posting.title.clone(),
            posting_company: posting.company.clone(),
            username: username.to_string(),
            applied_at: DateTime::now(),
        };

        match db.applications().insert_one(&application).await {
            Ok(result) => Ok(ApplyOutcome::Applied(Application {
                id: result.inserted_id.as_object_id(),
                ..application
            })),
            // Concurrent double-click: the unique index wins the race.
            Err(e) if is_duplicate_key(&e) => Ok(ApplyOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_for_posting(
        db: &Db,
        posting_id: ObjectId,
    ) -> Result<Vec<Application>, AppError> {
        use futures_util::TryStreamExt;
        let applications = db
            .applications()
            .find(doc! { "vaga_id": posting_id })
            .sort(doc! { "data_aplicacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(applications)
    }

    pub async fn list(db: &Db) -> Result<Vec<Application>, AppError> {
        use futures_util::TryStreamExt;
        let applications = db
            .applications()
            .find(doc! {})
            .sort(doc! { "data_aplicacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(applications)
    }

    pub async fn count(db: &Db) -> Result<u64, AppError> {
        Ok(db.applications().count_documents(doc! {}).await?)
    }
}
