use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};

use crate::db::Db;
use crate::error::AppError;

// Form option values as the deployed dataset stores them.
pub const WORK_MODES: &[&str] = &["Remoto", "Híbrido", "Presencial"];
pub const SENIORITY_LEVELS: &[&str] = &["Estágio", "Júnior", "Pleno", "Sênior", "Especialista"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "local", default)]
    pub location: String,
    #[serde(rename = "tipo", default)]
    pub work_mode: String,
    #[serde(rename = "salario", default)]
    pub salary: String,
    #[serde(rename = "senioridade", default)]
    pub seniority: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "requisitos", default)]
    pub requirements: String,
    #[serde(rename = "data_criacao")]
    pub created_at: DateTime,
    // Older documents predate this field; the employer filter falls back
    // to the company name for them.
    #[serde(rename = "criado_por", default)]
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_mode: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub seniority: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
}

impl CreatePosting {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty()
            || self.company.trim().is_empty()
            || self.description.trim().is_empty()
        {
            return Err(AppError::BadRequest(
                "Title, company and description are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Display-only summary: the first 150 characters with an ellipsis.
pub fn summarize(description: &str) -> String {
    const LIMIT: usize = 150;
    match description.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &description[..idx]),
        None => description.to_string(),
    }
}

impl Posting {
    pub async fn create(
        db: &Db,
        input: CreatePosting,
        created_by: &str,
    ) -> Result<Posting, AppError> {
        input.validate()?;
        let posting = Posting {
            id: None,
            title: input.title.trim().to_string(),
            company: input.company.trim().to_string(),
            location: input.location.trim().to_string(),
            work_mode: input.work_mode,
            salary: input.salary,
            seniority: input.seniority,
            description: input.description,
            requirements: input.requirements,
            created_at: DateTime::now(),
            created_by: created_by.to_string(),
        };
        let result = db.postings().insert_one(&posting).await?;
        Ok(Posting {
            id: result.inserted_id.as_object_id(),
            ..posting
        })
    }

    pub async fn get(db: &Db, id: ObjectId) -> Result<Posting, AppError> {
        db.postings()
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Posting {id} not found")))
    }

    /// Whole feed, newest first. The feed is unpaginated by design of the
    /// product page it renders.
    pub async fn list_recent(db: &Db) -> Result<Vec<Posting>, AppError> {
        use futures_util::TryStreamExt;
        let postings = db
            .postings()
            .find(doc! {})
            .sort(doc! { "data_criacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(postings)
    }

    /// Postings owned by an employer: tagged with their name at creation,
    /// or carrying their name as the company (documents that predate the
    /// creator tag).
    pub async fn list_for_employer(db: &Db, display_name: &str) -> Result<Vec<Posting>, AppError> {
        use futures_util::TryStreamExt;
        let filter = doc! {
            "$or": [
                { "criado_por": display_name },
                { "empresa": display_name },
            ]
        };
        let postings = db
            .postings()
            .find(filter)
            .sort(doc! { "data_criacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(postings)
    }

    pub async fn count(db: &Db) -> Result<u64, AppError> {
        Ok(db.postings().count_documents(doc! {}).await?)
    }

    /// Distribution of postings per work mode, most common first.
    pub async fn count_by_work_mode(db: &Db) -> Result<Vec<(String, i64)>, AppError> {
        use futures_util::TryStreamExt;
        let pipeline = vec![
            doc! { "$group": { "_id": { "$ifNull": ["$tipo", "—"] }, "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1, "_id": 1 } },
        ];
        let mut cursor = db.raw(crate::db::POSTINGS).aggregate(pipeline).await?;
        let mut counts = Vec::new();
        while let Some(entry) = cursor.try_next().await? {
            let mode = entry.get_str("_id").unwrap_or("—").to_string();
            let count = entry
                .get_i64("count")
                .or_else(|_| entry.get_i32("count").map(i64::from))
                .unwrap_or(0);
            counts.push((mode, count));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_short_description_untouched() {
        assert_eq!(summarize("Backend role"), "Backend role");
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_summarize_truncates_at_150_chars() {
        let long = "x".repeat(200);
        let summary = summarize(&long);
        assert_eq!(summary, format!("{}...", "x".repeat(150)));

        let exact = "y".repeat(150);
        assert_eq!(summarize(&exact), exact);
    }

    #[test]
    fn test_summarize_respects_utf8_boundaries() {
        // Accented text must not split a multi-byte character.
        let long = "ã".repeat(160);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), 153);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_create_posting_requires_fields() {
        let input = CreatePosting {
            title: "Dev".to_string(),
            company: "".to_string(),
            location: String::new(),
            work_mode: String::new(),
            salary: String::new(),
            seniority: String::new(),
            description: "Builds things".to_string(),
            requirements: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
