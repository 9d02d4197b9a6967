use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};

use crate::db::Db;
use crate::error::AppError;

// Education levels as the deployed dataset stores them.
pub const EDUCATION_LEVELS: &[&str] = &[
    "Ensino Médio",
    "Cursando Superior",
    "Superior Completo",
    "Pós-Graduação",
    "Mestrado/Doutorado",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "formacao", default)]
    pub education: String,
    #[serde(rename = "idiomas", default)]
    pub languages: String,
    #[serde(rename = "resumo", default)]
    pub summary: String,
    #[serde(rename = "experiencia", default)]
    pub experience: String,
    #[serde(rename = "skills", default)]
    pub skills: String,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: DateTime,
    // Link to the owning account. Admin-entered profiles have none.
    #[serde(rename = "username_vinculo", default, skip_serializing_if = "Option::is_none")]
    pub account_username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfile {
    pub name: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub languages: String,
    pub summary: String,
    #[serde(default)]
    pub experience: String,
    pub skills: String,
}

impl UpsertProfile {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty()
            || self.summary.trim().is_empty()
            || self.skills.trim().is_empty()
        {
            return Err(AppError::BadRequest(
                "Name, summary and skills are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Profile {
    /// The resume shown on the candidate page: keyed by the account link,
    /// falling back to the display name for documents saved before the
    /// link field existed.
    pub async fn find_for_account(
        db: &Db,
        username: &str,
        display_name: &str,
    ) -> Result<Option<Profile>, AppError> {
        if let Some(profile) = db
            .profiles()
            .find_one(doc! { "username_vinculo": username })
            .await?
        {
            return Ok(Some(profile));
        }
        Ok(db.profiles().find_one(doc! { "nome": display_name }).await?)
    }

    /// Resume lookup for the employer's applicant view. Falls back to a
    /// name equal to the applicant's username for unlinked documents.
    pub async fn find_for_applicant(db: &Db, username: &str) -> Result<Option<Profile>, AppError> {
        if let Some(profile) = db
            .profiles()
            .find_one(doc! { "username_vinculo": username })
            .await?
        {
            return Ok(Some(profile));
        }
        Ok(db.profiles().find_one(doc! { "nome": username }).await?)
    }

    /// Save the candidate's resume. Upserts on the stable account link, so
    /// renaming the displayed name edits the same document instead of
    /// forking a new one. Overwrites every field, idempotently.
    pub async fn upsert_for_account(
        db: &Db,
        username: &str,
        input: UpsertProfile,
    ) -> Result<(), AppError> {
        input.validate()?;
        let update = doc! {
            "$set": {
                "nome": input.name.trim(),
                "formacao": input.education.as_str(),
                "idiomas": input.languages.as_str(),
                "resumo": input.summary.as_str(),
                "experiencia": input.experience.as_str(),
                "skills": input.skills.as_str(),
                "data_atualizacao": DateTime::now(),
                "username_vinculo": username,
            }
        };
        db.profiles()
            .update_one(doc! { "username_vinculo": username }, update)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Admin-entered resume with no owning account: upserts on the name,
    /// as the deployed data always has.
    pub async fn admin_upsert(db: &Db, input: UpsertProfile) -> Result<(), AppError> {
        input.validate()?;
        let name = input.name.trim().to_string();
        let update = doc! {
            "$set": {
                "nome": name.as_str(),
                "formacao": input.education.as_str(),
                "idiomas": input.languages.as_str(),
                "resumo": input.summary.as_str(),
                "experiencia": input.experience.as_str(),
                "skills": input.skills.as_str(),
                "data_atualizacao": DateTime::now(),
            }
        };
        db.profiles()
            .update_one(doc! { "nome": name.as_str() }, update)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Stub created at candidate signup so the account always has a
    /// linked resume document. Never clobbers an existing one.
    pub async fn seed_for_signup(db: &Db, username: &str, name: &str) -> Result<(), AppError> {
        let update = doc! {
            "$setOnInsert": {
                "nome": name,
                "data_atualizacao": DateTime::now(),
                "username_vinculo": username,
            }
        };
        db.profiles()
            .update_one(doc! { "username_vinculo": username }, update)
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn list(db: &Db) -> Result<Vec<Profile>, AppError> {
        use futures_util::TryStreamExt;
        let profiles = db
            .profiles()
            .find(doc! {})
            .sort(doc! { "data_atualizacao": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(profiles)
    }

    pub async fn count(db: &Db) -> Result<u64, AppError> {
        Ok(db.profiles().count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_profile_requires_fields() {
        let input = UpsertProfile {
            name: "Maria".to_string(),
            education: String::new(),
            languages: String::new(),
            summary: "Engineer".to_string(),
            skills: "".to_string(),
            experience: String::new(),
        };
        assert!(input.validate().is_err());

        let input = UpsertProfile {
            name: "Maria".to_string(),
            education: String::new(),
            languages: String::new(),
            summary: "Engineer".to_string(),
            skills: "Rust, SQL".to_string(),
            experience: String::new(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_profile_tolerates_sparse_documents() {
        // Documents written by earlier versions carry only a name.
        let doc = doc! { "nome": "Maria", "data_atualizacao": DateTime::now() };
        let profile: Profile = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(profile.name, "Maria");
        assert!(profile.skills.is_empty());
        assert!(profile.account_username.is_none());
    }
}
