use mongodb::bson::{doc, from_document};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::db::{self, Db};
use crate::error::AppError;
use crate::models::posting::Posting;
use crate::models::profile::Profile;

/// Which text index a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTarget {
    Postings,
    Profiles,
}

/// A document annotated with the engine's relevance score.
#[derive(Debug, Clone)]
pub struct SearchHit<T> {
    pub item: T,
    pub score: f64,
}

/// Run a `$text` query against one collection, sorted by descending
/// `textScore`. Parsing, stemming and ranking are entirely the engine's.
async fn text_search<T: DeserializeOwned + Send + Sync>(
    db: &Db,
    collection: &str,
    term: &str,
) -> Result<Vec<SearchHit<T>>, AppError> {
    use futures_util::TryStreamExt;

    if term.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = db
        .raw(collection)
        .find(doc! { "$text": { "$search": term } })
        .projection(doc! { "score": { "$meta": "textScore" } })
        .sort(doc! { "score": { "$meta": "textScore" } })
        .await?;

    let mut hits = Vec::new();
    while let Some(mut document) = cursor.try_next().await? {
        let score = document
            .remove("score")
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        let item =
            from_document(document).map_err(|e| AppError::Internal(format!("Bad document: {e}")))?;
        hits.push(SearchHit { item, score });
    }
    Ok(hits)
}

pub async fn search_postings(db: &Db, term: &str) -> Result<Vec<SearchHit<Posting>>, AppError> {
    text_search(db, db::POSTINGS, term).await
}

pub async fn search_profiles(db: &Db, term: &str) -> Result<Vec<SearchHit<Profile>>, AppError> {
    text_search(db, db::PROFILES, term).await
}

/// Assistant reply for a posting query, appended to the transcript.
pub fn posting_reply(query: &str, hits: &[SearchHit<Posting>]) -> String {
    if hits.is_empty() {
        return no_match_reply(query);
    }
    let mut reply = format!("Found {} matches ordered by relevance:\n\n", hits.len());
    for hit in hits {
        reply.push_str(&format!(
            "Score: {:.2} | {}\n  Company: {}\n  Requirements: {}\n\n",
            hit.score, hit.item.title, hit.item.company, hit.item.requirements
        ));
    }
    reply.push_str(SCORE_FOOTNOTE);
    reply
}

/// Assistant reply for a profile query.
pub fn profile_reply(query: &str, hits: &[SearchHit<Profile>]) -> String {
    if hits.is_empty() {
        return no_match_reply(query);
    }
    let mut reply = format!("Found {} matches ordered by relevance:\n\n", hits.len());
    for hit in hits {
        reply.push_str(&format!(
            "Score: {:.2} | {}\n  Skills: {}\n  Summary: {}\n\n",
            hit.score, hit.item.name, hit.item.skills, hit.item.summary
        ));
    }
    reply.push_str(SCORE_FOOTNOTE);
    reply
}

fn no_match_reply(query: &str) -> String {
    format!("No match found for '{query}' in the search indexes.")
}

const SCORE_FOOTNOTE: &str =
    "The score reflects how often and how prominently your terms appear in each document.";

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn posting(title: &str) -> Posting {
        Posting {
            id: None,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            work_mode: String::new(),
            salary: String::new(),
            seniority: String::new(),
            description: String::new(),
            requirements: "Rust".to_string(),
            created_at: DateTime::now(),
            created_by: String::new(),
        }
    }

    #[test]
    fn test_search_target_from_wire() {
        let target: SearchTarget = serde_json::from_str("\"postings\"").unwrap();
        assert_eq!(target, SearchTarget::Postings);
        let target: SearchTarget = serde_json::from_str("\"profiles\"").unwrap();
        assert_eq!(target, SearchTarget::Profiles);
    }

    #[test]
    fn test_posting_reply_lists_hits_in_given_order() {
        let hits = vec![
            SearchHit { item: posting("Senior Rust Dev"), score: 2.75 },
            SearchHit { item: posting("Backend Dev"), score: 1.5 },
        ];
        let reply = posting_reply("rust", &hits);
        assert!(reply.starts_with("Found 2 matches"));
        let first = reply.find("Senior Rust Dev").unwrap();
        let second = reply.find("Backend Dev").unwrap();
        assert!(first < second);
        assert!(reply.contains("Score: 2.75"));
        assert!(reply.contains("Score: 1.50"));
    }

    #[test]
    fn test_no_match_reply_names_the_query() {
        let reply = posting_reply("cobol", &[]);
        assert!(reply.contains("'cobol'"));
    }
}
