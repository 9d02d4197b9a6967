use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::geo;
use crate::models::posting::{CreatePosting, Posting, summarize};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PostingView {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_mode: String,
    pub salary: String,
    pub seniority: String,
    pub description: String,
    /// Display-only: first 150 characters of the description.
    pub summary: String,
    pub requirements: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl From<Posting> for PostingView {
    fn from(posting: Posting) -> Self {
        PostingView {
            id: posting.id.map(|id| id.to_hex()).unwrap_or_default(),
            summary: summarize(&posting.description),
            title: posting.title,
            company: posting.company,
            location: posting.location,
            work_mode: posting.work_mode,
            salary: posting.salary,
            seniority: posting.seniority,
            description: posting.description,
            requirements: posting.requirements,
            created_at: posting.created_at.to_chrono(),
            created_by: posting.created_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MapPoint {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

/// The whole feed, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PostingView>>, AppError> {
    let postings = Posting::list_recent(&state.db).await?;
    Ok(Json(postings.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreatePosting>,
) -> Result<Json<PostingView>, AppError> {
    user.require_employer()?;
    let posting = Posting::create(&state.db, input, &user.name).await?;
    Ok(Json(posting.into()))
}

/// Postings owned by the calling employer.
pub async fn mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<PostingView>>, AppError> {
    user.require_employer()?;
    let postings = Posting::list_for_employer(&state.db, &user.name).await?;
    Ok(Json(postings.into_iter().map(Into::into).collect()))
}

/// One point per posting whose location matched the city table; the
/// capital fallback when none did. Duplicates are intentional: two
/// listings in the same city plot twice.
pub async fn map(State(state): State<AppState>) -> Result<Json<Vec<MapPoint>>, AppError> {
    let postings = Posting::list_recent(&state.db).await?;
    Ok(Json(map_points(&postings)))
}

pub(crate) fn map_points(postings: &[Posting]) -> Vec<MapPoint> {
    let points: Vec<MapPoint> = postings
        .iter()
        .filter_map(|posting| {
            geo::locate(&posting.location).map(|(lat, lon)| MapPoint {
                label: posting.title.clone(),
                lat,
                lon,
            })
        })
        .collect();

    if points.is_empty() {
        let (lat, lon) = geo::DEFAULT_POINT;
        return vec![MapPoint {
            label: "Brasília".to_string(),
            lat,
            lon,
        }];
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn posting(title: &str, location: &str) -> Posting {
        Posting {
            id: None,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            work_mode: String::new(),
            salary: String::new(),
            seniority: String::new(),
            description: String::new(),
            requirements: String::new(),
            created_at: DateTime::now(),
            created_by: String::new(),
        }
    }

    #[test]
    fn test_map_points_keeps_duplicates() {
        let postings = vec![
            posting("Dev A", "São Paulo - SP"),
            posting("Dev B", "São Paulo - SP"),
            posting("Dev C", "Remoto"),
        ];
        let points = map_points(&postings);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].lat, points[1].lat);
    }

    #[test]
    fn test_map_points_falls_back_to_capital() {
        let postings = vec![posting("Dev", "Remoto")];
        let points = map_points(&postings);
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].lat, points[0].lon), geo::DEFAULT_POINT);
    }
}
