use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;
use crate::timeseries::view::GraphView;
use crate::timeseries::{bucket_records, Aggregate};

use super::dto::{AnalyzeFoodRequest, AnalyzeFoodResponse, FoodBucket, FoodGraphQuery};
use super::repo;
use super::repo::FoodRecord;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/food/records", get(list_records))
        .route("/food/graph", get(graph))
        .route("/food/graph/:bucket_id", get(graph_bucket))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/analyze-food", post(analyze_food))
}

/// Runs the image through the analyzer and answers with its breakdown.
/// The food_records row is written by a detached task: a store failure
/// must not turn a successful analysis into an error response.
#[instrument(skip(state, body))]
pub async fn analyze_food(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeFoodRequest>,
) -> Result<Json<AnalyzeFoodResponse>, ApiError> {
    if body.image.is_empty() {
        return Err(ApiError::MissingImage);
    }

    let analysis = state.analyzer.analyze(&body.prompt, &body.image).await?;

    let db = state.db.clone();
    let parts = analysis.parts.clone();
    let total_calories = analysis.total_calories.round() as i32;
    tokio::spawn(async move {
        let date = Utc::now().date_naive();
        if let Err(e) = repo::insert(&db, date, total_calories, &parts).await {
            tracing::error!(error = %e, "failed to persist food record");
        }
    });

    Ok(Json(AnalyzeFoodResponse { response: analysis }))
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<FoodRecord>>, ApiError> {
    let records = repo::list_all(&state.db).await?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn graph(
    State(state): State<AppState>,
    Query(query): Query<FoodGraphQuery>,
) -> Result<Json<Vec<FoodBucket>>, ApiError> {
    let records = repo::list_all(&state.db).await?;
    let buckets = bucket_records(&records, query.mode, Aggregate::Sum);
    Ok(Json(buckets.into_iter().map(FoodBucket::from).collect()))
}

#[instrument(skip(state))]
pub async fn graph_bucket(
    State(state): State<AppState>,
    Path(bucket_id): Path<String>,
    Query(query): Query<FoodGraphQuery>,
) -> Result<Json<FoodBucket>, ApiError> {
    let records = repo::list_all(&state.db).await?;

    let mut view = GraphView::new(records, query.mode, Aggregate::Sum);
    let bucket = view
        .select(&bucket_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Bucket not found".into()))?;

    Ok(Json(FoodBucket::from(bucket)))
}
