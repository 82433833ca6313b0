use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono_tz::Tz;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;
use crate::timeseries::view::GraphView;
use crate::timeseries::{bucket_records, Aggregate};

use super::dto::{SaveSleepRequest, SleepBucket, SleepGraphQuery, SleepRecordsQuery};
use super::repo::SleepRecord;
use super::{repo, services};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/sleep/records", get(list_records))
        .route("/sleep/graph", get(graph))
        .route("/sleep/graph/:bucket_id", get(graph_bucket))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/sleep/records", put(save_record))
}

#[instrument(skip(state))]
pub async fn save_record(
    State(state): State<AppState>,
    Json(body): Json<SaveSleepRequest>,
) -> Result<Json<SleepRecord>, ApiError> {
    if !services::is_valid_hhmm(&body.sleep_time) {
        return Err(ApiError::Validation(
            "sleep_time must be a HH:MM time".into(),
        ));
    }
    if !services::is_valid_hhmm(&body.wake_time) {
        return Err(ApiError::Validation(
            "wake_time must be a HH:MM time".into(),
        ));
    }
    let tz = parse_tz(&body.timezone)?;

    let hours_slept = services::calculate_sleep_hours(&body.sleep_time, &body.wake_time);
    let date = services::today_in_zone(tz);

    let record = repo::upsert(
        &state.db,
        date,
        &body.sleep_time,
        &body.wake_time,
        hours_slept,
        tz.name(),
    )
    .await?;

    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<SleepRecordsQuery>,
) -> Result<Json<Vec<SleepRecord>>, ApiError> {
    let records = fetch_normalized(&state, query.tz.as_deref()).await?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn graph(
    State(state): State<AppState>,
    Query(query): Query<SleepGraphQuery>,
) -> Result<Json<Vec<SleepBucket>>, ApiError> {
    let records = fetch_normalized(&state, query.tz.as_deref()).await?;
    let buckets = bucket_records(&records, query.mode, Aggregate::Mean);
    Ok(Json(buckets.into_iter().map(SleepBucket::from).collect()))
}

#[instrument(skip(state))]
pub async fn graph_bucket(
    State(state): State<AppState>,
    Path(bucket_id): Path<String>,
    Query(query): Query<SleepGraphQuery>,
) -> Result<Json<SleepBucket>, ApiError> {
    let records = fetch_normalized(&state, query.tz.as_deref()).await?;

    let mut view = GraphView::new(records, query.mode, Aggregate::Mean);
    let bucket = view
        .select(&bucket_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Bucket not found".into()))?;

    Ok(Json(SleepBucket::from(bucket)))
}

async fn fetch_normalized(
    state: &AppState,
    tz: Option<&str>,
) -> Result<Vec<SleepRecord>, ApiError> {
    let viewer_tz = tz.map(parse_tz).transpose()?;

    let mut records = repo::list_all(&state.db).await?;
    if let Some(tz) = viewer_tz {
        records = records
            .into_iter()
            .map(|r| services::normalize_to_timezone(r, tz))
            .collect();
    }
    Ok(records)
}

fn parse_tz(name: &str) -> Result<Tz, ApiError> {
    name.parse()
        .map_err(|_| ApiError::Validation(format!("Invalid timezone: {name}")))
}

#[cfg(test)]
mod sleep_handler_tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::state::AppState;

    fn app() -> Router {
        super::super::router().with_state(AppState::fake())
    }

    fn put_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn save_rejects_malformed_sleep_time() {
        let response = app()
            .oneshot(put_json(
                "/sleep/records",
                r#"{"sleep_time":"25:00","wake_time":"07:00","timezone":"UTC"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "sleep_time must be a HH:MM time");
    }

    #[tokio::test]
    async fn save_rejects_malformed_wake_time() {
        let response = app()
            .oneshot(put_json(
                "/sleep/records",
                r#"{"sleep_time":"23:00","wake_time":"7am","timezone":"UTC"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn save_rejects_unknown_timezone() {
        let response = app()
            .oneshot(put_json(
                "/sleep/records",
                r#"{"sleep_time":"23:00","wake_time":"07:00","timezone":"Mars/Olympus_Mons"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid timezone: Mars/Olympus_Mons");
    }

    #[tokio::test]
    async fn graph_rejects_unknown_viewer_timezone() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/sleep/graph?mode=week&tz=Nowhere/Void")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn graph_rejects_unknown_mode() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/sleep/graph?mode=decade")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
