use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono_tz::Tz;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreateHabitRequest, HabitRecordsQuery, ToggleHabitRequest, ToggleHabitResponse};
use super::repo::{Habit, HabitRecord};
use super::{repo, services};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/habits", get(list_habits))
        .route("/habits/records", get(list_records))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/habits", post(create_habit))
        .route("/habits/:id", delete(delete_habit))
        .route("/habits/:id/today", put(toggle_today))
}

#[instrument(skip(state))]
pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, ApiError> {
    let habits = repo::list_all(&state.db).await?;
    Ok(Json(habits))
}

#[instrument(skip(state))]
pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), ApiError> {
    if body.name.is_empty() {
        return Err(ApiError::Validation("Habit name is required".into()));
    }

    let color = services::random_color();
    match repo::insert(&state.db, &body.name, body.description.as_deref(), &color).await {
        Ok(habit) => Ok((StatusCode::CREATED, Json(habit))),
        Err(e) if services::is_unique_name_violation(&e) => Err(ApiError::Conflict(format!(
            "Habit \"{}\" already exists!",
            body.name
        ))),
        Err(e) => Err(ApiError::Store(e.into())),
    }
}

#[instrument(skip(state))]
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete_with_records(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Habit not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Idempotent toggle of today's completion. Two completes leave one row;
/// un-completing an unmarked day is a no-op.
#[instrument(skip(state))]
pub async fn toggle_today(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ToggleHabitRequest>,
) -> Result<Json<ToggleHabitResponse>, ApiError> {
    let tz = body
        .timezone
        .as_deref()
        .map(|name| {
            name.parse::<Tz>()
                .map_err(|_| ApiError::Validation(format!("Invalid timezone: {name}")))
        })
        .transpose()?;
    let date = services::completion_date(tz);

    if body.completed {
        match repo::mark_complete(&state.db, id, date).await {
            Ok(()) => {}
            Err(e) if services::is_missing_habit_violation(&e) => {
                return Err(ApiError::NotFound("Habit not found".into()));
            }
            Err(e) => return Err(ApiError::Store(e.into())),
        }
    } else {
        repo::unmark_complete(&state.db, id, date).await?;
    }

    Ok(Json(ToggleHabitResponse {
        habit_id: id,
        date,
        completed: body.completed,
    }))
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<HabitRecordsQuery>,
) -> Result<Json<Vec<HabitRecord>>, ApiError> {
    let records = repo::list_records(&state.db, query.date, query.from, query.to).await?;
    Ok(Json(records))
}

#[cfg(test)]
mod habit_handler_tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::state::AppState;

    fn app() -> Router {
        super::super::router().with_state(AppState::fake())
    }

    #[tokio::test]
    async fn create_rejects_an_empty_name() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/habits")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Habit name is required");
    }

    #[tokio::test]
    async fn toggle_rejects_an_unknown_timezone() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/habits/{}/today", uuid::Uuid::new_v4()))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"completed":true,"timezone":"Not/AZone"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid timezone: Not/AZone");
    }

    #[tokio::test]
    async fn toggle_rejects_a_malformed_habit_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/habits/not-a-uuid/today")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"completed":true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
