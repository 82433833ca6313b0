use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ai::FoodItem;
use crate::timeseries::SeriesPoint;

/// One analyzed meal. `parts` keeps the model's item breakdown nested in
/// the row, in the order the model listed them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub total_calories: i32,
    pub parts: Json<Vec<FoodItem>>,
    pub created_at: OffsetDateTime,
}

impl SeriesPoint for FoodRecord {
    fn series_date(&self) -> NaiveDate {
        self.date
    }
    fn series_value(&self) -> f64 {
        f64::from(self.total_calories)
    }
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<FoodRecord>> {
    let rows = sqlx::query_as::<_, FoodRecord>(
        r#"
        SELECT id, date, total_calories, parts, created_at
          FROM food_records
         ORDER BY date ASC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list food records")?;

    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    date: NaiveDate,
    total_calories: i32,
    parts: &[FoodItem],
) -> anyhow::Result<FoodRecord> {
    let row = sqlx::query_as::<_, FoodRecord>(
        r#"
        INSERT INTO food_records (date, total_calories, parts)
        VALUES ($1, $2, $3)
        RETURNING id, date, total_calories, parts, created_at
        "#,
    )
    .bind(date)
    .bind(total_calories)
    .bind(Json(parts))
    .fetch_one(db)
    .await
    .context("insert food record")?;

    Ok(row)
}
