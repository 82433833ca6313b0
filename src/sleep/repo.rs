use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::timeseries::SeriesPoint;

/// One night of sleep. `date` is the calendar day the record was submitted
/// on, in the submitter's zone; `sleep_time`/`wake_time` are wall-clock
/// `HH:MM` strings in that same zone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub sleep_time: String,
    pub wake_time: String,
    pub hours_slept: f64,
    pub timezone: String,
    pub created_at: OffsetDateTime,
}

impl SeriesPoint for SleepRecord {
    fn series_date(&self) -> NaiveDate {
        self.date
    }
    fn series_value(&self) -> f64 {
        self.hours_slept
    }
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<SleepRecord>> {
    let rows = sqlx::query_as::<_, SleepRecord>(
        r#"
        SELECT id, date, sleep_time, wake_time, hours_slept, timezone, created_at
          FROM sleep_records
         ORDER BY date ASC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list sleep records")?;

    Ok(rows)
}

/// One row per calendar date; resubmitting replaces the whole row.
pub async fn upsert(
    db: &PgPool,
    date: NaiveDate,
    sleep_time: &str,
    wake_time: &str,
    hours_slept: f64,
    timezone: &str,
) -> anyhow::Result<SleepRecord> {
    let row = sqlx::query_as::<_, SleepRecord>(
        r#"
        INSERT INTO sleep_records (date, sleep_time, wake_time, hours_slept, timezone)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (date) DO UPDATE
           SET sleep_time = EXCLUDED.sleep_time,
               wake_time = EXCLUDED.wake_time,
               hours_slept = EXCLUDED.hours_slept,
               timezone = EXCLUDED.timezone
        RETURNING id, date, sleep_time, wake_time, hours_slept, timezone, created_at
        "#,
    )
    .bind(date)
    .bind(sleep_time)
    .bind(wake_time)
    .bind(hours_slept)
    .bind(timezone)
    .fetch_one(db)
    .await
    .context("upsert sleep record")?;

    Ok(row)
}
