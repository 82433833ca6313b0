use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: OffsetDateTime,
}

/// One completion of one habit on one date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HabitRecord {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub created_at: OffsetDateTime,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Habit>> {
    let rows = sqlx::query_as::<_, Habit>(
        r#"
        SELECT id, name, description, color, created_at
          FROM habits
         ORDER BY created_at ASC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list habits")?;

    Ok(rows)
}

/// Returns the raw sqlx error so the caller can tell a duplicate-name
/// violation apart from other failures.
pub async fn insert(
    db: &PgPool,
    name: &str,
    description: Option<&str>,
    color: &str,
) -> Result<Habit, sqlx::Error> {
    sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (name, description, color)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, color, created_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(color)
    .fetch_one(db)
    .await
}

/// Deletes the habit's completion rows first, then the habit itself, in
/// one transaction. There is no FK cascade on habit_records.
pub async fn delete_with_records(db: &PgPool, habit_id: Uuid) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;

    tx.execute(sqlx::query("DELETE FROM habit_records WHERE habit_id = $1").bind(habit_id))
        .await
        .context("delete habit records")?;

    let deleted = tx
        .execute(sqlx::query("DELETE FROM habits WHERE id = $1").bind(habit_id))
        .await
        .context("delete habit")?
        .rows_affected();

    tx.commit().await.context("commit tx")?;

    Ok(deleted > 0)
}

/// Idempotent: completing an already-completed day is a no-op. A missing
/// habit surfaces as an FK violation in the returned error.
pub async fn mark_complete(db: &PgPool, habit_id: Uuid, date: NaiveDate) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO habit_records (habit_id, date)
        VALUES ($1, $2)
        ON CONFLICT (habit_id, date) DO NOTHING
        "#,
    )
    .bind(habit_id)
    .bind(date)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn unmark_complete(db: &PgPool, habit_id: Uuid, date: NaiveDate) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM habit_records WHERE habit_id = $1 AND date = $2")
        .bind(habit_id)
        .bind(date)
        .execute(db)
        .await
        .context("delete habit record")?;

    Ok(())
}

/// Completion rows, optionally narrowed to an exact date or an inclusive
/// range. NULL binds skip the corresponding filter.
pub async fn list_records(
    db: &PgPool,
    date: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<Vec<HabitRecord>> {
    let rows = sqlx::query_as::<_, HabitRecord>(
        r#"
        SELECT id, habit_id, date, created_at
          FROM habit_records
         WHERE ($1::date IS NULL OR date = $1)
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
         ORDER BY date ASC
        "#,
    )
    .bind(date)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list habit records")?;

    Ok(rows)
}
