use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleHabitRequest {
    pub completed: bool,
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
}

/// `date` narrows to one day; `from`/`to` select an inclusive range (the
/// completion grid asks for the trailing twelve weeks).
#[derive(Debug, Deserialize)]
pub struct HabitRecordsQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
