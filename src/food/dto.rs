use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ai::FoodItemList;
use crate::timeseries::{Bucket, ViewMode};

use super::repo::FoodRecord;

#[derive(Debug, Deserialize)]
pub struct AnalyzeFoodRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    pub response: FoodItemList,
}

#[derive(Debug, Deserialize)]
pub struct FoodGraphQuery {
    #[serde(default)]
    pub mode: ViewMode,
}

#[derive(Debug, Serialize)]
pub struct FoodBucket {
    pub id: String,
    pub date: NaiveDate,
    pub total_calories: f64,
    pub records: Vec<FoodRecord>,
}

impl From<Bucket<FoodRecord>> for FoodBucket {
    fn from(bucket: Bucket<FoodRecord>) -> Self {
        Self {
            id: bucket.id,
            date: bucket.date,
            total_calories: bucket.value,
            records: bucket.records,
        }
    }
}
