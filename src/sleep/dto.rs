use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timeseries::{Bucket, ViewMode};

use super::repo::SleepRecord;

#[derive(Debug, Deserialize)]
pub struct SaveSleepRequest {
    pub sleep_time: String,
    pub wake_time: String,
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct SleepRecordsQuery {
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SleepGraphQuery {
    #[serde(default)]
    pub mode: ViewMode,
    pub tz: Option<String>,
}

/// One graph point: mean hours plus the times of the first night in the
/// bucket as the representative label.
#[derive(Debug, Serialize)]
pub struct SleepBucket {
    pub id: String,
    pub date: NaiveDate,
    pub hours_slept: f64,
    pub sleep_time: String,
    pub wake_time: String,
    pub records: Vec<SleepRecord>,
}

impl From<Bucket<SleepRecord>> for SleepBucket {
    fn from(bucket: Bucket<SleepRecord>) -> Self {
        let (sleep_time, wake_time) = bucket
            .records
            .first()
            .map(|r| (r.sleep_time.clone(), r.wake_time.clone()))
            .unwrap_or_default();

        Self {
            id: bucket.id,
            date: bucket.date,
            hours_slept: bucket.value,
            sleep_time,
            wake_time,
            records: bucket.records,
        }
    }
}
