use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

use super::repo::SleepRecord;

pub(crate) fn is_valid_hhmm(value: &str) -> bool {
    lazy_static! {
        static ref HHMM_RE: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    }
    HHMM_RE.is_match(value)
}

/// Hours between falling asleep and waking, at most one midnight crossing.
/// An empty or unparseable time means the field was never filled in and
/// the night counts as 0.
pub fn calculate_sleep_hours(sleep_time: &str, wake_time: &str) -> f64 {
    let (Some(sleep), Some(wake)) = (parse_hhmm(sleep_time), parse_hhmm(wake_time)) else {
        return 0.0;
    };

    let sleep_minutes = minutes_of(sleep);
    let wake_minutes = minutes_of(wake);

    let total_minutes = if wake_minutes >= sleep_minutes {
        wake_minutes - sleep_minutes
    } else {
        24 * 60 - sleep_minutes + wake_minutes
    };

    (total_minutes as f64 / 60.0 * 100.0).round() / 100.0
}

/// Today's date on the wall clock of the given zone.
pub fn today_in_zone(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Re-expresses the stored wall-clock times in the viewer's zone.
/// `date` and `hours_slept` stay as recorded even when the conversion
/// crosses midnight, so a record never moves to a different bucket.
/// A record whose stored zone or times cannot be parsed is returned
/// unchanged.
pub fn normalize_to_timezone(mut record: SleepRecord, viewer_tz: Tz) -> SleepRecord {
    if record.timezone == viewer_tz.name() {
        return record;
    }
    let Ok(record_tz) = record.timezone.parse::<Tz>() else {
        return record;
    };

    if let Some(converted) = convert_time(record.date, &record.sleep_time, record_tz, viewer_tz) {
        record.sleep_time = converted;
    }
    if let Some(converted) = convert_time(record.date, &record.wake_time, record_tz, viewer_tz) {
        record.wake_time = converted;
    }
    record
}

fn convert_time(date: NaiveDate, time: &str, from: Tz, to: Tz) -> Option<String> {
    let time = parse_hhmm(time)?;
    // earliest() is None for wall-clock times skipped by a DST jump; the
    // field keeps its stored value in that case.
    let instant = from.from_local_datetime(&date.and_time(time)).earliest()?;
    Some(instant.with_timezone(&to).format("%H:%M").to_string())
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
