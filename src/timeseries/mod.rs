use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod view;

/// Day view keeps only the trailing window; week and month views show everything.
const DAY_VIEW_LIMIT: usize = 14;

/// Bucketing granularity selected by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        })
    }
}

/// How the records of one bucket collapse into its displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
}

/// A raw record that can be placed on the time axis of a graph.
pub trait SeriesPoint {
    fn series_date(&self) -> NaiveDate;
    fn series_value(&self) -> f64;
}

/// One aggregation unit of a graph. The contributing records are retained
/// in input order so a selected bucket can show its drill-down list without
/// another fetch.
#[derive(Debug, Clone)]
pub struct Bucket<R> {
    pub id: String,
    pub date: NaiveDate,
    pub value: f64,
    pub records: Vec<R>,
}

/// First day of the bucket containing `date`. Weeks start on Sunday.
pub fn bucket_start(mode: ViewMode, date: NaiveDate) -> NaiveDate {
    match mode {
        ViewMode::Day => date,
        ViewMode::Week => date - Duration::days(i64::from(date.weekday().num_days_from_sunday())),
        ViewMode::Month => date - Duration::days(i64::from(date.day0())),
    }
}

/// Groups records by bucket start and reduces each group to one value.
/// Buckets come back ascending by date with no duplicate keys; day mode is
/// truncated to the most recent [`DAY_VIEW_LIMIT`] buckets. Mean values are
/// rounded to two decimals, the precision used everywhere else.
pub fn bucket_records<R>(records: &[R], mode: ViewMode, aggregate: Aggregate) -> Vec<Bucket<R>>
where
    R: SeriesPoint + Clone,
{
    let mut groups: BTreeMap<NaiveDate, Vec<R>> = BTreeMap::new();
    for record in records {
        groups
            .entry(bucket_start(mode, record.series_date()))
            .or_default()
            .push(record.clone());
    }

    let mut buckets: Vec<Bucket<R>> = groups
        .into_iter()
        .map(|(date, records)| {
            let total: f64 = records.iter().map(SeriesPoint::series_value).sum();
            let value = match aggregate {
                Aggregate::Sum => total,
                Aggregate::Mean => round_2dp(total / records.len() as f64),
            };
            Bucket {
                id: format!("{mode}-{date}"),
                date,
                value,
                records,
            }
        })
        .collect();

    if mode == ViewMode::Day && buckets.len() > DAY_VIEW_LIMIT {
        buckets = buckets.split_off(buckets.len() - DAY_VIEW_LIMIT);
    }
    buckets
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod bucketing_tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        date: NaiveDate,
        value: f64,
    }

    impl SeriesPoint for Point {
        fn series_date(&self) -> NaiveDate {
            self.date
        }
        fn series_value(&self) -> f64 {
            self.value
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    fn p(date: &str, value: f64) -> Point {
        Point { date: d(date), value }
    }

    #[test]
    fn week_start_is_the_preceding_sunday() {
        // 2024-06-12 is a Wednesday.
        assert_eq!(bucket_start(ViewMode::Week, d("2024-06-12")), d("2024-06-09"));
        // A Sunday maps to itself.
        assert_eq!(bucket_start(ViewMode::Week, d("2024-06-09")), d("2024-06-09"));
        // A Saturday maps back six days.
        assert_eq!(bucket_start(ViewMode::Week, d("2024-06-15")), d("2024-06-09"));
    }

    #[test]
    fn month_start_is_the_first_of_the_month() {
        assert_eq!(bucket_start(ViewMode::Month, d("2024-06-12")), d("2024-06-01"));
        assert_eq!(bucket_start(ViewMode::Month, d("2024-06-30")), d("2024-06-01"));
        assert_eq!(bucket_start(ViewMode::Month, d("2024-06-01")), d("2024-06-01"));
    }

    #[test]
    fn day_start_is_the_date_itself() {
        assert_eq!(bucket_start(ViewMode::Day, d("2024-02-29")), d("2024-02-29"));
    }

    #[test]
    fn day_mode_keeps_the_most_recent_fourteen_dates() {
        let records: Vec<Point> = (1..=20)
            .map(|day| p(&format!("2024-06-{day:02}"), f64::from(day)))
            .collect();

        let buckets = bucket_records(&records, ViewMode::Day, Aggregate::Sum);

        assert_eq!(buckets.len(), 14);
        assert_eq!(buckets.first().map(|b| b.date), Some(d("2024-06-07")));
        assert_eq!(buckets.last().map(|b| b.date), Some(d("2024-06-20")));
    }

    #[test]
    fn day_mode_returns_everything_when_below_the_limit() {
        let records = vec![p("2024-06-01", 100.0), p("2024-06-03", 200.0)];
        let buckets = bucket_records(&records, ViewMode::Day, Aggregate::Sum);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn day_mode_sums_duplicate_same_day_records() {
        let records = vec![
            p("2024-06-01", 400.0),
            p("2024-06-01", 250.0),
            p("2024-06-02", 300.0),
        ];

        let buckets = bucket_records(&records, ViewMode::Day, Aggregate::Sum);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].value, 650.0);
        assert_eq!(buckets[0].records.len(), 2);
        assert_eq!(buckets[1].value, 300.0);
    }

    #[test]
    fn week_buckets_are_strictly_ascending_and_unique() {
        let records = vec![
            p("2024-06-15", 1.0),
            p("2024-06-12", 2.0),
            p("2024-06-03", 3.0),
            p("2024-06-20", 4.0),
            p("2024-06-09", 5.0),
        ];

        let buckets = bucket_records(&records, ViewMode::Week, Aggregate::Sum);

        let dates: Vec<NaiveDate> = buckets.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d("2024-06-02"), d("2024-06-09"), d("2024-06-16")]);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn month_buckets_are_strictly_ascending_and_unique() {
        let records = vec![
            p("2024-07-04", 1.0),
            p("2024-06-12", 2.0),
            p("2024-06-30", 3.0),
            p("2024-05-01", 4.0),
        ];

        let buckets = bucket_records(&records, ViewMode::Month, Aggregate::Sum);

        let dates: Vec<NaiveDate> = buckets.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d("2024-05-01"), d("2024-06-01"), d("2024-07-01")]);
    }

    #[test]
    fn sum_matches_the_drilldown_total() {
        let records = vec![
            p("2024-06-10", 520.0),
            p("2024-06-12", 640.0),
            p("2024-06-12", 330.0),
            p("2024-06-14", 815.0),
        ];

        for bucket in bucket_records(&records, ViewMode::Week, Aggregate::Sum) {
            let drilldown: f64 = bucket.records.iter().map(|r| r.value).sum();
            assert_eq!(bucket.value, drilldown);
        }
    }

    #[test]
    fn mean_matches_the_drilldown_mean_at_two_decimals() {
        // 7.0 + 8.0 + 8.5 = 23.5; mean 7.8333... rounds to 7.83.
        let records = vec![
            p("2024-06-10", 7.0),
            p("2024-06-11", 8.0),
            p("2024-06-12", 8.5),
        ];

        let buckets = bucket_records(&records, ViewMode::Week, Aggregate::Mean);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].value, 7.83);
        let raw_mean: f64 = buckets[0].records.iter().map(|r| r.value).sum::<f64>()
            / buckets[0].records.len() as f64;
        assert_eq!(buckets[0].value, (raw_mean * 100.0).round() / 100.0);
    }

    #[test]
    fn bucket_ids_embed_mode_and_start_date() {
        let records = vec![p("2024-06-12", 1.0)];

        let day = bucket_records(&records, ViewMode::Day, Aggregate::Sum);
        let week = bucket_records(&records, ViewMode::Week, Aggregate::Sum);
        let month = bucket_records(&records, ViewMode::Month, Aggregate::Sum);

        assert_eq!(day[0].id, "day-2024-06-12");
        assert_eq!(week[0].id, "week-2024-06-09");
        assert_eq!(month[0].id, "month-2024-06-01");
    }

    #[test]
    fn buckets_retain_records_in_input_order() {
        let records = vec![
            p("2024-06-10", 1.0),
            p("2024-06-11", 2.0),
            p("2024-06-12", 3.0),
        ];

        let buckets = bucket_records(&records, ViewMode::Week, Aggregate::Sum);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].records, records);
    }
}
