use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rand::Rng;

/// Random display color in `#rrggbb` form, assigned at creation.
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("#{value:06x}")
}

/// Completions are dated in UTC unless the client sends its own zone.
pub fn completion_date(tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Utc::now().date_naive(),
    }
}

pub(crate) fn is_unique_name_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505") && db.constraint() == Some("habits_name_unique")
        }
        _ => false,
    }
}

pub(crate) fn is_missing_habit_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23503"),
        _ => false,
    }
}

#[cfg(test)]
mod habit_services_tests {
    use super::*;

    #[test]
    fn random_color_is_a_padded_hex_triplet() {
        for _ in 0..100 {
            let color = random_color();
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn non_database_errors_are_not_conflicts() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_name_violation(&err));
        assert!(!is_missing_habit_violation(&err));
    }
}
