//! Bill reminders and their due-date buckets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Bills due within this many days from today raise an "upcoming" alert.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub due_date: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillStatus {
    Overdue { days: i64 },
    DueToday,
    Upcoming { days: i64 },
}

impl Bill {
    /// Returns the alert bucket of this bill on `today`, `None` when it is
    /// further away than [`UPCOMING_WINDOW_DAYS`].
    pub fn status(&self, today: NaiveDate) -> Option<BillStatus> {
        classify(self.due_date, today)
    }
}

pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Option<BillStatus> {
    let delta = (due_date - today).num_days();
    match delta {
        d if d < 0 => Some(BillStatus::Overdue { days: -d }),
        0 => Some(BillStatus::DueToday),
        d if d <= UPCOMING_WINDOW_DAYS => Some(BillStatus::Upcoming { days: d }),
        _ => None,
    }
}

/// Parses the calendar date of a backend due date.
///
/// Only the `YYYY-MM-DD` prefix is read, so `2026-02-05T00:00:00.000Z` is the
/// 5th of February whatever the local offset is.
pub fn parse_due_date(raw: &str) -> ResultEngine<NaiveDate> {
    let date = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| EngineError::InvalidDate(format!("{raw}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 5).unwrap()
    }

    #[test]
    fn due_today_is_never_overdue_or_upcoming() {
        assert_eq!(classify(today(), today()), Some(BillStatus::DueToday));
    }

    #[test]
    fn yesterday_is_one_day_overdue() {
        let due = today() - Duration::days(1);
        assert_eq!(classify(due, today()), Some(BillStatus::Overdue { days: 1 }));
    }

    #[test]
    fn upcoming_window_is_inclusive() {
        let due = today() + Duration::days(7);
        assert_eq!(classify(due, today()), Some(BillStatus::Upcoming { days: 7 }));
        assert_eq!(classify(today() + Duration::days(8), today()), None);
    }

    #[test]
    fn parse_ignores_time_of_day() {
        assert_eq!(parse_due_date("2026-02-05T23:30:00.000Z").unwrap(), today());
        assert_eq!(parse_due_date("2026-02-05").unwrap(), today());
        assert!(matches!(
            parse_due_date("05/02/2026"),
            Err(EngineError::InvalidDate(_))
        ));
    }
}
