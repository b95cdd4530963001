use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// How long ago an expense was registered, in the coarse buckets shown next to each expense.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddedAge {
    Today,
    Yesterday,
    /// Between 2 and 6 whole days.
    DaysAgo(i64),
    /// Between 7 and 29 whole days, counted in whole weeks.
    WeeksAgo(i64),
    /// Thirty days or more: shown as the registration month and day.
    On { month: u32, day: u32 },
}

impl AddedAge {
    /// Classifies the whole days (floored) elapsed between `added` and `now`. A registration
    /// timestamp in the future counts as today.
    pub fn between(added: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - added).num_milliseconds().div_euclid(MILLIS_PER_DAY);
        match days {
            i64::MIN..=0 => AddedAge::Today,
            1 => AddedAge::Yesterday,
            2..=6 => AddedAge::DaysAgo(days),
            7..=29 => AddedAge::WeeksAgo(days / 7),
            _ => {
                let local = added.with_timezone(&Local);
                AddedAge::On {
                    month: local.month(),
                    day: local.day(),
                }
            }
        }
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

impl Display for AddedAge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AddedAge::Today => f.write_str("added today"),
            AddedAge::Yesterday => f.write_str("added yesterday"),
            AddedAge::DaysAgo(n) => write!(f, "added {n} days ago"),
            AddedAge::WeeksAgo(1) => f.write_str("added 1 week ago"),
            AddedAge::WeeksAgo(n) => write!(f, "added {n} weeks ago"),
            AddedAge::On { month, day } => write!(f, "added {month:02}.{day:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        assert_eq!(AddedAge::between(now() - Duration::hours(23), now()), AddedAge::Today);
        assert_eq!(AddedAge::between(now() - Duration::hours(25), now()), AddedAge::Yesterday);
        assert_eq!(AddedAge::between(now() + Duration::hours(2), now()), AddedAge::Today);
    }

    #[test]
    fn test_days_and_weeks() {
        assert_eq!(AddedAge::between(now() - Duration::days(6), now()), AddedAge::DaysAgo(6));
        assert_eq!(AddedAge::between(now() - Duration::days(7), now()), AddedAge::WeeksAgo(1));
        assert_eq!(AddedAge::between(now() - Duration::days(29), now()), AddedAge::WeeksAgo(4));
    }

    #[test]
    fn test_older_shows_date() {
        let added = now() - Duration::days(45);
        match AddedAge::between(added, now()) {
            AddedAge::On { month, day } => {
                let local = added.with_timezone(&Local);
                assert_eq!((month, day), (local.month(), local.day()));
            }
            other => panic!("expected a date, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(AddedAge::DaysAgo(3).to_string(), "added 3 days ago");
        assert_eq!(AddedAge::WeeksAgo(2).to_string(), "added 2 weeks ago");
        assert_eq!(AddedAge::On { month: 1, day: 5 }.to_string(), "added 01.05");
    }
}
