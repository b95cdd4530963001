use crate::model::FoodRecord;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Items expiring within this many days (inclusive) are flagged.
pub const WARNING_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Days from `now` until the start (midnight) of `expiry`, rounded up.
///
/// `now` carries a time of day and `expiry` does not, so the partial day left is counted as a whole
/// one: an item expiring tomorrow reads 1 all day today and an item expiring today reads 0.
pub fn days_until_expiry(expiry: NaiveDate, now: NaiveDateTime) -> i64 {
    let millis = (expiry.and_time(NaiveTime::MIN) - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// The expiry bucket of a food item.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Warning,
    Expired,
}

serde_plain::derive_display_from_serialize!(Freshness);

impl Freshness {
    pub fn from_days(days: i64, warning_days: i64) -> Self {
        if days < 0 {
            Freshness::Expired
        } else if days <= warning_days {
            Freshness::Warning
        } else {
            Freshness::Fresh
        }
    }

    pub fn of(record: &FoodRecord, now: NaiveDateTime, warning_days: i64) -> Self {
        Self::from_days(days_until_expiry(record.expiry(), now), warning_days)
    }
}

/// Counts of the fridge list per bucket.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FridgeStats {
    pub total: usize,
    pub fresh: usize,
    pub warning: usize,
    pub expired: usize,
}

impl FridgeStats {
    pub fn compute(records: &[FoodRecord], now: NaiveDateTime, warning_days: i64) -> Self {
        records
            .iter()
            .fold(FridgeStats::default(), |mut stats, record| {
                stats.total += 1;
                match Freshness::of(record, now, warning_days) {
                    Freshness::Fresh => stats.fresh += 1,
                    Freshness::Warning => stats.warning += 1,
                    Freshness::Expired => stats.expired += 1,
                }
                stats
            })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// The display order of the fridge list: soonest expiry first. Storage order is not changed.
pub fn sorted_by_expiry(records: &[FoodRecord]) -> Vec<&FoodRecord> {
    let mut sorted: Vec<&FoodRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.expiry());
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_examples() {
        let now = at(2024, 1, 10, 0);
        assert_eq!(days_until_expiry(date(2024, 1, 12), now), 2);
        assert_eq!(Freshness::from_days(2, WARNING_DAYS), Freshness::Warning);
        assert_eq!(days_until_expiry(date(2024, 1, 5), now), -5);
        assert_eq!(Freshness::from_days(-5, WARNING_DAYS), Freshness::Expired);
    }

    #[test]
    fn test_rounds_up_during_the_day() {
        let afternoon = at(2024, 1, 10, 15);
        assert_eq!(days_until_expiry(date(2024, 1, 12), afternoon), 2);
        assert_eq!(days_until_expiry(date(2024, 1, 11), afternoon), 1);
        // expiring today reads 0 once the day has started
        assert_eq!(days_until_expiry(date(2024, 1, 10), afternoon), 0);
        assert_eq!(days_until_expiry(date(2024, 1, 9), afternoon), -1);
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(Freshness::from_days(0, 3), Freshness::Warning);
        assert_eq!(Freshness::from_days(3, 3), Freshness::Warning);
        assert_eq!(Freshness::from_days(4, 3), Freshness::Fresh);
        assert_eq!(Freshness::from_days(-1, 3), Freshness::Expired);
    }

    #[test]
    fn test_counts() {
        let now = at(2024, 1, 10, 9);
        let records = vec![
            FoodRecord::new("milk", date(2024, 1, 12)),
            FoodRecord::new("tofu", date(2024, 1, 5)),
            FoodRecord::new("kimchi", date(2024, 3, 1)),
            FoodRecord::new("eggs", date(2024, 1, 10)),
        ];
        let stats = FridgeStats::compute(&records, now, WARNING_DAYS);
        assert_eq!(
            stats,
            FridgeStats {
                total: 4,
                fresh: 1,
                warning: 2,
                expired: 1
            }
        );
        assert_eq!(stats, FridgeStats::compute(&records, now, WARNING_DAYS));
    }

    #[test]
    fn test_empty() {
        let stats = FridgeStats::compute(&[], at(2024, 1, 10, 0), WARNING_DAYS);
        assert!(stats.is_empty());
        assert_eq!(stats, FridgeStats::default());
    }

    #[test]
    fn test_sorted_by_expiry() {
        let records = vec![
            FoodRecord::new("late", date(2024, 5, 1)),
            FoodRecord::new("soon", date(2024, 1, 1)),
        ];
        let sorted: Vec<&str> = sorted_by_expiry(&records).iter().map(|r| r.name()).collect();
        assert_eq!(sorted, vec!["soon", "late"]);
    }
}
