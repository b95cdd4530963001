use crate::model::ExpenseRecord;
use serde::{Deserialize, Serialize};

/// Expenses of at least this many won count as high.
pub const HIGH_AMOUNT_THRESHOLD: u64 = 50_000;

/// Statistics of the fixed expense list.
///
/// An empty list has no figures at all, which is distinct from a list whose figures are zero.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExpenseStats {
    Empty,
    Populated(ExpenseSummary),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Sum of every amount, per month. Saturates at `u64::MAX`.
    pub total_amount: u64,
    pub item_count: usize,
    /// Number of expenses at or above the high amount threshold.
    pub high_expense_count: usize,
    /// The category used by the most expenses. Ties go to the category seen first in storage
    /// order.
    pub category_most_frequent: String,
    /// `total_amount` over twelve months.
    pub projected_annual: u64,
}

impl ExpenseStats {
    pub fn compute(records: &[ExpenseRecord], high_amount_threshold: u64) -> Self {
        let category_most_frequent = match most_frequent_category(records) {
            Some(category) => category.to_string(),
            None => return ExpenseStats::Empty,
        };
        let total_amount = records
            .iter()
            .map(|r| r.amount().value())
            .fold(0u64, u64::saturating_add);
        let high_expense_count = records
            .iter()
            .filter(|r| amount_class(r, high_amount_threshold) == AmountClass::High)
            .count();
        ExpenseStats::Populated(ExpenseSummary {
            total_amount,
            item_count: records.len(),
            high_expense_count,
            category_most_frequent,
            projected_annual: total_amount.saturating_mul(12),
        })
    }

    pub fn summary(&self) -> Option<&ExpenseSummary> {
        match self {
            ExpenseStats::Empty => None,
            ExpenseStats::Populated(summary) => Some(summary),
        }
    }
}

/// Whether an expense is a high one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountClass {
    High,
    Normal,
}

serde_plain::derive_display_from_serialize!(AmountClass);

pub fn amount_class(record: &ExpenseRecord, high_amount_threshold: u64) -> AmountClass {
    if record.amount().value() >= high_amount_threshold {
        AmountClass::High
    } else {
        AmountClass::Normal
    }
}

/// The display order of the expense list: largest amount first. Storage order is not changed.
pub fn sorted_by_amount_desc(records: &[ExpenseRecord]) -> Vec<&ExpenseRecord> {
    let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.amount().cmp(&a.amount()));
    sorted
}

fn most_frequent_category(records: &[ExpenseRecord]) -> Option<&str> {
    // (category, count) in order of first appearance
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(c, _)| *c == record.category()) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.category(), 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (category, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((category, n)),
        })
        .map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentDay, Won};
    use chrono::Utc;

    fn expense(name: &str, category: &str, amount: u64) -> ExpenseRecord {
        ExpenseRecord::new(
            name,
            category,
            Won::new(amount).unwrap(),
            PaymentDay::new(1).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_example_figures() {
        let records = vec![
            expense("a", "rent", 60000),
            expense("b", "utility", 30000),
            expense("c", "rent", 20000),
        ];
        let stats = ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD);
        let summary = stats.summary().unwrap();
        assert_eq!(summary.total_amount, 110000);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.high_expense_count, 1);
        assert_eq!(summary.category_most_frequent, "rent");
        assert_eq!(summary.projected_annual, 1_320_000);
    }

    #[test]
    fn test_empty() {
        let stats = ExpenseStats::compute(&[], HIGH_AMOUNT_THRESHOLD);
        assert_eq!(stats, ExpenseStats::Empty);
        assert!(stats.summary().is_none());
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"state":"empty"}"#);
    }

    #[test]
    fn test_tie_goes_to_first_in_storage_order() {
        let records = vec![
            expense("a", "utility", 10000),
            expense("b", "rent", 10000),
            expense("c", "rent", 10000),
            expense("d", "utility", 10000),
        ];
        let summary = ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD)
            .summary()
            .cloned()
            .unwrap();
        assert_eq!(summary.category_most_frequent, "utility");
    }

    #[test]
    fn test_later_category_with_more_wins() {
        let records = vec![
            expense("a", "insurance", 10000),
            expense("b", "telecom", 10000),
            expense("c", "telecom", 10000),
        ];
        let stats = ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD);
        assert_eq!(stats.summary().unwrap().category_most_frequent, "telecom");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(amount_class(&expense("a", "x", 50000), 50000), AmountClass::High);
        assert_eq!(amount_class(&expense("a", "x", 49999), 50000), AmountClass::Normal);
    }

    #[test]
    fn test_compute_is_pure() {
        let records = vec![expense("a", "rent", 60000), expense("b", "utility", 30000)];
        assert_eq!(
            ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD),
            ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD)
        );
    }

    #[test]
    fn test_sorted_by_amount_desc() {
        let records = vec![
            expense("small", "x", 20000),
            expense("big", "x", 60000),
            expense("mid", "x", 30000),
        ];
        let sorted: Vec<&str> = sorted_by_amount_desc(&records)
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(sorted, vec!["big", "mid", "small"]);
        // storage order untouched
        assert_eq!(records[0].name(), "small");
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let records = vec![
            expense("Tuition", "education", 10_000_000_000_000_000_000),
            expense("Mortgage", "housing", 10_000_000_000_000_000_000),
        ];
        let stats = ExpenseStats::compute(&records, HIGH_AMOUNT_THRESHOLD);
        let summary = stats.summary().unwrap();
        assert_eq!(summary.total_amount, u64::MAX);
        assert_eq!(summary.projected_annual, u64::MAX);
        assert_eq!(summary.high_expense_count, 2);
    }
}
