//! Fixed expense command handlers.

use crate::args::{ExpenseEditArgs, ExpenseFields, SelectArgs};
use crate::commands::{open, plural, Out};
use crate::model::{
    AddedAge, ExpenseInput, ExpenseRecord, PaymentDay, Record, RecordId, Won,
};
use crate::stats::{amount_class, sorted_by_amount_desc, AmountClass, ExpenseStats};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the expense list as displayed.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseLine {
    /// Storage position, usable as the target of `edit` and `delete`.
    pub position: usize,
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub amount: Won,
    pub payment_date: PaymentDay,
    pub added: AddedAge,
    pub class: AmountClass,
}

/// Adds an expense from the raw field values.
///
/// # Errors
///
/// - Returns a validation error if a field is missing or invalid.
/// - Returns a persistence error if the list cannot be saved.
pub async fn expense_add(config: Config, fields: ExpenseFields) -> Result<Out<ExpenseRecord>> {
    let mut store = open::<ExpenseRecord>(&config).await;
    let input = ExpenseInput::new(
        fields.name,
        fields.category,
        fields.amount,
        fields.payment_date,
    );
    let id = store.add(&input).await?;
    let record = store
        .get(id)
        .cloned()
        .context("The added expense is missing from the list")?;
    let message = format!(
        "Added expense '{}' of {} paid on day {} ({id})",
        record.name(),
        record.amount(),
        record.payment_date()
    );
    Ok(Out::new(message, record))
}

/// Lists the expenses, largest amount first.
pub async fn expense_list(config: Config) -> Result<Out<Vec<ExpenseLine>>> {
    let store = open::<ExpenseRecord>(&config).await;
    let lines = expense_lines(store.records(), config.high_amount_threshold(), Utc::now());
    if lines.is_empty() {
        return Ok(Out::new("No fixed expenses registered yet.", lines));
    }
    let message = render_expense_lines(&lines);
    Ok(Out::new(message, lines))
}

/// Changes the fields given in `args` and keeps the others.
///
/// The expense keeps its id, its position and its registration date.
pub async fn expense_edit(config: Config, args: ExpenseEditArgs) -> Result<Out<ExpenseRecord>> {
    let mut store = open::<ExpenseRecord>(&config).await;
    let mut draft = store.begin_edit(args.target)?;
    let before = draft.input.clone();
    if let Some(name) = args.name {
        draft.input.name = name;
    }
    if let Some(category) = args.category {
        draft.input.category = category;
    }
    if let Some(amount) = args.amount {
        draft.input.amount = amount;
    }
    if let Some(payment_date) = args.payment_date {
        draft.input.payment_date = payment_date;
    }

    if draft.input == before {
        let record = store.get(draft.id()).cloned();
        store.cancel_edit(draft);
        let message = "Nothing to change";
        return Ok(match record {
            Some(record) => Out::new(message, record),
            None => Out::new_message(message),
        });
    }

    let id = store.commit_edit(draft).await?;
    let record = store
        .get(id)
        .cloned()
        .context("The edited expense is missing from the list")?;
    let message = format!("Updated expense '{}' ({id})", record.name());
    Ok(Out::new(message, record))
}

/// Deletes one expense.
pub async fn expense_delete(config: Config, args: SelectArgs) -> Result<Out<ExpenseRecord>> {
    let mut store = open::<ExpenseRecord>(&config).await;
    let index = store.resolve(args.target)?;
    let removed = store.delete_at(index).await?;
    let message = format!(
        "Deleted expense '{}' ({}), {} left",
        removed.name(),
        removed.id(),
        plural(store.len(), "expense")
    );
    Ok(Out::new(message, removed))
}

/// Computes the expense statistics.
pub async fn expense_stats(config: Config) -> Result<Out<ExpenseStats>> {
    let store = open::<ExpenseRecord>(&config).await;
    let stats = ExpenseStats::compute(store.records(), config.high_amount_threshold());
    let message = render_expense_stats(&stats);
    Ok(Out::new(message, stats))
}

/// Builds the display rows: sorted by amount, each carrying its storage position and id.
fn expense_lines(
    records: &[ExpenseRecord],
    high_amount_threshold: u64,
    now: DateTime<Utc>,
) -> Vec<ExpenseLine> {
    sorted_by_amount_desc(records)
        .into_iter()
        .filter_map(|record| {
            let position = records.iter().position(|r| r.id() == record.id())?;
            Some(ExpenseLine {
                position,
                id: record.id(),
                name: record.name().to_string(),
                category: record.category().to_string(),
                amount: record.amount(),
                payment_date: record.payment_date(),
                added: AddedAge::between(record.date_added(), now),
                class: amount_class(record, high_amount_threshold),
            })
        })
        .collect()
}

fn render_expense_lines(lines: &[ExpenseLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let flag = match line.class {
                AmountClass::High => " [high]",
                AmountClass::Normal => "",
            };
            format!(
                "[{}] {} | {} • paid on day {} • {} | {}{flag} | {}",
                line.position,
                line.name,
                line.category,
                line.payment_date,
                line.added,
                line.amount,
                line.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_expense_stats(stats: &ExpenseStats) -> String {
    match stats {
        ExpenseStats::Empty => "No fixed expenses registered.".to_string(),
        ExpenseStats::Populated(s) => format!(
            "Monthly total: {}\nExpense items: {}\nHigh expenses: {}\nTop category: {}\n\
             Projected annual spending: {}",
            Won::format(s.total_amount),
            s.item_count,
            s.high_expense_count,
            s.category_most_frequent,
            Won::format(s.projected_annual)
        ),
    }
}
