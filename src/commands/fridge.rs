//! Refrigerator command handlers.

use crate::args::{FoodEditArgs, FoodFields, SelectArgs};
use crate::commands::{open, plural, Out};
use crate::model::{FoodInput, FoodRecord, Record, RecordId};
use crate::stats::{days_until_expiry, sorted_by_expiry, Freshness, FridgeStats};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One row of the fridge list as displayed.
#[derive(Debug, Clone, Serialize)]
pub struct FoodLine {
    /// Storage position, usable as the target of `edit` and `delete`.
    pub position: usize,
    pub id: RecordId,
    pub name: String,
    pub expiry: NaiveDate,
    pub days_until_expiry: i64,
    pub freshness: Freshness,
}

/// Adds a food item from the raw field values.
pub async fn fridge_add(config: Config, fields: FoodFields) -> Result<Out<FoodRecord>> {
    let mut store = open::<FoodRecord>(&config).await;
    let id = store.add(&FoodInput::new(fields.name, fields.expiry)).await?;
    let record = store
        .get(id)
        .cloned()
        .context("The added food item is missing from the list")?;
    let message = format!(
        "Added '{}' expiring {} ({id})",
        record.name(),
        record.expiry()
    );
    Ok(Out::new(message, record))
}

/// Lists the food items, soonest expiry first.
pub async fn fridge_list(config: Config) -> Result<Out<Vec<FoodLine>>> {
    let store = open::<FoodRecord>(&config).await;
    let lines = food_lines(store.records(), now(), config.warning_days());
    if lines.is_empty() {
        return Ok(Out::new("The refrigerator is empty.", lines));
    }
    let message = render_food_lines(&lines);
    Ok(Out::new(message, lines))
}

/// Changes the name and/or expiry of a food item, keeping its id and position.
pub async fn fridge_edit(config: Config, args: FoodEditArgs) -> Result<Out<FoodRecord>> {
    let mut store = open::<FoodRecord>(&config).await;
    let mut draft = store.begin_edit(args.target)?;
    if args.name.is_none() && args.expiry.is_none() {
        let record = store.get(draft.id()).cloned();
        store.cancel_edit(draft);
        let message = "Nothing to change";
        return Ok(match record {
            Some(record) => Out::new(message, record),
            None => Out::new_message(message),
        });
    }
    if let Some(name) = args.name {
        draft.input.name = name;
    }
    if let Some(expiry) = args.expiry {
        draft.input.expiry = expiry;
    }

    let id = store.commit_edit(draft).await?;
    let record = store
        .get(id)
        .cloned()
        .context("The edited food item is missing from the list")?;
    let message = format!("Updated '{}' expiring {} ({id})", record.name(), record.expiry());
    Ok(Out::new(message, record))
}

/// Deletes one food item.
pub async fn fridge_delete(config: Config, args: SelectArgs) -> Result<Out<FoodRecord>> {
    let mut store = open::<FoodRecord>(&config).await;
    let index = store.resolve(args.target)?;
    let removed = store.delete_at(index).await?;
    let message = format!(
        "Deleted '{}' ({}), {} left",
        removed.name(),
        removed.id(),
        plural(store.len(), "item")
    );
    Ok(Out::new(message, removed))
}

/// Counts the items per expiry bucket.
pub async fn fridge_stats(config: Config) -> Result<Out<FridgeStats>> {
    let store = open::<FoodRecord>(&config).await;
    let stats = FridgeStats::compute(store.records(), now(), config.warning_days());
    let message = if stats.is_empty() {
        "The refrigerator is empty.".to_string()
    } else {
        format!(
            "Total: {} | Fresh: {} | Expiring soon: {} | Expired: {}",
            stats.total, stats.fresh, stats.warning, stats.expired
        )
    };
    Ok(Out::new(message, stats))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn food_lines(records: &[FoodRecord], now: NaiveDateTime, warning_days: i64) -> Vec<FoodLine> {
    sorted_by_expiry(records)
        .into_iter()
        .filter_map(|record| {
            let position = records.iter().position(|r| r.id() == record.id())?;
            let days = days_until_expiry(record.expiry(), now);
            Some(FoodLine {
                position,
                id: record.id(),
                name: record.name().to_string(),
                expiry: record.expiry(),
                days_until_expiry: days,
                freshness: Freshness::from_days(days, warning_days),
            })
        })
        .collect()
}

fn render_food_lines(lines: &[FoodLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let when = match line.days_until_expiry {
                d if d < -1 => format!("expired {} days ago", -d),
                -1 => "expired yesterday".to_string(),
                0 => "expires today".to_string(),
                1 => "expires tomorrow".to_string(),
                d => format!("expires in {d} days"),
            };
            format!(
                "[{}] {} | {} ({when}) | {} | {}",
                line.position, line.name, line.expiry, line.freshness, line.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_type, ErrorType};
    use crate::store::Selector;
    use crate::test::TestEnv;
    use chrono::Duration;

    fn in_days(days: i64) -> String {
        (Local::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    #[tokio::test]
    async fn test_fridge_add() {
        let env = TestEnv::new().await;
        let fields = FoodFields {
            name: "Milk".to_string(),
            expiry: "2024-01-12".to_string(),
        };
        let out = fridge_add(env.config(), fields).await.unwrap();
        assert!(out.message().contains("Added 'Milk' expiring 2024-01-12"));
        assert_eq!(env.fridge().await.len(), 1);
    }

    #[tokio::test]
    async fn test_fridge_add_invalid_date() {
        let env = TestEnv::new().await;
        let fields = FoodFields {
            name: "Milk".to_string(),
            expiry: "tomorrow".to_string(),
        };
        let err = fridge_add(env.config(), fields).await.unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Validation));
        assert!(env.fridge().await.is_empty());
    }

    #[tokio::test]
    async fn test_fridge_list_and_stats() {
        let env = TestEnv::new().await;
        let (late, expired, soon) = (in_days(30), in_days(-2), in_days(1));
        env.insert_test_food(&[
            ("kimchi", late.as_str()),
            ("tofu", expired.as_str()),
            ("milk", soon.as_str()),
        ])
        .await;

        let out = fridge_list(env.config()).await.unwrap();
        let lines = out.structure().unwrap();
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["tofu", "milk", "kimchi"]);
        assert_eq!(lines[0].position, 1);
        assert_eq!(lines[0].freshness, Freshness::Expired);
        assert_eq!(lines[1].days_until_expiry, 1);
        assert_eq!(lines[1].freshness, Freshness::Warning);
        assert_eq!(lines[2].freshness, Freshness::Fresh);
        assert!(out.message().contains("expired 2 days ago"));
        assert!(out.message().contains("expires tomorrow"));

        let out = fridge_stats(env.config()).await.unwrap();
        assert_eq!(
            out.structure(),
            Some(&FridgeStats {
                total: 3,
                fresh: 1,
                warning: 1,
                expired: 1
            })
        );
        assert!(out.message().contains("Expiring soon: 1"));
    }

    #[tokio::test]
    async fn test_fridge_empty() {
        let env = TestEnv::new().await;
        assert_eq!(
            fridge_list(env.config()).await.unwrap().message(),
            "The refrigerator is empty."
        );
        assert_eq!(
            fridge_stats(env.config()).await.unwrap().message(),
            "The refrigerator is empty."
        );
    }

    #[tokio::test]
    async fn test_fridge_edit() {
        let env = TestEnv::new().await;
        env.insert_test_food(&[("milk", "2024-01-12"), ("eggs", "2024-01-20")])
            .await;
        let id = env.fridge().await.records()[1].id();
        let args = FoodEditArgs {
            target: Selector::Id(id),
            name: None,
            expiry: Some("2024-02-01".to_string()),
        };
        fridge_edit(env.config(), args).await.unwrap();

        let stored = env.fridge().await;
        assert_eq!(stored.position(id), Some(1));
        assert_eq!(
            stored.get(id).unwrap().expiry(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(stored.get(id).unwrap().name(), "eggs");
    }

    #[tokio::test]
    async fn test_fridge_delete() {
        let env = TestEnv::new().await;
        env.insert_test_food(&[("milk", "2024-01-12")]).await;
        let out = fridge_delete(env.config(), SelectArgs::new(Selector::Position(0)))
            .await
            .unwrap();
        assert!(out.message().contains("0 items left"));

        let err = fridge_delete(env.config(), SelectArgs::new(Selector::Position(0)))
            .await
            .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Index));
    }
}
