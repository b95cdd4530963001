use crate::error::{typed, ErrorType};
use crate::model::{Problems, Record, RecordId};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage slot of the refrigerator list.
pub const FRIDGE_ITEMS: &str = "fridgeItems";

/// The format of an expiry date, both typed and stored.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One item of food in the refrigerator.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    #[serde(default)]
    id: RecordId,
    name: String,
    expiry: NaiveDate,
}

impl FoodRecord {
    pub fn new(name: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            expiry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    fn parse(input: &FoodInput) -> Result<(String, NaiveDate)> {
        let mut problems = Problems::new(Self::NOUN);
        let name = problems.required("name", &input.name);
        let expiry = problems.parse("expiry", &input.expiry, |s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
        });
        problems.check()?;
        name.zip(expiry)
            .ok_or_else(|| typed(ErrorType::Validation, "Invalid food item"))
    }
}

impl Record for FoodRecord {
    const SLOT: &'static str = FRIDGE_ITEMS;
    const NOUN: &'static str = "food item";
    type Input = FoodInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(input: &FoodInput) -> Result<Self> {
        let (name, expiry) = Self::parse(input)?;
        Ok(Self::new(name, expiry))
    }

    fn revise(&self, input: &FoodInput) -> Result<Self> {
        let (name, expiry) = Self::parse(input)?;
        Ok(Self {
            id: self.id,
            name,
            expiry,
        })
    }

    fn to_input(&self) -> FoodInput {
        FoodInput {
            name: self.name.clone(),
            expiry: self.expiry.format(DATE_FORMAT).to_string(),
        }
    }
}

/// The raw, unvalidated field values of a food item. `expiry` is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FoodInput {
    pub name: String,
    pub expiry: String,
}

impl FoodInput {
    pub fn new(name: impl Into<String>, expiry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expiry: expiry.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;

    #[test]
    fn test_create() {
        let item = FoodRecord::create(&FoodInput::new("Milk", "2024-01-12")).unwrap();
        assert_eq!(item.name(), "Milk");
        assert_eq!(item.expiry(), NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    }

    #[test]
    fn test_create_bad_date() {
        let err = FoodRecord::create(&FoodInput::new("Milk", "12/01/2024")).unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Validation));
        assert!(err.to_string().contains("expiry '12/01/2024' is invalid"));
    }

    #[test]
    fn test_create_missing_fields() {
        let err = FoodRecord::create(&FoodInput::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"), "{msg}");
        assert!(msg.contains("expiry is required"), "{msg}");
    }

    #[test]
    fn test_stored_format() {
        let item: FoodRecord =
            serde_json::from_str(r#"{"name":"Eggs","expiry":"2024-02-01"}"#).unwrap();
        assert_eq!(item.to_input(), FoodInput::new("Eggs", "2024-02-01"));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"expiry\":\"2024-02-01\""));
    }
}
