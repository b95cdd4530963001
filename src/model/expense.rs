use crate::error::{typed, ErrorType};
use crate::model::{Problems, Record, RecordId, Won};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage slot of the fixed monthly expenses list.
pub const FIXED_EXPENSES: &str = "fixedExpenses";

/// One fixed monthly expense, such as rent or a phone plan.
///
/// Serialized with camelCase field names:
/// ```json
/// {
///   "id": "0b6f1f4c-3c59-4d35-9d55-8a1d8f0c2a71",
///   "name": "Rent",
///   "category": "housing",
///   "amount": 600000,
///   "paymentDate": 25,
///   "dateAdded": "2024-01-10T09:30:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default)]
    id: RecordId,
    name: String,
    category: String,
    amount: Won,
    payment_date: PaymentDay,
    date_added: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Won,
        payment_date: PaymentDay,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            category: category.into(),
            amount,
            payment_date,
            date_added,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Won {
        self.amount
    }

    pub fn payment_date(&self) -> PaymentDay {
        self.payment_date
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    /// Validates the input fields.
    fn parse(input: &ExpenseInput) -> Result<(String, String, Won, PaymentDay)> {
        let mut problems = Problems::new(Self::NOUN);
        let name = problems.required("name", &input.name);
        let category = problems.required("category", &input.category);
        let amount = problems.parse("amount", &input.amount, Won::from_str);
        let payment_date = problems.parse("payment date", &input.payment_date, PaymentDay::from_str);
        problems.check()?;
        match (name, category, amount, payment_date) {
            (Some(name), Some(category), Some(amount), Some(payment_date)) => {
                Ok((name, category, amount, payment_date))
            }
            _ => Err(typed(ErrorType::Validation, "Invalid expense")),
        }
    }
}

impl Record for ExpenseRecord {
    const SLOT: &'static str = FIXED_EXPENSES;
    const NOUN: &'static str = "expense";
    type Input = ExpenseInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(input: &ExpenseInput) -> Result<Self> {
        let (name, category, amount, payment_date) = Self::parse(input)?;
        Ok(Self::new(name, category, amount, payment_date, Utc::now()))
    }

    fn revise(&self, input: &ExpenseInput) -> Result<Self> {
        let (name, category, amount, payment_date) = Self::parse(input)?;
        Ok(Self {
            id: self.id,
            name,
            category,
            amount,
            payment_date,
            date_added: self.date_added,
        })
    }

    fn to_input(&self) -> ExpenseInput {
        ExpenseInput {
            name: self.name.clone(),
            category: self.category.clone(),
            amount: self.amount.value().to_string(),
            payment_date: self.payment_date.to_string(),
        }
    }
}

/// The raw, unvalidated field values of an expense as typed by the user.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub name: String,
    pub category: String,
    pub amount: String,
    pub payment_date: String,
}

impl ExpenseInput {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        payment_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount: amount.into(),
            payment_date: payment_date.into(),
        }
    }
}

/// The day of the month on which an expense is billed, 1 through 31.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PaymentDay(u8);

impl PaymentDay {
    pub fn new(day: u8) -> Result<Self> {
        PaymentDay::try_from(day)
            .map_err(|e| typed(ErrorType::Validation, format!("payment day {e}")))
    }

    pub fn day(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PaymentDay {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if !(1..=31).contains(&value) {
            return Err(format!("must be between 1 and 31, got {value}"));
        }
        Ok(Self(value))
    }
}

impl From<PaymentDay> for u8 {
    fn from(day: PaymentDay) -> Self {
        day.0
    }
}

impl FromStr for PaymentDay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('일').unwrap_or(trimmed).trim_end();
        let day = digits
            .parse::<u8>()
            .map_err(|_| "must be a day of the month between 1 and 31".to_string())?;
        PaymentDay::try_from(day)
    }
}

impl Display for PaymentDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
