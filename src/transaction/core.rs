//! Defines the core data models for transactions and the validation of
//! client supplied transaction fields.

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, database_id::TransactionId, user::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// An expense recorded by a user.
///
/// To create a new `Transaction`, use [Transaction::build] and hand the
/// builder to a [TransactionStore](super::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user: UserID,
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The spending category, e.g. "Food" or "Transport".
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// Optional free text notes.
    pub notes: Option<String>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, amount: f64, category: &str, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            date,
            notes: None,
        }
    }
}

/// The fields needed to create a [Transaction].
///
/// The store assigns the ID, owner and bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// A short description of what the money was spent on, never empty.
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The spending category, never empty.
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// Optional free text notes.
    pub notes: Option<String>,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }
}

/// A partial update to a [Transaction].
///
/// Fields set to `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// The new title.
    pub title: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new date.
    pub date: Option<Date>,
    /// The new notes, `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl TransactionChanges {
    /// Whether the changes would leave a transaction untouched.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }
}

// ============================================================================
// CLIENT INPUT
// ============================================================================

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// A string that should contain a number, e.g. the value of a form input.
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Option<f64> {
        match self {
            AmountInput::Number(number) => Some(*number).filter(|number| number.is_finite()),
            AmountInput::Text(text) => parse_amount(text),
        }
    }
}

/// The transaction fields sent by a client when creating or updating a
/// transaction.
///
/// Every field is optional on the wire. Creating a transaction requires a
/// title, amount and category, see [TransactionForm::into_builder].
/// Updating only changes the fields that are present, see
/// [TransactionForm::into_changes].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionForm {
    /// A short description of what the money was spent on.
    pub title: Option<String>,
    /// The amount of money spent.
    pub amount: Option<AmountInput>,
    /// The spending category.
    pub category: Option<String>,
    /// The date as `YYYY-MM-DD` or an RFC 3339 date-time.
    pub date: Option<String>,
    /// Optional free text notes.
    pub notes: Option<String>,
}

const MISSING_REQUIRED_FIELDS: &str = "Please add title, amount and category";

impl TransactionForm {
    /// Validate the form as a new transaction.
    ///
    /// A missing date defaults to `today`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the title, amount or category is missing
    /// or blank, or if the amount or date cannot be parsed.
    pub fn into_builder(self, today: Date) -> Result<TransactionBuilder, Error> {
        let title = non_blank(self.title.as_deref());
        let category = non_blank(self.category.as_deref());

        let (Some(title), Some(amount), Some(category)) = (title, self.amount, category) else {
            return Err(Error::Validation(MISSING_REQUIRED_FIELDS.to_owned()));
        };

        let amount = validate_amount(&amount)?;
        let date = match self.date.as_deref() {
            Some(date) if !date.trim().is_empty() => validate_date(date)?,
            _ => today,
        };

        Ok(TransactionBuilder {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            date,
            notes: non_blank(self.notes.as_deref()).map(str::to_owned),
        })
    }

    /// Validate the form as a partial update.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a present title or category is blank,
    /// or if a present amount or date cannot be parsed.
    pub fn into_changes(self) -> Result<TransactionChanges, Error> {
        let title = self
            .title
            .as_deref()
            .map(|title| non_blank(Some(title)).ok_or_else(|| empty_field("Title")))
            .transpose()?
            .map(str::to_owned);

        let category = self
            .category
            .as_deref()
            .map(|category| non_blank(Some(category)).ok_or_else(|| empty_field("Category")))
            .transpose()?
            .map(str::to_owned);

        let amount = self.amount.as_ref().map(validate_amount).transpose()?;
        let date = self.date.as_deref().map(validate_date).transpose()?;
        let notes = self
            .notes
            .as_deref()
            .map(|notes| non_blank(Some(notes)).map(str::to_owned));

        Ok(TransactionChanges {
            title,
            amount,
            category,
            date,
            notes,
        })
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

fn empty_field(name: &str) -> Error {
    Error::Validation(format!("{name} cannot be empty"))
}

fn validate_amount(amount: &AmountInput) -> Result<f64, Error> {
    amount
        .parse()
        .ok_or_else(|| Error::Validation("Amount must be a number".to_owned()))
}

fn validate_date(date: &str) -> Result<Date, Error> {
    parse_date(date).ok_or_else(|| Error::Validation(format!("Invalid date \"{date}\"")))
}

// ============================================================================
// PARSING
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 date-time.
///
/// For date-times, the date in the date-time's own offset is used.
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT).ok().or_else(|| {
        OffsetDateTime::parse(text, &Rfc3339)
            .ok()
            .map(|date_time| date_time.date())
    })
}

/// Parse a finite number, ignoring surrounding whitespace.
pub(crate) fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::core::{
            AmountInput, TransactionChanges, TransactionForm, parse_amount, parse_date,
        },
    };

    const TODAY: time::Date = date!(2024 - 03 - 01);

    fn coffee_form() -> TransactionForm {
        TransactionForm {
            title: Some("Coffee".to_owned()),
            amount: Some(AmountInput::Number(4.5)),
            category: Some("Food".to_owned()),
            date: Some("2024-01-10".to_owned()),
            notes: None,
        }
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("2024-01-10"), Some(date!(2024 - 01 - 10)));
        assert_eq!(parse_date(" 2024-01-10 "), Some(date!(2024 - 01 - 10)));
    }

    #[test]
    fn parses_date_times_as_dates() {
        assert_eq!(
            parse_date("2024-01-10T23:30:00+13:00"),
            Some(date!(2024 - 01 - 10))
        );
        assert_eq!(
            parse_date("2024-01-10T08:00:00Z"),
            Some(date!(2024 - 01 - 10))
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        for text in ["", "yesterday", "2024-13-01", "2024-02-30", "10/01/2024"] {
            assert_eq!(parse_date(text), None, "want None for {text:?}");
        }
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount("15"), Some(15.0));
        assert_eq!(parse_amount(" -2.5 "), Some(-2.5));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn builder_from_complete_form() {
        let builder = coffee_form().into_builder(TODAY).unwrap();

        assert_eq!(builder.title, "Coffee");
        assert_eq!(builder.amount, 4.5);
        assert_eq!(builder.category, "Food");
        assert_eq!(builder.date, date!(2024 - 01 - 10));
        assert_eq!(builder.notes, None);
    }

    #[test]
    fn builder_defaults_date_to_today() {
        let form = TransactionForm {
            date: None,
            ..coffee_form()
        };

        let builder = form.into_builder(TODAY).unwrap();

        assert_eq!(builder.date, TODAY);
    }

    #[test]
    fn builder_accepts_numeric_string_amount() {
        let form = TransactionForm {
            amount: Some(AmountInput::Text("12.75".to_owned())),
            ..coffee_form()
        };

        let builder = form.into_builder(TODAY).unwrap();

        assert_eq!(builder.amount, 12.75);
    }

    #[test]
    fn builder_accepts_zero_and_negative_amounts() {
        for amount in [0.0, -3.0] {
            let form = TransactionForm {
                amount: Some(AmountInput::Number(amount)),
                ..coffee_form()
            };

            let builder = form.into_builder(TODAY).unwrap();

            assert_eq!(builder.amount, amount);
        }
    }

    #[test]
    fn builder_rejects_missing_required_fields() {
        let cases = [
            TransactionForm {
                title: None,
                ..coffee_form()
            },
            TransactionForm {
                title: Some("   ".to_owned()),
                ..coffee_form()
            },
            TransactionForm {
                amount: None,
                ..coffee_form()
            },
            TransactionForm {
                category: Some(String::new()),
                ..coffee_form()
            },
        ];

        for form in cases {
            let description = format!("{form:?}");
            let result = form.into_builder(TODAY);

            assert!(
                matches!(result, Err(Error::Validation(_))),
                "want validation error for {description}, got {result:?}"
            );
        }
    }

    #[test]
    fn builder_rejects_non_numeric_amount() {
        let form = TransactionForm {
            amount: Some(AmountInput::Text("a lot".to_owned())),
            ..coffee_form()
        };

        assert_eq!(
            form.into_builder(TODAY),
            Err(Error::Validation("Amount must be a number".to_owned()))
        );
    }

    #[test]
    fn builder_rejects_invalid_date() {
        let form = TransactionForm {
            date: Some("not a date".to_owned()),
            ..coffee_form()
        };

        assert!(matches!(
            form.into_builder(TODAY),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn builder_trims_text_and_drops_blank_notes() {
        let form = TransactionForm {
            title: Some("  Coffee  ".to_owned()),
            notes: Some("   ".to_owned()),
            ..coffee_form()
        };

        let builder = form.into_builder(TODAY).unwrap();

        assert_eq!(builder.title, "Coffee");
        assert_eq!(builder.notes, None);
    }

    #[test]
    fn empty_form_is_empty_changes() {
        let changes = TransactionForm::default().into_changes().unwrap();

        assert_eq!(changes, TransactionChanges::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn changes_only_contain_present_fields() {
        let form = TransactionForm {
            amount: Some(AmountInput::Number(20.0)),
            notes: Some(String::new()),
            ..Default::default()
        };

        let changes = form.into_changes().unwrap();

        assert_eq!(
            changes,
            TransactionChanges {
                amount: Some(20.0),
                notes: Some(None),
                ..Default::default()
            }
        );
    }

    #[test]
    fn changes_reject_blank_required_fields() {
        let blank_title = TransactionForm {
            title: Some(" ".to_owned()),
            ..Default::default()
        };
        let blank_category = TransactionForm {
            category: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(
            blank_title.into_changes(),
            Err(Error::Validation("Title cannot be empty".to_owned()))
        );
        assert_eq!(
            blank_category.into_changes(),
            Err(Error::Validation("Category cannot be empty".to_owned()))
        );
    }

    #[test]
    fn deserializes_amount_as_number_or_string() {
        let number: TransactionForm = serde_json::from_str(r#"{"amount": 4.5}"#).unwrap();
        let text: TransactionForm = serde_json::from_str(r#"{"amount": "4.5"}"#).unwrap();

        assert_eq!(number.amount, Some(AmountInput::Number(4.5)));
        assert_eq!(text.amount, Some(AmountInput::Text("4.5".to_owned())));
    }
}
