//! Student profile records and intake validation.

mod book;
mod validation;

pub use book::ProfileBook;
pub use validation::validate_email;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Maximum length of `fullName`, in characters.
pub const MAX_FULL_NAME_LEN: usize = 100;
/// Maximum length of `address`, in characters.
pub const MAX_ADDRESS_LEN: usize = 300;
/// Maximum length of `educationBackground`, in characters.
pub const MAX_EDUCATION_LEN: usize = 200;

/// A stored student profile.
///
/// Caller-supplied fields hold exactly what was submitted. `dateOfBirth` is
/// either `YYYY-MM-DD` or an ISO 8601 date-time starting with that date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub address: String,
    pub education_background: String,
    pub created_at: DateTime<Utc>,
}

/// Profile submission as received.
///
/// Fields are raw JSON values so that missing fields, wrong types and
/// malformed strings are all reported per field in one response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentProfile {
    pub full_name: Option<Value>,
    pub email: Option<Value>,
    pub date_of_birth: Option<Value>,
    pub address: Option<Value>,
    pub education_background: Option<Value>,
}

/// A submission that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub full_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub address: String,
    pub education_background: String,
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl NewStudentProfile {
    /// Validate every field, collecting all failures.
    ///
    /// `today` bounds the date of birth. Accepted values are kept verbatim.
    pub fn validate(self, today: NaiveDate) -> Result<ValidProfile, FieldErrors> {
        let mut errors = FieldErrors::default();

        let full_name = bounded_text(&mut errors, "fullName", self.full_name, MAX_FULL_NAME_LEN);
        let address = bounded_text(&mut errors, "address", self.address, MAX_ADDRESS_LEN);
        let education_background = bounded_text(
            &mut errors,
            "educationBackground",
            self.education_background,
            MAX_EDUCATION_LEN,
        );

        let email = required_text(&mut errors, "email", self.email).and_then(|email| {
            match validate_email(&email) {
                Ok(()) => Some(email),
                Err(reason) => {
                    errors.add(
                        "email",
                        format!("The email field is not a valid e-mail address: {reason}."),
                    );
                    None
                }
            }
        });

        let date_of_birth =
            required_text(&mut errors, "dateOfBirth", self.date_of_birth).and_then(|raw| {
                match parse_date_of_birth(&raw) {
                    Some(date) if date > today => {
                        errors.add("dateOfBirth", "The dateOfBirth field cannot be in the future.");
                        None
                    }
                    Some(_) => Some(raw),
                    None => {
                        errors.add(
                            "dateOfBirth",
                            "The dateOfBirth field must be a date in YYYY-MM-DD format \
                             or an ISO 8601 date-time.",
                        );
                        None
                    }
                }
            });

        match (full_name, email, date_of_birth, address, education_background) {
            (
                Some(full_name),
                Some(email),
                Some(date_of_birth),
                Some(address),
                Some(education_background),
            ) => Ok(ValidProfile {
                full_name,
                email,
                date_of_birth,
                address,
                education_background,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a date of birth, returning the calendar date it names.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 date-time with offset, or a local
/// date-time (`YYYY-MM-DDTHH:MM:SS[.fff]`). The date part must be written in
/// canonical form, so `2005-6-5` and padded values are rejected.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })?;

    let canonical = date.format("%Y-%m-%d").to_string();
    (raw.get(..10) == Some(canonical.as_str())).then_some(date)
}

/// Extract a required string field, recording missing and wrongly typed
/// values. Blank strings count as missing.
fn required_text(errors: &mut FieldErrors, field: &str, value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.add(field, format!("The {field} field must be a string."));
            None
        }
    }
}

fn bounded_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Value>,
    max_len: usize,
) -> Option<String> {
    let text = required_text(errors, field, value)?;
    if text.chars().count() > max_len {
        errors.add(
            field,
            format!("The {field} field must be at most {max_len} characters."),
        );
        return None;
    }
    Some(text)
}
