use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of the date of birth field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The fields of the registration form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    VoterId,
    Name,
    Email,
    DateOfBirth,
}

impl Field {
    /// All fields, in the order the form presents them.
    pub const ALL: [Field; 4] = [
        Field::VoterId,
        Field::Name,
        Field::Email,
        Field::DateOfBirth,
    ];

    /// Prompt shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::DateOfBirth => "Date of birth (YYYY-MM-DD)",
            _ => self.name(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::VoterId => "Voter ID",
            Field::Name => "Full name",
            Field::Email => "Email",
            Field::DateOfBirth => "Date of birth",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comma-separated field names, for error messages.
fn field_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons a registration can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields (missing: {})", field_list(.0))]
    MissingFields(Vec<Field>),
    #[error("Date of birth must be a calendar date (YYYY-MM-DD), got \"{0}\"")]
    InvalidDateOfBirth(String),
    #[error("You must be at least {minimum_age} years old to vote")]
    Underage { minimum_age: u32 },
}

/// Raw registration form input, exactly as the voter entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
}

impl RegistrationForm {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::VoterId => &self.voter_id,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::DateOfBirth => &self.date_of_birth,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::VoterId => &mut self.voter_id,
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::DateOfBirth => &mut self.date_of_birth,
        }
    }

    /// Validate the form as of `today`, producing a voter record.
    ///
    /// Whitespace-only fields count as missing. Missing fields are reported
    /// before any date problem.
    pub fn validate(
        &self,
        today: NaiveDate,
        minimum_age: u32,
    ) -> Result<VoterRecord, ValidationError> {
        let missing = Field::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let dob_text = self.date_of_birth.trim();
        let date_of_birth = NaiveDate::parse_from_str(dob_text, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDateOfBirth(dob_text.to_string()))?;

        if age_on(date_of_birth, today) < i64::from(minimum_age) {
            return Err(ValidationError::Underage { minimum_age });
        }

        Ok(VoterRecord {
            external_id: self.voter_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            date_of_birth,
        })
    }
}

/// Age in whole years on `today`, by calendar difference.
/// Negative if `date_of_birth` is in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year()) - i64::from(date_of_birth.year());
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// A registered voter, held by the session until it resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    /// The voter's own ID, as supplied on the form.
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}
