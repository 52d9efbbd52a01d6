use thiserror::Error;

use crate::form::FieldKind;

/// Structural misuse of a [`FormState`](crate::form::FormState).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("No field with id {0} in this form")]
    UnknownField(i64),

    #[error("No field named '{0}' in this form")]
    UnknownFieldName(String),

    #[error("Field '{field}' is a {expected} field, cannot hold a {got} value")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        got: &'static str,
    },
}

/// One problem found while checking a form at submit time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    #[error("'{field}' is required")]
    Missing { field: String },

    #[error("'{field}' has no option '{value}'")]
    InvalidOption { field: String, value: String },

    #[error("'{field}' must be a date (YYYY-MM-DD), got '{value}'")]
    InvalidDate { field: String, value: String },

    #[error("'{field}' must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("'{field}' does not match '{other}'")]
    Mismatch { field: String, other: String },
}

impl FieldIssue {
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::InvalidOption { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::Mismatch { field, .. } => field,
        }
    }
}

/// Every issue found in a form, reported together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Form is incomplete: {}", describe_issues(.issues))]
pub struct ValidationFailure {
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn single(issue: FieldIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Names of the required fields left empty.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| matches!(i, FieldIssue::Missing { .. }))
            .map(FieldIssue::field)
            .collect()
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Session lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResubmitError {
    #[error("Submission {id} is '{status}', only rejected submissions can be edited")]
    NotEditable { id: i64, status: String },

    #[error("Stored values do not fit the form: {0}")]
    Form(#[from] FormError),
}
