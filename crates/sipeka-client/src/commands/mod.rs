//! Operations the front end invokes.
//!
//! Each sub-module groups related calls by domain. Every function takes the
//! shared [`AppState`](crate::state::AppState) and runs client-side checks
//! before any request is built.

pub mod auth;
pub mod catalog;
pub mod documents;
pub mod notifications;
pub mod profile;
pub mod submissions;

use sipeka_shared::{FieldIssue, ValidationFailure};

/// Fail with every `(name, value)` pair whose value is blank.
pub(crate) fn require(fields: &[(&str, &str)]) -> Result<(), ValidationFailure> {
    let issues: Vec<FieldIssue> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| FieldIssue::Missing {
            field: (*name).to_string(),
        })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { issues })
    }
}

/// Unwrap a list body that is either a bare array or `{"data": [...]}`.
pub(crate) fn list_items(body: serde_json::Value) -> Option<serde_json::Value> {
    match body {
        serde_json::Value::Array(_) => Some(body),
        serde_json::Value::Object(mut map) => map.remove("data").filter(|d| d.is_array()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_each_blank_field() {
        let err = require(&[("email", " "), ("password", "x"), ("name", "")]).unwrap_err();
        assert_eq!(err.missing_fields(), vec!["email", "name"]);
        assert!(require(&[("email", "a@b.id")]).is_ok());
    }

    #[test]
    fn list_items_accepts_both_shapes() {
        let bare = serde_json::json!([1, 2]);
        assert_eq!(list_items(bare.clone()), Some(bare.clone()));
        assert_eq!(list_items(serde_json::json!({ "data": bare.clone() })), Some(bare));
        assert_eq!(list_items(serde_json::json!({"message": "x"})), None);
    }
}
