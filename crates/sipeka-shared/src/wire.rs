//! Serde helpers for the loosely-typed JSON the backend returns.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a boolean flag sent as `true/false`, `0/1`, or `"0"/"1"`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        Some(Flag::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

/// Deserialize a stored value that may arrive as a string, a number, or `null`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Like [`lenient_string`], but `null` and empty strings become `None`.
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(lenient_string(deserializer)?).filter(|s| !s.is_empty()))
}

/// Deserialize a list of options sent as a JSON array, a JSON-encoded array
/// string, a comma-separated string, or `null`.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Items(Vec<String>),
        Text(String),
    }

    Ok(match Option::<List>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(List::Items(items)) => items,
        Some(List::Text(text)) => match serde_json::from_str::<Vec<String>>(&text) {
            Ok(items) => items,
            Err(_) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "flag")]
        required: bool,
        #[serde(default, deserialize_with = "lenient_string")]
        value: String,
    }

    #[test]
    fn flag_accepts_every_shape() {
        for (json, expected) in [
            (r#"{"required": 1}"#, true),
            (r#"{"required": 0}"#, false),
            (r#"{"required": true}"#, true),
            (r#"{"required": "1"}"#, true),
            (r#"{"required": null}"#, false),
            (r#"{}"#, false),
        ] {
            let sample: Sample = serde_json::from_str(json).unwrap();
            assert_eq!(sample.required, expected, "{json}");
        }
    }

    #[derive(Deserialize)]
    struct Options {
        #[serde(default, deserialize_with = "string_list")]
        options: Vec<String>,
    }

    #[test]
    fn string_list_accepts_encoded_and_plain_text() {
        let parse = |json: &str| serde_json::from_str::<Options>(json).unwrap().options;
        assert_eq!(parse(r#"{"options": ["A", "B"]}"#), vec!["A", "B"]);
        assert_eq!(parse(r#"{"options": "[\"A\",\"B\"]"}"#), vec!["A", "B"]);
        assert_eq!(parse(r#"{"options": "A, B"}"#), vec!["A", "B"]);
        assert!(parse(r#"{"options": null}"#).is_empty());
        assert!(parse(r#"{}"#).is_empty());
    }

    #[test]
    fn lenient_string_stringifies_numbers() {
        let sample: Sample = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        assert_eq!(sample.value, "42");
        let sample: Sample = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(sample.value, "");
    }
}
