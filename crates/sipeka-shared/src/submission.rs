//! Read-only projections of letter requests as the backend returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS};
use crate::form::{FieldDescriptor, FieldKind};
use crate::status::{allowed_actions, ActionSet, SubmissionStatus};
use crate::types::{Applicant, SubmissionId};
use crate::wire;

/// Letter type as embedded in submission payloads (`jenis_surats`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterTypeRef {
    pub id: i64,
    #[serde(rename = "nama_jenis", default, deserialize_with = "wire::null_as_default")]
    pub name: String,
}

/// One row of the history list (`GET /pengajuan`, `GET /pengajuanterbaru`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: SubmissionId,
    #[serde(rename = "jenis_surats", alias = "jenisSurats", default)]
    pub letter_type: Option<LetterTypeRef>,
    pub status: SubmissionStatus,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub created_at: String,
}

impl SubmissionSummary {
    /// Decode a list body, which is either a bare array or `{"data": [...]}`.
    /// Any other shape is an empty list.
    pub fn list_from_value(body: serde_json::Value) -> Result<Vec<Self>, serde_json::Error> {
        match body {
            serde_json::Value::Array(_) => serde_json::from_value(body),
            serde_json::Value::Object(mut map) => match map.remove("data") {
                Some(data @ serde_json::Value::Array(_)) => serde_json::from_value(data),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    pub fn actions(&self) -> ActionSet {
        allowed_actions(&self.status)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Stored value of one dynamic field (`data_pengajuans[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFieldValue {
    pub id: i64,
    #[serde(rename = "field_surats")]
    pub field: FieldDescriptor,
    /// Text, or a server-side storage path for file fields.
    #[serde(rename = "nilai", default, deserialize_with = "wire::lenient_string")]
    pub value: String,
}

impl SubmissionFieldValue {
    pub fn display_kind(&self) -> StoredValueKind {
        if self.field.kind == FieldKind::File {
            return match StoredValueKind::classify(&self.value) {
                StoredValueKind::Text => StoredValueKind::Document,
                other => other,
            };
        }
        StoredValueKind::classify(&self.value)
    }
}

/// Full detail of one letter request (`GET /pengajuan/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub applicant: Applicant,
    pub status: SubmissionStatus,
    #[serde(rename = "keterangan", default)]
    pub rejection_reason: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub created_at: String,
    #[serde(rename = "jenis_surats", default)]
    pub letter_type: Option<LetterTypeRef>,
    #[serde(rename = "data_pengajuans", default, deserialize_with = "wire::null_as_default")]
    pub values: Vec<SubmissionFieldValue>,
}

impl SubmissionDetail {
    pub fn actions(&self) -> ActionSet {
        allowed_actions(&self.status)
    }

    /// The rejection reason, only while the submission is rejected.
    pub fn active_rejection_reason(&self) -> Option<&str> {
        match self.status {
            SubmissionStatus::Rejected => self
                .rejection_reason
                .as_deref()
                .filter(|r| !r.trim().is_empty()),
            _ => None,
        }
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// How a stored value is presented in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredValueKind {
    Image,
    Pdf,
    Document,
    Text,
}

impl StoredValueKind {
    /// Classify by file extension, the way the detail screen does.
    pub fn classify(value: &str) -> Self {
        let ext = value
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else if ext == "pdf" {
            Self::Pdf
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            Self::Document
        } else {
            Self::Text
        }
    }

    pub fn is_file(self) -> bool {
        !matches!(self, Self::Text)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
