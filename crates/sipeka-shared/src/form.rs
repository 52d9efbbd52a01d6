//! Dynamic letter forms.
//!
//! A form is driven by the ordered [`FieldDescriptor`] catalog the backend
//! returns for a letter type. [`FormState`] holds one [`FieldValue`] per
//! descriptor, keyed by [`FieldId`], and is only ever checked for
//! completeness at submit time via [`FormState::validate`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, DEFAULT_FILE_MIME};
use crate::error::{FieldIssue, FormError, ValidationFailure};
use crate::types::FieldId;
use crate::wire;

/// Data kind of a dynamic field, as named by the backend's `tipe_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FieldKind {
    Text,
    Number,
    Password,
    Date,
    Select,
    File,
    Textarea,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Password => "password",
            Self::Date => "date",
            Self::Select => "select",
            Self::File => "file",
            Self::Textarea => "textarea",
        }
    }

    /// Unknown kinds are rendered as plain text inputs.
    pub fn from_wire(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "password" => Self::Password,
            "date" => Self::Date,
            "select" => Self::Select,
            "file" => Self::File,
            "textarea" => Self::Textarea,
            _ => Self::Text,
        }
    }
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::Text
    }
}

impl From<String> for FieldKind {
    fn from(kind: String) -> Self {
        Self::from_wire(&kind)
    }
}

impl From<FieldKind> for &'static str {
    fn from(kind: FieldKind) -> Self {
        kind.as_str()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One entry of a letter type's field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    #[serde(
        rename = "jenis_surat_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub letter_type_id: Option<i64>,
    #[serde(rename = "nama_field")]
    pub name: String,
    #[serde(rename = "tipe_field", default)]
    pub kind: FieldKind,
    #[serde(rename = "is_required", default, deserialize_with = "wire::flag")]
    pub required: bool,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub options: Vec<String>,
}

/// A file picked from the local filesystem, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: Option<String>,
}

impl LocalFile {
    /// Describe a file on disk, deriving its name and MIME type from the path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mime_type = mime_for_path(&path).map(String::from);
        Self {
            path,
            name,
            mime_type,
        }
    }

    pub fn mime_or_default(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_FILE_MIME)
    }

    /// Lower-cased extension of the picked file, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .or_else(|| self.path.extension())
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// A file already stored on the server, referenced by its storage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    pub name: String,
}

impl RemoteFile {
    pub fn from_stored(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("file")
            .to_string();
        Self { path, name }
    }

    /// Absolute URL of the file under the storage base URL.
    pub fn url(&self, storage_base: &str) -> String {
        format!(
            "{}/{}",
            storage_base.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FileRef {
    Local(LocalFile),
    Remote(RemoteFile),
}

impl FileRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Local(f) => &f.name,
            Self::Remote(f) => &f.name,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Current value of one field.
///
/// Password and textarea fields hold [`FieldValue::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(String),
    Date(String),
    Select(String),
    File(Option<FileRef>),
}

impl FieldValue {
    /// The untouched value for a field of `kind`.
    pub fn empty_for(kind: FieldKind) -> Self {
        Self::from_text(kind, String::new()).unwrap_or(Self::File(None))
    }

    /// Wrap raw text in the variant matching `kind`. `None` for file fields.
    pub fn from_text(kind: FieldKind, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        match kind {
            FieldKind::Text | FieldKind::Password | FieldKind::Textarea => Some(Self::Text(text)),
            FieldKind::Number => Some(Self::Number(text)),
            FieldKind::Date => Some(Self::Date(text)),
            FieldKind::Select => Some(Self::Select(text)),
            FieldKind::File => None,
        }
    }

    /// Absent for required-field purposes.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Number(s) | Self::Date(s) | Self::Select(s) => {
                s.trim().is_empty()
            }
            Self::File(f) => f.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Number(s) | Self::Date(s) | Self::Select(s) => Some(s),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(f) => f.as_ref(),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Date(_) => "date",
            Self::Select(_) => "select",
            Self::File(_) => "file",
        }
    }

    fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Text(_),
                FieldKind::Text | FieldKind::Password | FieldKind::Textarea
            ) | (Self::Number(_), FieldKind::Number)
                | (Self::Date(_), FieldKind::Date)
                | (Self::Select(_), FieldKind::Select)
                | (Self::File(_), FieldKind::File)
        )
    }
}

/// Values of every field of one form, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: Vec<FieldDescriptor>,
    values: BTreeMap<FieldId, FieldValue>,
}

impl FormState {
    /// Build an empty form from a catalog. A repeated field id keeps its
    /// first descriptor only.
    pub fn from_catalog(catalog: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        let mut fields = Vec::new();
        let mut values = BTreeMap::new();
        for descriptor in catalog {
            if values.contains_key(&descriptor.id) {
                continue;
            }
            values.insert(descriptor.id, FieldValue::empty_for(descriptor.kind));
            fields.push(descriptor);
        }
        Self { fields, values }
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn descriptor(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look a field up by its display name, ignoring case.
    pub fn descriptor_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        let name = name.trim();
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.values.get(&id)
    }

    /// Overwrite the value of a field. Only the value's shape is checked.
    pub fn set_value(&mut self, id: FieldId, value: FieldValue) -> Result<(), FormError> {
        let descriptor = self.descriptor(id).ok_or(FormError::UnknownField(id.0))?;
        if !value.fits(descriptor.kind) {
            return Err(FormError::KindMismatch {
                field: descriptor.name.clone(),
                expected: descriptor.kind,
                got: value.label(),
            });
        }
        self.values.insert(id, value);
        Ok(())
    }

    /// Set a non-file field from raw text, wrapping it in the field's variant.
    pub fn set_text(&mut self, id: FieldId, text: impl Into<String>) -> Result<(), FormError> {
        let descriptor = self.descriptor(id).ok_or(FormError::UnknownField(id.0))?;
        let value = FieldValue::from_text(descriptor.kind, text).ok_or_else(|| {
            FormError::KindMismatch {
                field: descriptor.name.clone(),
                expected: FieldKind::File,
                got: "text",
            }
        })?;
        self.values.insert(id, value);
        Ok(())
    }

    /// Attach a freshly picked local file to a file field.
    pub fn pick_file(&mut self, id: FieldId, file: LocalFile) -> Result<(), FormError> {
        self.set_value(id, FieldValue::File(Some(FileRef::Local(file))))
    }

    /// Set a field by display name: file fields take `input` as a path,
    /// every other kind takes it as text.
    pub fn set_by_name(&mut self, name: &str, input: &str) -> Result<(), FormError> {
        let descriptor = self
            .descriptor_by_name(name)
            .ok_or_else(|| FormError::UnknownFieldName(name.to_string()))?;
        let id = descriptor.id;
        if descriptor.kind == FieldKind::File {
            self.pick_file(id, LocalFile::from_path(input))
        } else {
            self.set_text(id, input)
        }
    }

    /// Every descriptor paired with its current value, in catalog order.
    pub fn snapshot(&self) -> Vec<(&FieldDescriptor, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|f| self.values.get(&f.id).map(|v| (f, v)))
            .collect()
    }

    /// Submit-time check: required fields present, select values among the
    /// options, dates and numbers well-formed.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let mut issues = Vec::new();

        for (field, value) in self.snapshot() {
            if value.is_empty() {
                if field.required {
                    issues.push(FieldIssue::Missing {
                        field: field.name.clone(),
                    });
                }
                continue;
            }

            match value {
                FieldValue::Select(choice)
                    if !field.options.is_empty() && !field.options.contains(choice) =>
                {
                    issues.push(FieldIssue::InvalidOption {
                        field: field.name.clone(),
                        value: choice.clone(),
                    });
                }
                FieldValue::Date(date)
                    if NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).is_err() =>
                {
                    issues.push(FieldIssue::InvalidDate {
                        field: field.name.clone(),
                        value: date.clone(),
                    });
                }
                FieldValue::Number(number) if !is_number(number) => {
                    issues.push(FieldIssue::InvalidNumber {
                        field: field.name.clone(),
                        value: number.clone(),
                    });
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { issues })
        }
    }
}

/// A finite decimal, optionally signed (`17`, `-3`, `2.5`).
fn is_number(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// MIME type for the extensions the office accepts as attachments.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => return None,
    })
}
