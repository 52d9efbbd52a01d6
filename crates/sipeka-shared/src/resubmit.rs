//! Re-opening a rejected submission for editing.

use std::collections::HashSet;

use crate::error::ResubmitError;
use crate::form::{FieldKind, FieldValue, FileRef, FormState, RemoteFile};
use crate::status::SubmissionStatus;
use crate::submission::SubmissionDetail;
use crate::types::{Applicant, SubmissionId};

/// Editable copy of a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResubmissionDraft {
    pub submission_id: SubmissionId,
    pub letter_type_name: Option<String>,
    pub rejection_reason: Option<String>,
    pub applicant: Applicant,
    pub form: FormState,
}

impl ResubmissionDraft {
    /// Seed a draft from a detail payload.
    ///
    /// Text-like fields take the stored value; file fields with a stored
    /// path become a [`RemoteFile`] reference. Pure: the same detail always
    /// yields the same draft.
    pub fn seed(detail: &SubmissionDetail) -> Result<Self, ResubmitError> {
        if detail.status != SubmissionStatus::Rejected {
            return Err(ResubmitError::NotEditable {
                id: detail.id.0,
                status: detail.status.label().to_string(),
            });
        }

        let mut form = FormState::from_catalog(detail.values.iter().map(|v| v.field.clone()));
        let mut seen = HashSet::new();
        for stored in &detail.values {
            // Repeated field ids were collapsed by `from_catalog`; the first
            // stored value wins.
            if !seen.insert(stored.field.id) {
                continue;
            }
            let value = match stored.field.kind {
                FieldKind::File if stored.value.trim().is_empty() => FieldValue::File(None),
                FieldKind::File => FieldValue::File(Some(FileRef::Remote(RemoteFile::from_stored(
                    stored.value.clone(),
                )))),
                kind => match FieldValue::from_text(kind, stored.value.clone()) {
                    Some(value) => value,
                    None => continue,
                },
            };
            form.set_value(stored.field.id, value)?;
        }

        Ok(Self {
            submission_id: detail.id,
            letter_type_name: detail.letter_type.as_ref().map(|t| t.name.clone()),
            rejection_reason: detail.active_rejection_reason().map(String::from),
            applicant: detail.applicant.clone(),
            form,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldId;

    fn rejected_detail() -> SubmissionDetail {
        serde_json::from_value(serde_json::json!({
            "id": 21,
            "nik": "3327",
            "name": "Siti",
            "email": "siti@example.id",
            "alamat": "Petarukan",
            "status": "ditolak",
            "keterangan": "Lampiran kurang jelas",
            "created_at": "2025-03-01T00:00:00Z",
            "jenis_surats": {"id": 3, "nama_jenis": "Dispensasi Nikah"},
            "data_pengajuans": [
                {"id": 1, "nilai": "x", "field_surats": {"id": 1, "nama_field": "A", "tipe_field": "text", "is_required": true}},
                {"id": 2, "nilai": "pengajuan/21/f.pdf", "field_surats": {"id": 2, "nama_field": "B", "tipe_field": "file", "is_required": true}},
                {"id": 3, "nilai": "", "field_surats": {"id": 3, "nama_field": "C", "tipe_field": "file", "is_required": false}},
                {"id": 4, "nilai": "2025-04-01", "field_surats": {"id": 4, "nama_field": "D", "tipe_field": "date", "is_required": false}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn seeds_text_and_remote_files() {
        let draft = ResubmissionDraft::seed(&rejected_detail()).unwrap();

        assert_eq!(draft.form.get(FieldId(1)), Some(&FieldValue::Text("x".into())));
        match draft.form.get(FieldId(2)).and_then(FieldValue::as_file) {
            Some(FileRef::Remote(remote)) => {
                assert!(remote.path.ends_with("f.pdf"));
                assert_eq!(remote.name, "f.pdf");
            }
            other => panic!("expected remote reference, got {other:?}"),
        }
        assert_eq!(draft.form.get(FieldId(3)), Some(&FieldValue::File(None)));
        assert_eq!(draft.form.get(FieldId(4)), Some(&FieldValue::Date("2025-04-01".into())));
        assert_eq!(draft.rejection_reason.as_deref(), Some("Lampiran kurang jelas"));
        assert_eq!(draft.applicant.name, "Siti");
    }

    #[test]
    fn seeding_is_idempotent() {
        let detail = rejected_detail();
        let first = ResubmissionDraft::seed(&detail).unwrap();
        let second = ResubmissionDraft::seed(&detail).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn seeded_draft_passes_validation_until_a_required_value_is_cleared() {
        let mut draft = ResubmissionDraft::seed(&rejected_detail()).unwrap();
        assert!(draft.form.validate().is_ok());

        draft.form.set_value(FieldId(2), FieldValue::File(None)).unwrap();
        assert_eq!(draft.form.validate().unwrap_err().missing_fields(), vec!["B"]);
    }

    #[test]
    fn only_rejected_submissions_can_be_seeded() {
        let mut detail = rejected_detail();
        detail.status = SubmissionStatus::Completed;
        assert_eq!(
            ResubmissionDraft::seed(&detail),
            Err(ResubmitError::NotEditable {
                id: 21,
                status: "selesai".into()
            })
        );
    }
}
