//! Turns a filled form into the ordered list of multipart parts the
//! backend expects.
//!
//! The plan is pure data; the HTTP layer reads local files and encodes it.
//! The builder never checks required fields, callers run
//! [`FormState::validate`](crate::form::FormState::validate) first.
//!
//! On resubmit every text field is sent, blank ones included, so clearing a
//! value in the draft clears the stored value on the server.

use serde::Serialize;

use crate::constants::{field_part_name, LETTER_TYPE_KEY, METHOD_OVERRIDE_KEY};
use crate::form::{FieldValue, FileRef, FormState, LocalFile};
use crate::protocol::ProfileUpdate;
use crate::types::{Applicant, FieldId, LetterType};

/// Body of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartBody {
    Text { value: String },
    File { file: LocalFile, file_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: PartBody::Text {
                value: value.into(),
            },
        }
    }

    pub fn file(name: impl Into<String>, file: LocalFile, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: PartBody::File {
                file,
                file_name: file_name.into(),
            },
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.body, PartBody::File { .. })
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.body {
            PartBody::Text { value } => Some(value),
            PartBody::File { .. } => None,
        }
    }
}

/// Ordered multipart parts of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultipartPlan {
    pub parts: Vec<Part>,
}

impl MultipartPlan {
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Parts carrying dynamic field values (`fields[<id>]`).
    pub fn field_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.name.starts_with("fields["))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Body of `POST /pengajuan`: applicant identity, letter type tag, then one
/// part per field in catalog order.
pub fn build_create(
    applicant: &Applicant,
    letter_type: LetterType,
    form: &FormState,
) -> MultipartPlan {
    let mut plan = MultipartPlan::default();
    plan.push(Part::text("nik", &applicant.nik));
    plan.push(Part::text("name", &applicant.name));
    plan.push(Part::text("email", &applicant.email));
    plan.push(Part::text("alamat", &applicant.address));
    plan.push(Part::text(LETTER_TYPE_KEY, letter_type.id().to_string()));

    for (field, value) in form.snapshot() {
        let name = field_part_name(field.id.0);
        let part = match value {
            FieldValue::File(Some(FileRef::Local(file))) => {
                let file_name = upload_name(field.id, file);
                Part::file(name, file.clone(), file_name)
            }
            // A remote reference cannot occur in a fresh form; send its path
            // so the part count still matches the catalog.
            FieldValue::File(Some(FileRef::Remote(remote))) => Part::text(name, &remote.path),
            FieldValue::File(None) => Part::text(name, ""),
            FieldValue::Text(s)
            | FieldValue::Number(s)
            | FieldValue::Date(s)
            | FieldValue::Select(s) => Part::text(name, s),
        };
        plan.push(part);
    }
    plan
}

/// Body of `POST /pengajuan/{id}/update`.
///
/// File fields still holding a remote reference are omitted so the server
/// keeps the stored file; newly picked files are uploaded under a fresh
/// name stamped with `uploaded_at_ms`. Text fields are always sent, and a
/// blank one overwrites the stored value with an empty string.
pub fn build_resubmit(
    applicant: &Applicant,
    form: &FormState,
    uploaded_at_ms: i64,
) -> MultipartPlan {
    let mut plan = MultipartPlan::default();
    plan.push(Part::text("name", &applicant.name));
    plan.push(Part::text("email", &applicant.email));
    plan.push(Part::text("alamat", &applicant.address));

    for (field, value) in form.snapshot() {
        let name = field_part_name(field.id.0);
        match value {
            FieldValue::File(Some(FileRef::Local(file))) => {
                let file_name = match file.extension() {
                    Some(ext) => format!("file_{}_{}.{}", field.id, uploaded_at_ms, ext),
                    None => format!("file_{}_{}", field.id, uploaded_at_ms),
                };
                plan.push(Part::file(name, file.clone(), file_name));
            }
            FieldValue::File(Some(FileRef::Remote(_))) | FieldValue::File(None) => {}
            FieldValue::Text(s)
            | FieldValue::Number(s)
            | FieldValue::Date(s)
            | FieldValue::Select(s) => plan.push(Part::text(name, s)),
        }
    }
    plan
}

/// Body of `POST /profile/update`: spoofed `PUT`, every non-empty profile
/// field, then the optional KTP and KK photos.
pub fn build_profile_update(
    update: &ProfileUpdate,
    foto_ktp: Option<&LocalFile>,
    foto_kk: Option<&LocalFile>,
) -> MultipartPlan {
    let mut plan = MultipartPlan::default();
    for (key, value) in update.text_fields() {
        plan.push(Part::text(key, value));
    }
    plan.push(Part::text(METHOD_OVERRIDE_KEY, "PUT"));

    for (key, photo) in [("foto_ktp", foto_ktp), ("foto_kk", foto_kk)] {
        if let Some(file) = photo {
            let mut file = file.clone();
            file.mime_type.get_or_insert_with(|| "image/jpeg".to_string());
            let file_name = match file.extension() {
                Some(ext) => format!("{key}.{ext}"),
                None => format!("{key}.jpg"),
            };
            plan.push(Part::file(key, file, file_name));
        }
    }
    plan
}

fn upload_name(id: FieldId, file: &LocalFile) -> String {
    if file.name.trim().is_empty() {
        format!("file_{id}")
    } else {
        file.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldDescriptor, FieldKind, RemoteFile};

    fn descriptor(id: i64, name: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor {
            id: FieldId(id),
            letter_type_id: None,
            name: name.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    fn applicant() -> Applicant {
        Applicant {
            nik: "3327010101010001".into(),
            name: "Siti".into(),
            email: "siti@example.id".into(),
            address: "Petarukan".into(),
        }
    }

    fn mixed_form() -> FormState {
        FormState::from_catalog(vec![
            descriptor(10, "nama", FieldKind::Text),
            descriptor(11, "umur", FieldKind::Number),
            descriptor(12, "tanggal", FieldKind::Date),
            descriptor(13, "agama", FieldKind::Select),
            descriptor(14, "ktp", FieldKind::File),
            descriptor(15, "kk", FieldKind::File),
        ])
    }

    #[test]
    fn create_has_one_part_per_descriptor() {
        for size in [0usize, 1, 6] {
            let form = FormState::from_catalog(
                mixed_form().descriptors().iter().take(size).cloned(),
            );
            let plan = build_create(&applicant(), LetterType::DispenNikah, &form);
            let names: Vec<&str> = plan.field_parts().map(|p| p.name.as_str()).collect();
            let expected: Vec<String> = form
                .descriptors()
                .iter()
                .map(|f| format!("fields[{}]", f.id))
                .collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn create_carries_identity_and_letter_type() {
        let plan = build_create(&applicant(), LetterType::PindahLuarProvinsi, &mixed_form());
        assert_eq!(plan.get("nik").and_then(Part::text_value), Some("3327010101010001"));
        assert_eq!(plan.get("alamat").and_then(Part::text_value), Some("Petarukan"));
        assert_eq!(plan.get("jenis_surat_id").and_then(Part::text_value), Some("2"));
    }

    #[test]
    fn create_sends_files_as_binary_and_the_rest_as_text() {
        let mut form = mixed_form();
        form.set_text(FieldId(10), "Budi").unwrap();
        form.set_text(FieldId(13), "Islam").unwrap();
        form.pick_file(FieldId(14), LocalFile::from_path("/tmp/ktp.jpg"))
            .unwrap();
        form.pick_file(
            FieldId(15),
            LocalFile {
                path: "/tmp/upload".into(),
                name: String::new(),
                mime_type: None,
            },
        )
        .unwrap();

        let plan = build_create(&applicant(), LetterType::DispenNikah, &form);

        assert_eq!(plan.get("fields[10]").and_then(Part::text_value), Some("Budi"));
        assert_eq!(plan.get("fields[11]").and_then(Part::text_value), Some(""));
        assert_eq!(plan.get("fields[13]").and_then(Part::text_value), Some("Islam"));

        for (name, expected) in [("fields[14]", "ktp.jpg"), ("fields[15]", "file_15")] {
            match &plan.get(name).unwrap().body {
                PartBody::File { file_name, .. } => assert_eq!(file_name, expected),
                other => panic!("{name} should be a file part, got {other:?}"),
            }
        }
    }

    #[test]
    fn unset_file_is_an_empty_text_part() {
        let plan = build_create(&applicant(), LetterType::DispenNikah, &mixed_form());
        let part = plan.get("fields[14]").unwrap();
        assert!(!part.is_file());
        assert_eq!(part.text_value(), Some(""));
    }

    #[test]
    fn profile_update_spoofs_put_and_skips_blank_fields() {
        let update = ProfileUpdate {
            name: Some("Siti".into()),
            email: Some("siti@example.id".into()),
            rt: Some("  ".into()),
            ..ProfileUpdate::default()
        };
        let ktp = LocalFile::from_path("/tmp/scan.png");

        let plan = build_profile_update(&update, Some(&ktp), None);

        assert_eq!(plan.get("_method").and_then(Part::text_value), Some("PUT"));
        assert_eq!(plan.get("name").and_then(Part::text_value), Some("Siti"));
        assert!(plan.get("rt").is_none());
        assert!(plan.get("foto_kk").is_none());
        match &plan.get("foto_ktp").unwrap().body {
            PartBody::File { file_name, file } => {
                assert_eq!(file_name, "foto_ktp.png");
                assert_eq!(file.mime_or_default(), "image/png");
            }
            other => panic!("expected file part, got {other:?}"),
        }
    }

    #[test]
    fn resubmit_keeps_remote_files_and_uploads_new_ones() {
        let mut form = mixed_form();
        form.set_text(FieldId(10), "Budi").unwrap();
        form.set_value(
            FieldId(14),
            FieldValue::File(Some(FileRef::Remote(RemoteFile::from_stored(
                "pengajuan/1/ktp.jpg",
            )))),
        )
        .unwrap();
        form.pick_file(FieldId(15), LocalFile::from_path("/tmp/kk-baru.PDF"))
            .unwrap();

        let plan = build_resubmit(&applicant(), &form, 1_700_000_000_000);

        assert!(plan.get("nik").is_none());
        assert!(plan.get("jenis_surat_id").is_none());
        assert!(plan.get("fields[14]").is_none());
        assert_eq!(plan.get("fields[10]").and_then(Part::text_value), Some("Budi"));
        match &plan.get("fields[15]").unwrap().body {
            PartBody::File { file_name, file } => {
                assert_eq!(file_name, "file_15_1700000000000.pdf");
                assert_eq!(file.mime_or_default(), "application/pdf");
            }
            other => panic!("expected file part, got {other:?}"),
        }
    }

    #[test]
    fn resubmit_sends_blank_text_to_clear_stored_value() {
        let mut form = mixed_form();
        form.set_text(FieldId(10), "").unwrap();
        form.set_text(FieldId(11), "   ").unwrap();

        let plan = build_resubmit(&applicant(), &form, 1);

        assert_eq!(plan.get("fields[10]").and_then(Part::text_value), Some(""));
        assert_eq!(plan.get("fields[11]").and_then(Part::text_value), Some("   "));
        assert!(plan.get("fields[14]").is_none());
    }
}
