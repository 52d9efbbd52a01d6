use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::wire;

/// Server-assigned id of a dynamic form field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct FieldId(pub i64);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned id of a letter request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SubmissionId(pub i64);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The letter types offered by the district office.
///
/// The numeric id doubles as the catalog id (`/getFieldSurat/{id}`) and as
/// the `jenis_surat_id` tag of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterType {
    PindahDalamProvinsi,
    PindahLuarProvinsi,
    DispenNikah,
    IjinHajatan,
}

impl LetterType {
    pub const ALL: [LetterType; 4] = [
        Self::PindahDalamProvinsi,
        Self::PindahLuarProvinsi,
        Self::DispenNikah,
        Self::IjinHajatan,
    ];

    pub fn id(self) -> i64 {
        match self {
            Self::PindahDalamProvinsi => 1,
            Self::PindahLuarProvinsi => 2,
            Self::DispenNikah => 3,
            Self::IjinHajatan => 4,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::PindahDalamProvinsi => "pindah-dalam-provinsi",
            Self::PindahLuarProvinsi => "pindah-luar-provinsi",
            Self::DispenNikah => "dispen-nikah",
            Self::IjinHajatan => "ijin-hajatan",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::PindahDalamProvinsi => "Surat Pindah Dalam Provinsi",
            Self::PindahLuarProvinsi => "Surat Pindah Luar Provinsi",
            Self::DispenNikah => "Dispensasi Nikah",
            Self::IjinHajatan => "Ijin Hajatan",
        }
    }
}

impl std::fmt::Display for LetterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LetterType {
    type Err = String;

    /// Accepts either the numeric id or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Self::from_id(id).ok_or_else(|| format!("unknown letter type id {id}"));
        }
        Self::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown letter type '{s}'"))
    }
}

/// Identity fields attached to every submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Applicant {
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub nik: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub email: String,
    #[serde(rename = "alamat", default, deserialize_with = "wire::lenient_string")]
    pub address: String,
}
