//! Request and response bodies of the account, profile, and notification
//! endpoints.

use serde::{Deserialize, Serialize};

use crate::types::{Applicant, SubmissionId};
use crate::wire;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Generic `{ "message": ... }` body returned by most mutations and errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// The signed-in citizen (`GET /user`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub applicant: Applicant,
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub desa: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub rt: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub rw: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub kode_pos: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub dusun: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub nomor_hp: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub pekerjaan: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub tempat_lahir: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub tgl_lahir: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub foto_ktp: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub foto_kk: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_opt_string")]
    pub foto_profil: Option<String>,
}

impl UserProfile {
    /// Decode `GET /user`, which is either the user object or `{"user": {...}}`.
    pub fn from_value(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        match body {
            serde_json::Value::Object(mut map)
                if map.get("user").is_some_and(serde_json::Value::is_object) =>
            {
                serde_json::from_value(map.remove("user").unwrap_or_default())
            }
            other => serde_json::from_value(other),
        }
    }
}

/// Editable profile fields (`POST /profile/update`).
///
/// Fields left `None` or empty are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub nik: Option<String>,
    pub alamat: Option<String>,
    pub desa: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub kode_pos: Option<String>,
    pub dusun: Option<String>,
    pub nomor_hp: Option<String>,
    pub pekerjaan: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tgl_lahir: Option<String>,
}

impl ProfileUpdate {
    /// Pre-fill from the current profile so unchanged fields are resent.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        Self {
            name: non_empty(&profile.applicant.name),
            email: non_empty(&profile.applicant.email),
            nik: non_empty(&profile.applicant.nik),
            alamat: non_empty(&profile.applicant.address),
            desa: profile.desa.clone(),
            rt: profile.rt.clone(),
            rw: profile.rw.clone(),
            kode_pos: profile.kode_pos.clone(),
            dusun: profile.dusun.clone(),
            nomor_hp: profile.nomor_hp.clone(),
            pekerjaan: profile.pekerjaan.clone(),
            tempat_lahir: profile.tempat_lahir.clone(),
            tgl_lahir: profile.tgl_lahir.clone(),
        }
    }

    /// Non-empty fields as `(name, value)` pairs, in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("nik", &self.nik),
            ("alamat", &self.alamat),
            ("desa", &self.desa),
            ("rt", &self.rt),
            ("rw", &self.rw),
            ("kode_pos", &self.kode_pos),
            ("dusun", &self.dusun),
            ("nomor_hp", &self.nomor_hp),
            ("pekerjaan", &self.pekerjaan),
            ("tempat_lahir", &self.tempat_lahir),
            ("tgl_lahir", &self.tgl_lahir),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub message: String,
    #[serde(default)]
    pub pengajuan_id: Option<SubmissionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub data: NotificationData,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub read_at: Option<String>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// `GET /notifications` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub unread: Vec<Notification>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub read: Vec<Notification>,
}

impl NotificationFeed {
    /// Unread first, then read.
    pub fn into_ordered(self) -> Vec<Notification> {
        let mut all = self.unread;
        all.extend(self.read);
        all
    }
}
