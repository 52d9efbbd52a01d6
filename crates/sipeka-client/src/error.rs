use sipeka_shared::{FormError, ResubmitError, SessionError, ValidationFailure};
use sipeka_store::StoreError;
use thiserror::Error;

/// Why an authenticated call could not be made or was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No token stored; nothing was sent.
    #[error("not logged in")]
    MissingToken,

    /// The server answered 401; the stored token has been cleared.
    #[error("session expired")]
    Expired,
}

/// Errors produced by the client layer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response from the backend (connect, DNS, TLS or timeout).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Non-success status, with the server's `message` when it sent one.
    #[error(
        "Server rejected the request ({status}): {}",
        .message.as_deref().unwrap_or("no message")
    )]
    ServerRejection { status: u16, message: Option<String> },

    #[error("Field catalog for letter type {letter_type} unavailable: {reason}")]
    CatalogUnavailable { letter_type: i64, reason: String },

    #[error("Submission {id} is '{status}' and cannot be edited")]
    NotEditable { id: i64, status: String },

    #[error("Cannot {action} submission {id} while it is '{status}'")]
    ActionNotAllowed {
        action: &'static str,
        id: i64,
        status: String,
    },

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// A success response whose body does not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ResubmitError> for ClientError {
    fn from(e: ResubmitError) -> Self {
        match e {
            ResubmitError::NotEditable { id, status } => Self::NotEditable { id, status },
            ResubmitError::Form(e) => Self::Form(e),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// One line suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.".into()
            }
            Self::Auth(AuthFailure::MissingToken) => {
                "Anda belum login. Jalankan `sipeka login`.".into()
            }
            Self::Auth(AuthFailure::Expired) => {
                "Sesi Anda telah berakhir. Silakan login kembali dengan `sipeka login`.".into()
            }
            Self::Validation(failure) => failure.to_string(),
            Self::ServerRejection { message, .. } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Terjadi kesalahan pada server.".into()),
            Self::CatalogUnavailable { .. } => "Gagal memuat formulir surat.".into(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sipeka_shared::FieldIssue;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ClientError::ServerRejection {
            status: 422,
            message: Some("NIK sudah terdaftar".into()),
        };
        assert_eq!(err.user_message(), "NIK sudah terdaftar");

        let bare = ClientError::ServerRejection {
            status: 500,
            message: None,
        };
        assert_eq!(bare.user_message(), "Terjadi kesalahan pada server.");
    }

    #[test]
    fn validation_lists_fields() {
        let err = ClientError::from(ValidationFailure::single(FieldIssue::Missing {
            field: "nik".into(),
        }));
        assert!(err.user_message().contains("'nik' is required"));
    }

    #[test]
    fn resubmit_errors_map_to_not_editable() {
        let err = ClientError::from(ResubmitError::NotEditable {
            id: 3,
            status: "selesai".into(),
        });
        assert!(matches!(err, ClientError::NotEditable { id: 3, .. }));
    }
}
