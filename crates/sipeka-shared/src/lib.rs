//! # sipeka-shared
//!
//! Domain types and client-side rules for SiPeka letter requests: the
//! dynamic form engine, the multipart submission builder, submission
//! lifecycle and permitted actions, resubmission seeding, and the session
//! capability. Nothing in this crate performs I/O.

pub mod constants;
pub mod error;
pub mod form;
pub mod multipart;
pub mod protocol;
pub mod resubmit;
pub mod session;
pub mod status;
pub mod submission;
pub mod types;
pub mod wire;

pub use error::{FieldIssue, FormError, ResubmitError, SessionError, ValidationFailure};
pub use form::{FieldDescriptor, FieldKind, FieldValue, FileRef, FormState, LocalFile, RemoteFile};
pub use session::{MemorySession, Session};
pub use status::{allowed_actions, ActionSet, StatusTracker, SubmissionStatus};
pub use types::{Applicant, FieldId, LetterType, SubmissionId};
