use std::path::{Path, PathBuf};

use sipeka_shared::constants::{letter_file_name, PDF_MIME};
use sipeka_shared::submission::SubmissionFieldValue;
use sipeka_shared::{allowed_actions, SubmissionId, SubmissionStatus};
use tracing::info;

use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Download the generated letter of a completed submission into `dir`.
///
/// Returns the path written, `<dir>/surat_<id>.pdf`.
pub async fn download_letter(
    state: &AppState,
    id: SubmissionId,
    status: &SubmissionStatus,
    dir: &Path,
) -> Result<PathBuf> {
    if !allowed_actions(status).download {
        return Err(ClientError::ActionNotAllowed {
            action: "download",
            id: id.0,
            status: status.label().to_string(),
        });
    }

    let bytes = state
        .api
        .get_bytes(&format!("pengajuan/{id}/cetak"), PDF_MIME)
        .await?;

    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(letter_file_name(id.0));
    tokio::fs::write(&target, &bytes).await?;

    info!(id = id.0, path = %target.display(), bytes = bytes.len(), "letter downloaded");
    Ok(target)
}

/// Public URL of a stored file value, or `None` for plain text values.
pub fn stored_file_url(state: &AppState, value: &SubmissionFieldValue) -> Option<String> {
    if value.value.trim().is_empty() || !value.display_kind().is_file() {
        return None;
    }
    Some(state.config().storage_file_url(&value.value))
}
