//! Creating, listing, inspecting, deleting and resubmitting letter requests.

use chrono::Utc;
use serde::Serialize;
use sipeka_shared::multipart::{build_create, build_resubmit};
use sipeka_shared::protocol::MessageResponse;
use sipeka_shared::resubmit::ResubmissionDraft;
use sipeka_shared::submission::{SubmissionDetail, SubmissionSummary};
use sipeka_shared::{
    allowed_actions, Applicant, FormState, LetterType, SubmissionId, SubmissionStatus,
};
use tracing::{info, warn};

use crate::api::Auth;
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// What the backend said about a new submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub id: Option<SubmissionId>,
    pub message: Option<String>,
}

impl SubmitOutcome {
    fn from_value(body: &serde_json::Value) -> Self {
        let id = ["/data/id", "/pengajuan/id", "/id"]
            .iter()
            .find_map(|pointer| body.pointer(pointer).and_then(serde_json::Value::as_i64))
            .map(SubmissionId);
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(String::from);
        Self { id, message }
    }
}

/// Submit a new letter request after checking the form locally.
pub async fn submit(
    state: &AppState,
    letter_type: LetterType,
    applicant: &Applicant,
    form: &FormState,
) -> Result<SubmitOutcome> {
    form.validate()?;

    let plan = build_create(applicant, letter_type, form);
    let body: serde_json::Value = state
        .api
        .post_multipart("pengajuan", &plan, Auth::Bearer)
        .await?;
    let outcome = SubmitOutcome::from_value(&body);

    if let Some(id) = outcome.id {
        state.with_tracker(|t| t.mark_submitted(id));
    }
    info!(
        letter_type = letter_type.slug(),
        id = ?outcome.id.map(|id| id.0),
        parts = plan.len(),
        "submission created"
    );
    Ok(outcome)
}

/// Full history (`GET /pengajuan`).
///
/// The result replaces the tracked statuses. Returns `None` when a later
/// refresh has already been applied, so the caller keeps what it shows.
pub async fn list_submissions(state: &AppState) -> Result<Option<Vec<SubmissionSummary>>> {
    let ticket = state.with_tracker(|t| t.begin_refresh());
    let body = state.api.get_value("pengajuan", Auth::Bearer).await?;
    let rows = SubmissionSummary::list_from_value(body)?;

    let applied = state.with_tracker(|t| t.apply(ticket, status_pairs(&rows)));
    if !applied {
        warn!(?ticket, "discarding stale history response");
        return Ok(None);
    }
    Ok(Some(rows))
}

/// Most recent submissions (`GET /pengajuanterbaru`).
///
/// Only the returned rows are updated, sequenced with the full history.
pub async fn latest_submissions(state: &AppState) -> Result<Option<Vec<SubmissionSummary>>> {
    let ticket = state.with_tracker(|t| t.begin_refresh());
    let body = state.api.get_value("pengajuanterbaru", Auth::Bearer).await?;
    let rows = SubmissionSummary::list_from_value(body)?;

    let merged = state.with_tracker(|t| t.merge(ticket, status_pairs(&rows)));
    if !merged {
        warn!(?ticket, "discarding stale latest response");
        return Ok(None);
    }
    Ok(Some(rows))
}

fn status_pairs(
    rows: &[SubmissionSummary],
) -> impl Iterator<Item = (SubmissionId, SubmissionStatus)> + '_ {
    rows.iter().map(|row| (row.id, row.status.clone()))
}

pub async fn submission_detail(state: &AppState, id: SubmissionId) -> Result<SubmissionDetail> {
    let detail: SubmissionDetail = state
        .api
        .get_json(&format!("pengajuan/{id}"), Auth::Bearer)
        .await?;
    if !state.with_tracker(|t| t.observe(detail.id, detail.status.clone())) {
        warn!(id = detail.id.0, status = %detail.status, "unexpected status transition");
    }
    Ok(detail)
}

/// Delete a submission whose status still permits it.
pub async fn delete_submission(
    state: &AppState,
    id: SubmissionId,
    status: &SubmissionStatus,
) -> Result<MessageResponse> {
    if !allowed_actions(status).delete {
        return Err(ClientError::ActionNotAllowed {
            action: "delete",
            id: id.0,
            status: status.label().to_string(),
        });
    }

    let body = state.api.delete(&format!("pengajuan/{id}")).await?;
    state.with_tracker(|t| t.forget(id));
    info!(id = id.0, "submission deleted");
    Ok(serde_json::from_value(body).unwrap_or_default())
}

/// Fetch a rejected submission and seed an editable draft from it.
pub async fn open_resubmission(state: &AppState, id: SubmissionId) -> Result<ResubmissionDraft> {
    let detail = submission_detail(state, id).await?;
    Ok(ResubmissionDraft::seed(&detail)?)
}

/// Send an edited draft back (`POST /pengajuan/{id}/update`).
pub async fn resubmit(state: &AppState, draft: &ResubmissionDraft) -> Result<MessageResponse> {
    draft.form.validate()?;

    let id = draft.submission_id;
    let plan = build_resubmit(&draft.applicant, &draft.form, Utc::now().timestamp_millis());
    let body: serde_json::Value = state
        .api
        .post_multipart(&format!("pengajuan/{id}/update"), &plan, Auth::Bearer)
        .await?;

    state.with_tracker(|t| t.mark_submitted(id));
    let uploads = plan.parts.iter().filter(|p| p.is_file()).count();
    info!(id = id.0, uploads, "submission resent");
    Ok(serde_json::from_value(body).unwrap_or_default())
}
