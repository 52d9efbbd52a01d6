use sipeka_shared::form::LocalFile;
use sipeka_shared::multipart::build_profile_update;
use sipeka_shared::protocol::{MessageResponse, ProfileUpdate, UserProfile};
use tracing::info;

use crate::api::Auth;
use crate::commands::require;
use crate::error::Result;
use crate::state::AppState;

/// The logged-in user (`GET /user`).
pub async fn current_user(state: &AppState) -> Result<UserProfile> {
    let body = state.api.get_value("user", Auth::Bearer).await?;
    Ok(UserProfile::from_value(body)?)
}

/// Update the profile; name and email are required.
pub async fn update_profile(
    state: &AppState,
    update: &ProfileUpdate,
    foto_ktp: Option<&LocalFile>,
    foto_kk: Option<&LocalFile>,
) -> Result<MessageResponse> {
    require(&[
        ("name", update.name.as_deref().unwrap_or_default()),
        ("email", update.email.as_deref().unwrap_or_default()),
    ])?;

    let plan = build_profile_update(update, foto_ktp, foto_kk);
    let response = state
        .api
        .post_multipart("profile/update", &plan, Auth::Bearer)
        .await?;
    info!(
        with_ktp = foto_ktp.is_some(),
        with_kk = foto_kk.is_some(),
        "profile updated"
    );
    Ok(response)
}
