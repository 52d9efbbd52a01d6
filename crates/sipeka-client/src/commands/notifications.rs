use sipeka_shared::protocol::{Notification, NotificationFeed};
use tracing::debug;

use crate::api::Auth;
use crate::error::Result;
use crate::state::AppState;

/// All notifications, unread first.
pub async fn notifications(state: &AppState) -> Result<Vec<Notification>> {
    let feed: NotificationFeed = state.api.get_json("notifications", Auth::Bearer).await?;
    debug!(unread = feed.unread.len(), read = feed.read.len(), "notifications loaded");
    Ok(feed.into_ordered())
}

pub async fn mark_notification_read(state: &AppState, id: &str) -> Result<()> {
    state.api.patch(&format!("notifications/{id}/read")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state_with_token;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn unread_come_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "unread": [{"id": "b", "data": {"message": "Pengajuan Anda selesai", "pengajuan_id": 4}, "created_at": "2025-02-02", "read_at": null}],
                "read": [{"id": "a", "data": {"message": "Pengajuan diterima"}, "created_at": "2025-02-01", "read_at": "2025-02-01"}]
            })))
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, Some("t")).await;
        let items = notifications(&state).await.unwrap();
        let ids: Vec<&str> = items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!items[0].is_read());
        assert_eq!(items[0].data.pengajuan_id.map(|id| id.0), Some(4));
    }

    #[tokio::test]
    async fn mark_read_patches_the_item() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/notifications/b/read"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, Some("t")).await;
        mark_notification_read(&state, "b").await.unwrap();
    }
}
