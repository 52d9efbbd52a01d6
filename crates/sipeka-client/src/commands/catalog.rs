use sipeka_shared::{FieldDescriptor, FormState, LetterType};
use tracing::{debug, warn};

use crate::api::Auth;
use crate::commands::list_items;
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Field catalog of one letter type, in server order.
///
/// Any failure (unreachable backend, error status, odd body) becomes
/// [`ClientError::CatalogUnavailable`]. No retry.
pub async fn load_catalog(
    state: &AppState,
    letter_type: LetterType,
) -> Result<Vec<FieldDescriptor>> {
    let unavailable = |reason: String| ClientError::CatalogUnavailable {
        letter_type: letter_type.id(),
        reason,
    };

    let body = state
        .api
        .get_value(&format!("getFieldSurat/{}", letter_type.id()), Auth::Public)
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    let items = list_items(body).ok_or_else(|| unavailable("body is not a field list".into()))?;
    let fields: Vec<FieldDescriptor> =
        serde_json::from_value(items).map_err(|e| unavailable(e.to_string()))?;

    debug!(letter_type = letter_type.slug(), fields = fields.len(), "catalog loaded");
    Ok(fields)
}

/// Like [`load_catalog`], but an unavailable catalog yields an empty form.
pub async fn load_or_empty(state: &AppState, letter_type: LetterType) -> FormState {
    match load_catalog(state, letter_type).await {
        Ok(fields) => FormState::from_catalog(fields),
        Err(e) => {
            warn!(letter_type = letter_type.slug(), error = %e, "rendering empty form");
            FormState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state_with_token;
    use sipeka_shared::FieldKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn catalog_keeps_server_order_without_a_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getFieldSurat/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 9, "jenis_surat_id": 3, "nama_field": "Nama Calon", "tipe_field": "text", "is_required": 1},
                {"id": 2, "jenis_surat_id": 3, "nama_field": "Foto KTP", "tipe_field": "file", "is_required": 1},
                {"id": 5, "jenis_surat_id": 3, "nama_field": "Agama", "tipe_field": "select", "is_required": 0, "options": "Islam,Kristen"}
            ])))
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, None).await;
        let fields = load_catalog(&state, LetterType::DispenNikah).await.unwrap();
        let ids: Vec<i64> = fields.iter().map(|f| f.id.0).collect();
        assert_eq!(ids, vec![9, 2, 5]);
        assert_eq!(fields[1].kind, FieldKind::File);
        assert_eq!(fields[2].options, vec!["Islam", "Kristen"]);
    }

    #[tokio::test]
    async fn server_error_is_catalog_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getFieldSurat/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, None).await;
        let err = load_catalog(&state, LetterType::PindahDalamProvinsi).await.unwrap_err();
        assert!(matches!(err, ClientError::CatalogUnavailable { letter_type: 1, .. }));
        assert!(load_or_empty(&state, LetterType::PindahDalamProvinsi).await.is_empty());
    }

    #[tokio::test]
    async fn undecodable_body_is_catalog_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getFieldSurat/4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, None).await;
        let err = load_catalog(&state, LetterType::IjinHajatan).await.unwrap_err();
        assert!(matches!(err, ClientError::CatalogUnavailable { .. }));
    }
}
