use sipeka_shared::protocol::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};
use sipeka_shared::{FieldIssue, Session, ValidationFailure};
use tracing::{info, warn};

use crate::api::Auth;
use crate::commands::require;
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Log in and store the returned token.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<LoginResponse> {
    require(&[("email", email), ("password", password)])?;

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let response: LoginResponse = state.api.post_json("login", &request, Auth::Public).await?;

    match response.token.clone().filter(|t| !t.is_empty()) {
        Some(token) => {
            state.api.session().set_token(&token)?;
            info!(email = %request.email, "logged in");
            Ok(response)
        }
        None => Err(ClientError::ServerRejection {
            status: 200,
            message: response.message.or_else(|| Some("Login gagal".into())),
        }),
    }
}

pub async fn register(state: &AppState, request: &RegisterRequest) -> Result<MessageResponse> {
    require(&[
        ("name", request.name.as_str()),
        ("email", request.email.as_str()),
        ("password", request.password.as_str()),
        ("password_confirmation", request.password_confirmation.as_str()),
    ])?;
    if request.password != request.password_confirmation {
        return Err(ValidationFailure::single(FieldIssue::Mismatch {
            field: "password_confirmation".into(),
            other: "password".into(),
        })
        .into());
    }

    let response = state.api.post_json("register", request, Auth::Public).await?;
    info!(email = %request.email, "account registered");
    Ok(response)
}

pub async fn forgot_password(state: &AppState, email: &str) -> Result<MessageResponse> {
    require(&[("email", email)])?;
    let request = ForgotPasswordRequest {
        email: email.trim().to_string(),
    };
    state.api.post_json("forgot-password", &request, Auth::Public).await
}

pub async fn change_password(
    state: &AppState,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse> {
    require(&[
        ("password", request.password.as_str()),
        ("new_password", request.new_password.as_str()),
        ("new_password_confirmation", request.new_password_confirmation.as_str()),
    ])?;
    if request.new_password != request.new_password_confirmation {
        return Err(ValidationFailure::single(FieldIssue::Mismatch {
            field: "new_password_confirmation".into(),
            other: "new_password".into(),
        })
        .into());
    }

    let response = state.api.post_json("ubahpassword", request, Auth::Bearer).await?;
    info!("password changed");
    Ok(response)
}

/// Revoke the token server-side when possible, then always forget it.
pub async fn logout(state: &AppState) -> Result<()> {
    if state.api.session().is_logged_in()? {
        let revoked: Result<serde_json::Value> = state
            .api
            .post_json("logout", &serde_json::json!({}), Auth::Bearer)
            .await;
        if let Err(e) = revoked {
            warn!(error = %e, "server-side logout failed");
        }
    }
    state.api.session().clear()?;
    info!("logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{request_count, state_with_token};
    use crate::error::AuthFailure;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(serde_json::json!({"email": "siti@example.id", "password": "rahasia"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Login berhasil",
                "token": "5|abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (state, session) = state_with_token(&server, None).await;
        let response = login(&state, " siti@example.id ", "rahasia").await.unwrap();
        assert_eq!(response.message.as_deref(), Some("Login berhasil"));
        assert_eq!(session.token().unwrap().as_deref(), Some("5|abc"));
    }

    #[tokio::test]
    async fn login_without_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Akun belum aktif"})),
            )
            .mount(&server)
            .await;

        let (state, session) = state_with_token(&server, None).await;
        let err = login(&state, "a@b.id", "x").await.unwrap_err();
        assert_eq!(err.user_message(), "Akun belum aktif");
        assert!(!session.is_logged_in().unwrap());
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_the_server() {
        let server = MockServer::start().await;
        let (state, _) = state_with_token(&server, None).await;

        let err = login(&state, "", "").await.unwrap_err();
        match err {
            ClientError::Validation(failure) => {
                assert_eq!(failure.missing_fields(), vec!["email", "password"])
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(request_count(&server).await, 0);
    }

    #[tokio::test]
    async fn register_checks_password_confirmation() {
        let server = MockServer::start().await;
        let (state, _) = state_with_token(&server, None).await;

        let request = RegisterRequest {
            name: "Siti".into(),
            email: "siti@example.id".into(),
            password: "satu".into(),
            password_confirmation: "dua".into(),
        };
        let err = register(&state, &request).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(request_count(&server).await, 0);
    }

    #[tokio::test]
    async fn logout_then_authenticated_call_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .and(header("authorization", "Bearer 9|tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Logout berhasil"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (state, session) = state_with_token(&server, Some("9|tok")).await;
        logout(&state).await.unwrap();
        assert_eq!(session.token().unwrap(), None);

        let err = crate::commands::submissions::list_submissions(&state)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Auth(AuthFailure::MissingToken)));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn logout_clears_token_even_when_server_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (state, session) = state_with_token(&server, Some("t")).await;
        logout(&state).await.unwrap();
        assert!(!session.is_logged_in().unwrap());
    }

    #[tokio::test]
    async fn change_password_is_authenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ubahpassword"))
            .and(header("authorization", "Bearer t"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Password berhasil diubah"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (state, _) = state_with_token(&server, Some("t")).await;
        let response = change_password(
            &state,
            &ChangePasswordRequest {
                password: "lama".into(),
                new_password: "baru123".into(),
                new_password_confirmation: "baru123".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.message.as_deref(), Some("Password berhasil diubah"));
    }
}
