//! Wrapped request path and endpoint helpers

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::api::{ApiError, ApiResult, RequestSpec};
use crate::config::Config;
use crate::session::SessionStore;
use crate::ui::Interaction;

/// Client for the appointment API.
///
/// Owns the HTTP client plus the session-store and interaction
/// capabilities; everything else is per-call state.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    ui: Arc<dyn Interaction>,
}

impl ApiClient {
    /// Create a new client for the server named in `config`
    pub fn new(config: &Config, store: Arc<dyn SessionStore>, ui: Arc<dyn Interaction>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            store,
            ui,
        }
    }

    /// Perform one authenticated round trip against `path`.
    ///
    /// Resolves to the parsed JSON body on success. Resolves to `None`
    /// when a detected session expiry was handled: the user confirmed
    /// re-authentication, the credential was cleared, and the login page
    /// was opened. Any other failure surfaces as [`ApiError`].
    pub async fn request(&self, path: &str, spec: RequestSpec) -> ApiResult<Option<Value>> {
        match self.perform(path, &spec).await {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                if err.is_unauthorized()
                    && self
                        .ui
                        .confirm_reauth("Your session has expired. Log in again?")
                {
                    if let Err(e) = self.store.clear() {
                        tracing::warn!("Failed to clear stored credential: {}", e);
                    }
                    self.ui.goto_login();
                    return Ok(None);
                }
                Err(err)
            }
        }
    }

    /// Single round trip: merge headers, send, classify the outcome.
    async fn perform(&self, path: &str, spec: &RequestSpec) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.store.load();

        // Caller headers first, then the Authorization overlay, then the
        // Content-Type default for body-bearing writes. Caller entries are
        // never removed.
        let mut headers = spec.headers.clone();
        if let Some(token) = &token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        if spec.method.is_write()
            && !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type"))
        {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        debug!(
            "API call: {} {} (auth: {}) body: {:?}",
            spec.method.as_str(),
            url,
            if token.is_some() { "Bearer ***" } else { "none" },
            spec.body
        );

        let mut request = self.http.request(spec.method.into(), url.as_str());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API error: status {} body: {}", status, body);

            let message = compose_error_message(status.as_u16(), &body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
                body,
            });
        }

        let value: Value = serde_json::from_str(&response.text().await?)?;
        debug!("API success: {}", value);
        Ok(value)
    }

    /// Confirm an appointment and notify accepted participants.
    pub async fn confirm_appointment(&self, appointment_id: i64) -> ApiResult<Option<Value>> {
        let path = format!("/api/appointments/{}/confirm", appointment_id);
        self.request(&path, RequestSpec::post()).await
    }

    /// Fetch the participation status of an appointment.
    pub async fn get_participants(&self, appointment_id: i64) -> ApiResult<Option<Value>> {
        let path = format!("/api/appointments/{}/participants", appointment_id);
        self.request(&path, RequestSpec::get()).await
    }

    /// Resend failed notifications to the given participants.
    pub async fn resend_notifications(
        &self,
        appointment_id: i64,
        participant_ids: &[i64],
    ) -> ApiResult<Option<Value>> {
        let path = format!("/api/appointments/{}/notify/resend", appointment_id);
        let body = serde_json::to_string(participant_ids)?;
        self.request(&path, RequestSpec::post().with_body(body)).await
    }

    /// Cancel an appointment, with an optional reason forwarded in the
    /// cancellation notice.
    pub async fn cancel_appointment(
        &self,
        appointment_id: i64,
        cancel_reason: Option<&str>,
    ) -> ApiResult<Option<Value>> {
        let mut path = format!("/api/appointments/{}/cancel", appointment_id);
        if let Some(reason) = cancel_reason.filter(|r| !r.is_empty()) {
            path.push_str("?cancelReason=");
            path.push_str(&urlencoding::encode(reason));
        }
        self.request(&path, RequestSpec::post()).await
    }

    /// Accept or decline an invitation to an appointment.
    pub async fn respond_to_invitation(
        &self,
        appointment_id: i64,
        accept: bool,
    ) -> ApiResult<Option<Value>> {
        let path = format!("/api/appointments/{}/respond", appointment_id);
        let body = serde_json::to_string(&serde_json::json!({ "accept": accept }))?;
        self.request(&path, RequestSpec::post().with_body(body)).await
    }

    /// Whether a credential is currently stored
    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    /// The stored credential, for diagnostics
    pub fn token(&self) -> Option<String> {
        self.store.load()
    }

    /// Delete the stored credential and send the user to the login page.
    /// Unlike the expiry path in [`ApiClient::request`], this never prompts.
    pub fn logout(&self) -> anyhow::Result<()> {
        self.store.clear()?;
        self.ui.goto_login();
        Ok(())
    }
}

/// Build the `HTTP <status>` message, enriched from the body: `message`
/// and `error` fields when the body parses as JSON, otherwise the first
/// 100 characters of the raw text.
fn compose_error_message(status: u16, body: &str) -> String {
    let mut message = format!("HTTP {}", status);

    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            if let Some(msg) = json.get("message").and_then(Value::as_str) {
                message.push_str(": ");
                message.push_str(msg);
            }
            if let Some(err) = json.get("error").and_then(Value::as_str) {
                message.push_str(&format!(" ({})", err));
            }
        }
        Err(_) => {
            if !body.is_empty() {
                message.push_str(": ");
                message.extend(body.chars().take(100));
            }
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use mockito::Matcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Interaction double with a scripted confirm answer
    struct ScriptedUi {
        answer: bool,
        prompts: AtomicUsize,
        navigations: AtomicUsize,
    }

    impl ScriptedUi {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                prompts: AtomicUsize::new(0),
                navigations: AtomicUsize::new(0),
            }
        }
    }

    impl Interaction for ScriptedUi {
        fn confirm_reauth(&self, _prompt: &str) -> bool {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.answer
        }

        fn goto_login(&self) {
            self.navigations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn client_for(
        server: &mockito::Server,
        token: Option<&str>,
        answer: bool,
    ) -> (ApiClient, Arc<MemorySessionStore>, Arc<ScriptedUi>) {
        let store = Arc::new(MemorySessionStore::default());
        if let Some(token) = token {
            store.save(token).unwrap();
        }
        let ui = Arc::new(ScriptedUi::new(answer));

        let config = Config {
            base_url: server.url(),
            timeout: Duration::from_secs(5),
        };
        let client = ApiClient::new(&config, store.clone(), ui.clone());
        (client, store, ui)
    }

    #[tokio::test]
    async fn bearer_header_attached_when_token_stored() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/appointments/7/participants")
            .match_header("authorization", "Bearer sekrit")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("sekrit"), false);
        let result = client.get_participants(7).await.unwrap();

        assert_eq!(result, Some(serde_json::json!({"ok": true})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_authorization_header_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/appointments/7/participants")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, None, false);
        client.get_participants(7).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn content_type_defaults_for_writes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/appointments/3/confirm")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        client.confirm_appointment(3).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn caller_content_type_is_preserved() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header("content-type", "text/plain")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, None, false);
        let spec = RequestSpec::post()
            .with_header("Content-Type", "text/plain")
            .with_body("hello");
        client.request("/upload", spec).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn json_error_body_composes_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/appointments/3/confirm")
            .with_status(400)
            .with_body(r#"{"message":"bad input","error":"E1"}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        let err = client.confirm_appointment(3).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP 400: bad input (E1)");
        match err {
            ApiError::Status { status, .. } => assert_eq!(status, 400),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_error_body_composes_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/appointments/7/participants")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        let err = client.get_participants(7).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP 500: oops");
    }

    #[tokio::test]
    async fn declined_reauth_rethrows_original_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/appointments/7/participants")
            .with_status(401)
            .with_body(r#"{"message":"Unauthorized"}"#)
            .create_async()
            .await;

        let (client, store, ui) = client_for(&server, Some("tok"), false);
        let err = client.get_participants(7).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        assert_eq!(ui.prompts.load(Ordering::SeqCst), 1);
        // Declined: nothing cleared, nobody redirected
        assert_eq!(store.load().as_deref(), Some("tok"));
        assert_eq!(ui.navigations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn confirmed_reauth_clears_token_and_redirects() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/appointments/7/participants")
            .with_status(401)
            .with_body(r#"{"message":"Unauthorized"}"#)
            .create_async()
            .await;

        let (client, store, ui) = client_for(&server, Some("tok"), true);
        let result = client.get_participants(7).await.unwrap();

        assert_eq!(result, None);
        assert!(store.load().is_none());
        assert_eq!(ui.navigations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_401_errors_do_not_prompt() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/appointments/7/participants")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let (client, _, ui) = client_for(&server, Some("tok"), true);
        client.get_participants(7).await.unwrap_err();

        assert_eq!(ui.prompts.load(Ordering::SeqCst), 0);
        assert_eq!(ui.navigations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_reason_is_urlencoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/appointments/5/cancel")
            .match_query(Matcher::UrlEncoded(
                "cancelReason".into(),
                "no longer needed".into(),
            ))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        client
            .cancel_appointment(5, Some("no longer needed"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn resend_sends_participant_id_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/appointments/9/notify/resend")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!([2, 5, 8])))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        client.resend_notifications(9, &[2, 5, 8]).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn respond_sends_accept_flag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/appointments/4/respond")
            .match_body(Matcher::Json(serde_json::json!({"accept": false})))
            .with_status(200)
            .with_body(r#"{"success":true,"accepted":false}"#)
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        client.respond_to_invitation(4, false).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/appointments/7/participants")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let (client, _, _) = client_for(&server, Some("tok"), false);
        let err = client.get_participants(7).await.unwrap_err();

        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn logout_clears_token_and_redirects_without_prompt() {
        let server = mockito::Server::new_async().await;
        let (client, store, ui) = client_for(&server, Some("tok"), false);

        assert!(client.is_logged_in());
        client.logout().unwrap();

        assert!(!client.is_logged_in());
        assert!(store.load().is_none());
        assert_eq!(ui.prompts.load(Ordering::SeqCst), 0);
        assert_eq!(ui.navigations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_message_without_known_fields_stays_bare() {
        assert_eq!(
            compose_error_message(404, r#"{"detail":"nope"}"#),
            "HTTP 404"
        );
        assert_eq!(compose_error_message(502, ""), "HTTP 502");
    }

    #[test]
    fn long_plain_bodies_are_truncated() {
        let body = "x".repeat(250);
        let message = compose_error_message(500, &body);
        assert_eq!(message, format!("HTTP 500: {}", "x".repeat(100)));
    }
}
