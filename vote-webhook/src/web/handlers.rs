//! Webhook endpoint handlers.
//!
//! Malformed vote bodies and bot-side failures are logged and swallowed; a
//! well-formed JSON body that is not an object is a 500.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, error, info, warn};

use crate::bot::{dispatch_vote, VoteHandler};
use crate::vote::{VoteEvent, VoteParseError};
use crate::web::auth::{verify_authorization, AuthOutcome};
use crate::web::INTERNAL_SERVER_ERROR;
use crate::Config;

pub const VOTE_RECEIVED: &str = "Vote received";
pub const FORBIDDEN: &str = "Forbidden";
pub const SUPPORTER_CHECKED: &str = "Supporter status checked";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub bot: Option<Arc<dyn VoteHandler>>,
}

impl AppState {
    pub fn new(config: Config, bot: Option<Arc<dyn VoteHandler>>) -> Self {
        Self {
            config: Arc::new(config),
            bot,
        }
    }
}

// =============================================================================
// Vote Webhook
// =============================================================================

/// Vote webhook endpoint (`POST /`).
///
/// 1. Checks the `Authorization` header against the shared secret
/// 2. Parses the body leniently into a [`VoteEvent`], ignoring `Content-Type`
/// 3. Hands the voter to the bot, if one is attached
/// 4. Returns 200 whatever the bot made of it
pub async fn receive_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    match verify_authorization(&headers, &state.config.verify_secret) {
        AuthOutcome::Valid => {}
        AuthOutcome::Missing => {
            warn!("vote_webhook_auth_missing");
            return (StatusCode::FORBIDDEN, FORBIDDEN);
        }
        AuthOutcome::Invalid => {
            warn!("vote_webhook_auth_invalid");
            return (StatusCode::FORBIDDEN, FORBIDDEN);
        }
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap_or("<non-utf8>"));

    let parsed = body
        .map_err(|e| VoteParseError::Read(e.body_text()))
        .and_then(|bytes| VoteEvent::parse(&bytes));

    let event = match parsed {
        Ok(event) => event,
        Err(e) if e.is_malformed() => {
            error!(error = %e, content_type = ?content_type, "vote_payload_parse_failed");
            VoteEvent::default()
        }
        Err(e) => {
            error!(error = %e, content_type = ?content_type, "vote_payload_unusable");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR);
        }
    };

    let user = &event.user;
    info!(user = ?user, "vote_received");

    match &state.bot {
        Some(bot) => match dispatch_vote(bot.as_ref(), user.clone()).await {
            Ok(()) => info!(user = ?user, "vote_reward_handled"),
            Err(e) => error!(user = ?user, error = %e, "vote_handler_failed"),
        },
        None => debug!(user = ?user, "vote_handler_not_configured"),
    }

    (StatusCode::OK, VOTE_RECEIVED)
}

// =============================================================================
// Supporter Check
// =============================================================================

/// Supporter status endpoint (`GET`/`POST /supporter`). No auth, no body.
pub async fn check_supporter() -> impl IntoResponse {
    info!("supporter_status_checked");
    (StatusCode::OK, SUPPORTER_CHECKED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use tower::ServiceExt;

    use crate::web::router;

    const SECRET: &str = "s3cret";

    #[derive(Default)]
    struct RecordingBot {
        votes: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl VoteHandler for RecordingBot {
        async fn handle_vote(&self, user_id: Option<String>) -> anyhow::Result<()> {
            self.votes.lock().unwrap().push(user_id);
            Ok(())
        }
    }

    struct FailingBot;

    #[async_trait]
    impl VoteHandler for FailingBot {
        async fn handle_vote(&self, _user_id: Option<String>) -> anyhow::Result<()> {
            anyhow::bail!("reward service unreachable")
        }
    }

    struct PanickingBot;

    #[async_trait]
    impl VoteHandler for PanickingBot {
        async fn handle_vote(&self, _user_id: Option<String>) -> anyhow::Result<()> {
            panic!("reward table missing");
        }
    }

    fn app(bot: Option<Arc<dyn VoteHandler>>) -> Router {
        router(AppState::new(Config::new(SECRET, 0), bot))
    }

    fn vote_request(auth: Option<&str>, content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_vote_with_valid_secret_invokes_bot() {
        let bot = Arc::new(RecordingBot::default());
        let request = vote_request(Some(SECRET), Some("application/json"), r#"{"user": "42"}"#);

        let (status, body) = send(app(Some(bot.clone())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Vote received");
        assert_eq!(*bot.votes.lock().unwrap(), vec![Some("42".to_string())]);
    }

    #[tokio::test]
    async fn test_vote_with_wrong_secret_is_forbidden() {
        let bot = Arc::new(RecordingBot::default());
        let request = vote_request(Some("wrong"), Some("application/json"), r#"{"user": "42"}"#);

        let (status, body) = send(app(Some(bot.clone())), request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden");
        assert!(bot.votes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vote_without_auth_header_is_forbidden() {
        let bot = Arc::new(RecordingBot::default());
        let request = vote_request(None, Some("application/json"), r#"{"user": "42"}"#);

        let (status, body) = send(app(Some(bot.clone())), request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden");
        assert!(bot.votes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_regardless_of_body() {
        for body in ["", "not json", r#"{"user": "1"}"#, "[]"] {
            let (status, text) = send(app(None), vote_request(Some("nope"), None, body)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(text, "Forbidden");
        }
    }

    #[tokio::test]
    async fn test_vote_without_bot() {
        let request = vote_request(Some(SECRET), Some("application/json"), r#"{"user": "7"}"#);

        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Vote received");
    }

    #[tokio::test]
    async fn test_malformed_body_still_accepted() {
        let bot = Arc::new(RecordingBot::default());

        let cases = [
            (Some("application/json"), "{not json"),
            (Some("application/json"), ""),
            (Some("text/plain"), "user=42"),
            (None, "   "),
        ];
        for (content_type, body) in cases {
            let request = vote_request(Some(SECRET), content_type, body);
            let (status, text) = send(app(Some(bot.clone())), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(text, "Vote received");
        }

        // Every unparseable body reaches the bot as an anonymous vote.
        assert_eq!(*bot.votes.lock().unwrap(), vec![None, None, None, None]);
    }

    #[tokio::test]
    async fn test_json_body_parsed_whatever_the_content_type() {
        let bot = Arc::new(RecordingBot::default());

        for content_type in [Some("text/plain"), Some("application/x-www-form-urlencoded"), None] {
            let request = vote_request(Some(SECRET), content_type, r#"{"user": "42"}"#);
            let (status, body) = send(app(Some(bot.clone())), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "Vote received");
        }

        assert_eq!(
            *bot.votes.lock().unwrap(),
            vec![Some("42".to_string()); 3]
        );
    }

    #[tokio::test]
    async fn test_non_object_json_is_internal_error() {
        let bot = Arc::new(RecordingBot::default());

        for body in ["[1, 2, 3]", "null", "42", r#""42""#] {
            let request = vote_request(Some(SECRET), Some("application/json"), body);
            let (status, text) = send(app(Some(bot.clone())), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(text, "Internal Server Error");
        }

        assert!(bot.votes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vote_without_user_field() {
        let bot = Arc::new(RecordingBot::default());
        let request = vote_request(Some(SECRET), Some("application/json"), r#"{"type": "test"}"#);

        let (status, _) = send(app(Some(bot.clone())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(*bot.votes.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_bot_failure_does_not_change_response() {
        let request = vote_request(Some(SECRET), Some("application/json"), r#"{"user": "42"}"#);
        let (status, body) = send(app(Some(Arc::new(FailingBot))), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Vote received");

        let request = vote_request(Some(SECRET), Some("application/json"), r#"{"user": "42"}"#);
        let (status, body) = send(app(Some(Arc::new(PanickingBot))), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Vote received");
    }

    #[tokio::test]
    async fn test_supporter_get_and_post() {
        for method in [Method::GET, Method::POST] {
            let request = Request::builder()
                .method(method)
                .uri("/supporter")
                .header("authorization", "whatever")
                .body(Body::from("ignored"))
                .unwrap();

            let (status, body) = send(app(None), request).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "Supporter status checked");
        }
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(None), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/votes")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(None), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
