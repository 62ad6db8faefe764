//! Web server module for receiving vote webhooks.
//!
//! Routes:
//! - `POST /`: authenticated vote notifications
//! - `GET`/`POST /supporter`: unauthenticated acknowledgment probe
//!
//! A panic anywhere in request handling becomes a bare 500 response; the
//! details only go to the log.

pub mod auth;
pub mod handlers;

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::bot::panic_message;

pub use auth::{verify_authorization, AuthOutcome};
pub use handlers::{check_supporter, receive_vote, AppState};

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Build the webhook router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(receive_vote))
        .route("/supporter", get(check_supporter).post(check_supporter))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_message(&*payload), "request_handler_panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR).into_response()
}
