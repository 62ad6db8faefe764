//! The bot-side collaborator that acts on received votes.
//!
//! The webhook server never constructs a handler itself; the embedding
//! application injects one (or none) when building the server.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::anyhow;
use async_trait::async_trait;
use futures::FutureExt;

/// Capability to act on a vote, e.g. granting a reward to the voter.
#[async_trait]
pub trait VoteHandler: Send + Sync {
    /// Handle a vote from `user_id` (`None` when the payload had no user).
    async fn handle_vote(&self, user_id: Option<String>) -> anyhow::Result<()>;
}

/// Invoke `handler`, turning a panic inside it into an ordinary error.
pub(crate) async fn dispatch_vote(
    handler: &dyn VoteHandler,
    user_id: Option<String>,
) -> anyhow::Result<()> {
    match AssertUnwindSafe(handler.handle_vote(user_id))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("vote handler panicked: {}", panic_message(&*payload))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
