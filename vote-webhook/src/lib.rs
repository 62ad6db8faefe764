//! Votehook - thin async receiver for bot vote webhooks.
//!
//! Vote providers call `POST /` with a shared secret in the `Authorization`
//! header; accepted votes are handed to an optional [`VoteHandler`] supplied
//! by the embedding bot.
//!
//! ## Flow
//!
//! ```text
//! Vote provider → POST / → auth → VoteEvent → VoteHandler (optional) → 200
//! ```
//!
//! ## Embedding
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use votehook::{Config, VoteHandler, WebhookServer};
//!
//! struct RewardBot;
//!
//! #[async_trait]
//! impl VoteHandler for RewardBot {
//!     async fn handle_vote(&self, user_id: Option<String>) -> anyhow::Result<()> {
//!         println!("thanks for voting, {user_id:?}");
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! WebhookServer::new(config)
//!     .with_vote_handler(Arc::new(RewardBot))
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod server;
pub mod vote;
pub mod web;

// Re-export commonly used types
pub use bot::VoteHandler;
pub use config::Config;
pub use error::{ConfigError, ServerError};
pub use server::{BoundServer, WebhookServer};
pub use vote::{VoteEvent, VoteParseError};
pub use web::AppState;
