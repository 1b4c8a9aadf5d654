//! # router-core
//!
//! Core types for the webhook router: the decoded [`Update`] model, [`Command`]
//! definitions, callback-data encoding, [`WebhookResponse`] and its convenience
//! constructors, route parameters, error types, and tracing initialization.
//! Transport-agnostic; used by route-chain and webhook-router.

pub mod callback;
pub mod command;
pub mod error;
pub mod logger;
pub mod params;
pub mod response;
pub mod types;

pub use callback::{CallbackData, CallbackIdentifier};
pub use command::Command;
pub use error::{Result, RouterError};
pub use logger::init_tracing;
pub use params::RouteParams;
pub use response::{CallbackAnswer, Reply, WebhookResponse};
pub use types::{
    CallbackQuery, Chat, ChatType, InlineQuery, Message, RouteTags, RouteType, Update, User,
};
