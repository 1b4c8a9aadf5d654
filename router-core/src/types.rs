//! Decoded update model: user, chat, message, callback query, inline query.
//!
//! These mirror the already-parsed webhook payload; every routing-relevant
//! field is optional where the platform makes it optional. The router never
//! parses raw bytes itself beyond `serde_json` decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::callback::CallbackIdentifier;
use crate::command::Command;

/// User identity attached to messages and queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat kind tag. Commands are gated on this (see [`Command::allows_chat`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

/// Chat identity (id plus kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatType,
}

/// A single incoming message. Routing reads `text`, falling back to `caption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub date: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub caption: Option<String>,
}

/// A callback query carrying the wire-encoded callback data string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// An inline query with its free-form query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
    #[serde(default)]
    pub offset: String,
}

/// One incoming event. Exactly one of the optional fields is expected to be
/// set; an update with none of them is routed through the catch-all path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub inline_query: Option<InlineQuery>,
    /// Per-dispatch routing tags; never part of the wire payload.
    #[serde(skip)]
    pub tags: RouteTags,
}

impl Update {
    /// Builds an update holding only a message (mainly for tests and examples).
    pub fn from_message(update_id: i64, message: Message) -> Self {
        Self {
            update_id,
            message: Some(message),
            callback_query: None,
            inline_query: None,
            tags: RouteTags::default(),
        }
    }
}

/// Which route family handled the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Command,
    Text,
    Callback,
    Inline,
}

/// Tags the router attaches to its per-call copy of the update so handlers and
/// middlewares can see how the update was classified.
#[derive(Debug, Clone, Default)]
pub struct RouteTags {
    pub route_type: Option<RouteType>,
    pub issued_user: Option<User>,
    /// The matched command, on the command route path.
    pub command: Option<Command>,
    /// The matched identifier, on the callback route path.
    pub callback_identifier: Option<CallbackIdentifier>,
}
