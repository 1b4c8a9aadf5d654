//! Webhook responses.
//!
//! A [`WebhookResponse`] is the terminal value of every dispatch: an optional
//! API method name plus a data map. Serialization folds the method into the
//! data as a `"method"` field, which is the shape the platform accepts as a
//! direct webhook answer. [`Reply`] and [`CallbackAnswer`] build the two most
//! common responses.

use serde_json::{json, Map, Value};

use crate::types::{CallbackQuery, Message};

/// Terminal value produced by a handler or a short-circuiting middleware.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookResponse {
    method: Option<String>,
    data: Map<String, Value>,
}

impl WebhookResponse {
    /// The response that answers the webhook with nothing. Default routes
    /// returning this fall through to the next default route.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(method: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            method: Some(method.into()),
            data,
        }
    }

    /// True when no method is set; serializes to `{}`.
    pub fn is_empty(&self) -> bool {
        self.method.as_deref().unwrap_or("").is_empty()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Data map with the method folded in as `"method"`.
    pub fn to_value(&self) -> Value {
        match &self.method {
            Some(method) if !method.is_empty() => {
                let mut data = self.data.clone();
                data.insert("method".to_string(), json!(method));
                Value::Object(data)
            }
            _ => json!({}),
        }
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Builder for a `sendMessage` response addressed at a message's chat.
///
/// Replies reference the original message by default; see
/// [`Reply::without_reference`].
#[derive(Debug, Clone)]
pub struct Reply {
    chat_id: i64,
    text: String,
    reply_to_message_id: Option<i64>,
    parse_mode: Option<String>,
    allow_sending_without_reply: bool,
    disable_web_page_preview: bool,
    disable_notification: bool,
    extra: Map<String, Value>,
}

impl Reply {
    pub fn to(message: &Message, text: impl Into<String>) -> Self {
        Self {
            chat_id: message.chat.id,
            text: text.into(),
            reply_to_message_id: Some(message.message_id),
            parse_mode: None,
            allow_sending_without_reply: true,
            disable_web_page_preview: true,
            disable_notification: false,
            extra: Map::new(),
        }
    }

    /// Sends into the chat without referencing the original message.
    pub fn without_reference(mut self) -> Self {
        self.reply_to_message_id = None;
        self
    }

    pub fn parse_mode(mut self, mode: impl Into<String>) -> Self {
        self.parse_mode = Some(mode.into());
        self
    }

    pub fn silent(mut self) -> Self {
        self.disable_notification = true;
        self
    }

    pub fn with_web_page_preview(mut self) -> Self {
        self.disable_web_page_preview = false;
        self
    }

    /// Adds an arbitrary field to the `sendMessage` payload; overrides the
    /// builder-set fields on key collision.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn into_response(self) -> WebhookResponse {
        let mut data = Map::new();
        data.insert("chat_id".to_string(), json!(self.chat_id));
        data.insert("text".to_string(), json!(self.text));
        data.insert(
            "allow_sending_without_reply".to_string(),
            json!(self.allow_sending_without_reply),
        );
        data.insert(
            "disable_web_page_preview".to_string(),
            json!(self.disable_web_page_preview),
        );
        data.insert(
            "disable_notification".to_string(),
            json!(self.disable_notification),
        );
        if let Some(message_id) = self.reply_to_message_id {
            data.insert("reply_to_message_id".to_string(), json!(message_id));
        }
        if let Some(mode) = self.parse_mode {
            data.insert("parse_mode".to_string(), json!(mode));
        }
        data.extend(self.extra);

        WebhookResponse::new("sendMessage", data)
    }
}

impl From<Reply> for WebhookResponse {
    fn from(reply: Reply) -> Self {
        reply.into_response()
    }
}

/// Builder for an `answerCallbackQuery` response.
#[derive(Debug, Clone)]
pub struct CallbackAnswer {
    callback_query_id: String,
    text: Option<String>,
    show_alert: bool,
    url: Option<String>,
    cache_time: u32,
}

impl CallbackAnswer {
    pub fn to(query: &CallbackQuery) -> Self {
        Self {
            callback_query_id: query.id.clone(),
            text: None,
            show_alert: false,
            url: None,
            cache_time: 0,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn show_alert(mut self) -> Self {
        self.show_alert = true;
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn cache_time(mut self, seconds: u32) -> Self {
        self.cache_time = seconds;
        self
    }

    pub fn into_response(self) -> WebhookResponse {
        let mut data = Map::new();
        data.insert(
            "callback_query_id".to_string(),
            json!(self.callback_query_id),
        );
        if let Some(text) = self.text {
            data.insert("text".to_string(), json!(text));
        }
        if self.show_alert {
            data.insert("show_alert".to_string(), json!(true));
        }
        if let Some(url) = self.url {
            data.insert("url".to_string(), json!(url));
        }
        if self.cache_time > 0 {
            data.insert("cache_time".to_string(), json!(self.cache_time));
        }

        WebhookResponse::new("answerCallbackQuery", data)
    }
}

impl From<CallbackAnswer> for WebhookResponse {
    fn from(answer: CallbackAnswer) -> Self {
        answer.into_response()
    }
}
