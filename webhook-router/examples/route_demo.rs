//! End-to-end registration and dispatch walkthrough: commands, a callback
//! route, text/inline routes with defaults, and a global logging middleware.
//!
//! Run with `cargo run --example route_demo`; set RUST_LOG=debug to watch
//! the dispatch steps. Log output is teed to `route_demo.log`.

use std::sync::Arc;

use async_trait::async_trait;
use router_core::{
    CallbackAnswer, CallbackIdentifier, Command, Reply, Result, RouteParams, Update,
    WebhookResponse,
};
use serde_json::json;
use webhook_router::{Middleware, Next, RouteHandler, Router};

struct HelpHandler;

#[async_trait]
impl RouteHandler for HelpHandler {
    async fn handle(
        &self,
        update: Update,
        _params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        let message = update.message.as_ref().expect("message dispatch");
        Ok(Some(
            Reply::to(message, "Available commands: /help, /echo <text>").into_response(),
        ))
    }
}

struct EchoHandler;

#[async_trait]
impl RouteHandler for EchoHandler {
    async fn handle(
        &self,
        update: Update,
        params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        let message = update.message.as_ref().expect("message dispatch");
        let text = params.args().join(" ");
        Ok(Some(Reply::to(message, text).into_response()))
    }
}

struct VoteHandler;

#[async_trait]
impl RouteHandler for VoteHandler {
    async fn handle(
        &self,
        update: Update,
        params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        let query = update.callback_query.as_ref().expect("callback dispatch");
        let choice = params.get("choice").unwrap_or("?");
        Ok(Some(
            CallbackAnswer::to(query)
                .text(format!("You voted: {choice}"))
                .into_response(),
        ))
    }
}

struct SilentHandler;

#[async_trait]
impl RouteHandler for SilentHandler {
    async fn handle(
        &self,
        _update: Update,
        _params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        Ok(None)
    }
}

struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        update: Update,
        _params: RouteParams,
        next: Next,
    ) -> Result<WebhookResponse> {
        tracing::info!(
            update_id = update.update_id,
            route_type = ?update.tags.route_type,
            "dispatching update"
        );
        next.run(update).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    router_core::init_tracing("route_demo.log")?;

    let mut router = Router::new(1145141919, "@ExampleBot");

    router.command(Command::new("help")?, Arc::new(HelpHandler), Vec::new())?;
    router.command_aliases(
        vec![Command::new("echo")?, Command::new("say")?],
        Arc::new(EchoHandler),
        Vec::new(),
    )?;
    router.callback(
        CallbackIdentifier::new("vote"),
        Arc::new(VoteHandler),
        Vec::new(),
    );
    router.text(r"^https?://example\.com", Arc::new(HelpHandler), Vec::new())?;
    router.text_default(Arc::new(SilentHandler), Vec::new());
    router.add_global_middlewares(vec![Arc::new(LoggingMiddleware)]);

    let body = json!({
        "update_id": 1,
        "message": {
            "message_id": 100,
            "from": {"id": 42, "is_bot": false, "username": "alice"},
            "chat": {"id": 42, "type": "private"},
            "date": 1700000000,
            "text": "/echo hello world"
        }
    })
    .to_string();

    let response = router.route_body(body.as_bytes()).await?;
    tracing::info!(answer = %response.to_json(), "webhook answered");

    Ok(())
}
