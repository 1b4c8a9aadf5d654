//! Integration tests for [`route_chain::RouteChain`].
//!
//! Covers: left-to-right middleware order, short-circuit skipping the rest of
//! the chain, update rewriting through the continuation, handler `None`
//! normalization, and error propagation out of a middleware.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use route_chain::{Middleware, Next, RouteChain, RouteHandler};
use router_core::{
    Chat, ChatType, Message, Result, RouteParams, Update, User, WebhookResponse,
};
use serde_json::json;

fn create_test_update(text: &str) -> Update {
    Update::from_message(
        1,
        Message {
            message_id: 10,
            from: Some(User {
                id: 123,
                is_bot: false,
                username: Some("test_user".to_string()),
                first_name: Some("Test".to_string()),
                last_name: None,
            }),
            chat: Chat {
                id: 456,
                kind: ChatType::Private,
            },
            date: None,
            text: Some(text.to_string()),
            caption: None,
        },
    )
}

fn non_empty_response(text: &str) -> WebhookResponse {
    let mut data = serde_json::Map::new();
    data.insert("text".to_string(), json!(text));
    WebhookResponse::new("sendMessage", data)
}

struct OrderMiddleware {
    name: String,
    order: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Middleware for OrderMiddleware {
    async fn handle(
        &self,
        update: Update,
        _params: RouteParams,
        next: Next,
    ) -> Result<WebhookResponse> {
        self.order.lock().unwrap().push(format!("enter_{}", self.name));
        let response = next.run(update).await?;
        self.order.lock().unwrap().push(format!("leave_{}", self.name));
        Ok(response)
    }
}

struct ShortCircuitMiddleware;

#[async_trait]
impl Middleware for ShortCircuitMiddleware {
    async fn handle(
        &self,
        _update: Update,
        _params: RouteParams,
        _next: Next,
    ) -> Result<WebhookResponse> {
        Ok(non_empty_response("intercepted"))
    }
}

struct CountingHandler {
    count: Arc<AtomicUsize>,
    response: Option<WebhookResponse>,
}

#[async_trait]
impl RouteHandler for CountingHandler {
    async fn handle(
        &self,
        _update: Update,
        _params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// **Test: Middlewares wrap the handler in registration order.**
///
/// **Setup:** Two order-recording middlewares and a counting handler.
/// **Action:** `RouteChain::run`.
/// **Expected:** enter_first, enter_second, then unwinding leave_second,
/// leave_first; handler ran once.
#[tokio::test]
async fn test_middlewares_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let count = Arc::new(AtomicUsize::new(0));

    let middlewares: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(OrderMiddleware {
            name: "first".to_string(),
            order: order.clone(),
        }),
        Arc::new(OrderMiddleware {
            name: "second".to_string(),
            order: order.clone(),
        }),
    ];
    let handler = Arc::new(CountingHandler {
        count: count.clone(),
        response: None,
    });

    RouteChain::run(
        create_test_update("hello"),
        handler,
        middlewares,
        RouteParams::None,
    )
    .await
    .unwrap();

    assert_eq!(
        *order.lock().unwrap(),
        vec!["enter_first", "enter_second", "leave_second", "leave_first"]
    );
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// **Test: A short-circuiting middleware skips the rest of the chain.**
///
/// **Setup:** Short-circuit middleware followed by an order middleware and a
/// counting handler.
/// **Action:** `RouteChain::run`.
/// **Expected:** Response is the middleware's; second middleware and handler
/// never ran.
#[tokio::test]
async fn test_short_circuit_skips_remaining_chain() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let count = Arc::new(AtomicUsize::new(0));

    let middlewares: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(ShortCircuitMiddleware),
        Arc::new(OrderMiddleware {
            name: "after".to_string(),
            order: order.clone(),
        }),
    ];
    let handler = Arc::new(CountingHandler {
        count: count.clone(),
        response: None,
    });

    let response = RouteChain::run(
        create_test_update("hello"),
        handler,
        middlewares,
        RouteParams::None,
    )
    .await
    .unwrap();

    assert_eq!(response, non_empty_response("intercepted"));
    assert!(order.lock().unwrap().is_empty());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

/// **Test: A middleware can rewrite the update before passing it on.**
///
/// **Setup:** Middleware that replaces the message text; handler that echoes
/// the text it sees into the response.
/// **Action:** `RouteChain::run` with original text "before".
/// **Expected:** Handler observed "rewritten".
#[tokio::test]
async fn test_middleware_rewrites_update_for_the_rest_of_the_chain() {
    struct RewriteMiddleware;

    #[async_trait]
    impl Middleware for RewriteMiddleware {
        async fn handle(
            &self,
            mut update: Update,
            _params: RouteParams,
            next: Next,
        ) -> Result<WebhookResponse> {
            if let Some(message) = update.message.as_mut() {
                message.text = Some("rewritten".to_string());
            }
            next.run(update).await
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl RouteHandler for EchoHandler {
        async fn handle(
            &self,
            update: Update,
            _params: RouteParams,
        ) -> Result<Option<WebhookResponse>> {
            let text = update
                .message
                .and_then(|m| m.text)
                .unwrap_or_default();
            Ok(Some(non_empty_response(&text)))
        }
    }

    let response = RouteChain::run(
        create_test_update("before"),
        Arc::new(EchoHandler),
        vec![Arc::new(RewriteMiddleware)],
        RouteParams::None,
    )
    .await
    .unwrap();

    assert_eq!(response, non_empty_response("rewritten"));
}

/// **Test: Handler returning None yields the empty response.**
///
/// **Setup:** No middlewares; handler returns `Ok(None)`.
/// **Action:** `RouteChain::run`.
/// **Expected:** Response is empty and serializes to `{}`.
#[tokio::test]
async fn test_handler_none_normalizes_to_empty_response() {
    let count = Arc::new(AtomicUsize::new(0));
    let handler = Arc::new(CountingHandler {
        count: count.clone(),
        response: None,
    });

    let response = RouteChain::run(
        create_test_update("hello"),
        handler,
        Vec::new(),
        RouteParams::None,
    )
    .await
    .unwrap();

    assert!(response.is_empty());
    assert_eq!(response.to_json(), "{}");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// **Test: A failing middleware aborts the chain with its error.**
///
/// **Setup:** Middleware returning an error; counting handler behind it.
/// **Action:** `RouteChain::run`.
/// **Expected:** `Err`; handler never ran.
#[tokio::test]
async fn test_middleware_error_propagates() {
    struct FailingMiddleware;

    #[async_trait]
    impl Middleware for FailingMiddleware {
        async fn handle(
            &self,
            _update: Update,
            _params: RouteParams,
            _next: Next,
        ) -> Result<WebhookResponse> {
            Err(anyhow::anyhow!("denied").into())
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let handler = Arc::new(CountingHandler {
        count: count.clone(),
        response: None,
    });

    let result = RouteChain::run(
        create_test_update("hello"),
        handler,
        vec![Arc::new(FailingMiddleware)],
        RouteParams::None,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
