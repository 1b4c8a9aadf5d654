//! # Route chain
//!
//! Runs an ordered list of middlewares around a terminal handler with
//! continuation semantics: each middleware receives the rest of the chain as
//! a [`Next`] value and either awaits it (pass-through, possibly with a
//! modified update) or returns a [`WebhookResponse`] directly, short-circuiting
//! everything behind it. A handler returning `None` is normalized to the
//! empty response.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use router_core::{Result, RouteParams, Update, WebhookResponse};
use tracing::{debug, trace};

/// Interceptor around the rest of a route chain.
///
/// The `next` parameter is the only way to reach the remaining middlewares
/// and the terminal handler, so an implementation must either consume it or
/// produce a response of its own; there is no third outcome.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(
        &self,
        update: Update,
        params: RouteParams,
        next: Next,
    ) -> Result<WebhookResponse>;
}

/// Terminal handler of a route. `Ok(None)` answers the webhook with nothing.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, update: Update, params: RouteParams)
        -> Result<Option<WebhookResponse>>;
}

/// The rest of a chain: remaining middlewares plus the terminal handler.
///
/// Consumed by [`Next::run`]; a middleware that wants to rewrite the update
/// simply passes the modified value on.
pub struct Next {
    middlewares: VecDeque<Arc<dyn Middleware>>,
    handler: Arc<dyn RouteHandler>,
    params: RouteParams,
}

impl Next {
    /// Runs the next middleware, or the terminal handler once the list is
    /// exhausted.
    pub async fn run(mut self, update: Update) -> Result<WebhookResponse> {
        match self.middlewares.pop_front() {
            Some(middleware) => {
                trace!(
                    middleware = std::any::type_name_of_val(middleware.as_ref()),
                    remaining = self.middlewares.len(),
                    "step: middleware"
                );
                let params = self.params.clone();
                middleware.handle(update, params, self).await
            }
            None => {
                trace!(
                    handler = std::any::type_name_of_val(self.handler.as_ref()),
                    "step: terminal handler"
                );
                let response = self.handler.handle(update, self.params).await?;
                Ok(response.unwrap_or_default())
            }
        }
    }
}

/// Entry point: drives `middlewares` left to right around `handler`.
pub struct RouteChain;

impl RouteChain {
    pub async fn run(
        update: Update,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
        params: RouteParams,
    ) -> Result<WebhookResponse> {
        debug!(
            update_id = update.update_id,
            middleware_count = middlewares.len(),
            "step: route chain started"
        );

        let next = Next {
            middlewares: middlewares.into(),
            handler,
            params,
        };
        let response = next.run(update).await?;

        debug!(
            empty = response.is_empty(),
            method = response.method().unwrap_or(""),
            "step: route chain finished"
        );
        Ok(response)
    }
}
