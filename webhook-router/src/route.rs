//! Route descriptor: a terminal handler plus its registered middlewares.

use std::sync::Arc;

use route_chain::{Middleware, RouteChain, RouteHandler};
use router_core::{Result, RouteParams, Update, WebhookResponse};

/// A registered route: handler plus the middlewares given at registration.
///
/// The registered middleware list is immutable; the router passes the
/// surrounding buckets per call and [`StandardRoute::call`] builds a fresh
/// combined list every time, so repeated dispatches never accumulate
/// duplicates.
#[derive(Clone)]
pub struct StandardRoute {
    handler: Arc<dyn RouteHandler>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl StandardRoute {
    pub fn new(handler: Arc<dyn RouteHandler>, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            handler,
            middlewares,
        }
    }

    /// Runs the chain `prepend ++ own middlewares ++ append` around the
    /// handler.
    pub async fn call(
        &self,
        update: Update,
        params: RouteParams,
        prepend: &[Arc<dyn Middleware>],
        append: &[Arc<dyn Middleware>],
    ) -> Result<WebhookResponse> {
        let mut chain =
            Vec::with_capacity(prepend.len() + self.middlewares.len() + append.len());
        chain.extend(prepend.iter().cloned());
        chain.extend(self.middlewares.iter().cloned());
        chain.extend(append.iter().cloned());

        RouteChain::run(update, Arc::clone(&self.handler), chain, params).await
    }
}
