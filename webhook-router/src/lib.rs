//! # webhook-router
//!
//! Routes incoming webhook updates to registered handlers. An update is
//! classified by kind (message / callback query / inline query), matched
//! against the registered routes in registration order, and dispatched
//! through the middleware chain; unmatched updates end in the catch-all
//! path. Every dispatch terminates in a [`router_core::WebhookResponse`].

pub mod matcher;
pub mod route;
pub mod router;

pub use route::StandardRoute;
pub use router::Router;

pub use route_chain::{Middleware, Next, RouteChain, RouteHandler};
