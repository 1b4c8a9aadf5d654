//! The router: route table, middleware buckets and the dispatch state machine.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use route_chain::{Middleware, RouteHandler};
use router_core::{
    CallbackIdentifier, CallbackQuery, Command, InlineQuery, Message, Result, RouteParams,
    RouteTags, RouteType, RouterError, Update, WebhookResponse,
};
use tracing::{debug, info, trace};

use crate::matcher::{self, CompiledCommand};
use crate::route::StandardRoute;

/// Webhook bodies above this cap are rejected before JSON decoding.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Routes decoded updates to registered handlers.
///
/// Registration is append-only and expected to finish before dispatch starts;
/// `route()` only reads the table. Middleware arguments are typed
/// (`Arc<dyn Middleware>`), so an unrecognized middleware is a compile error
/// rather than a runtime validation failure.
pub struct Router {
    bot_user_id: i64,
    bot_username: String,
    command_routes: Vec<(CompiledCommand, StandardRoute)>,
    callback_routes: Vec<(CallbackIdentifier, StandardRoute)>,
    text_routes: Vec<(Regex, StandardRoute)>,
    text_default_routes: Vec<StandardRoute>,
    inline_routes: Vec<(Regex, StandardRoute)>,
    inline_default_routes: Vec<StandardRoute>,
    global_prepend: Vec<Arc<dyn Middleware>>,
    global_append: Vec<Arc<dyn Middleware>>,
    catchall_prepend: Vec<Arc<dyn Middleware>>,
    catchall_append: Vec<Arc<dyn Middleware>>,
}

impl Router {
    /// Creates a router for the given bot; a leading `@` on the username is
    /// stripped.
    pub fn new(bot_user_id: i64, bot_username: &str) -> Self {
        Self {
            bot_user_id,
            bot_username: bot_username.trim_start_matches('@').to_string(),
            command_routes: Vec::new(),
            callback_routes: Vec::new(),
            text_routes: Vec::new(),
            text_default_routes: Vec::new(),
            inline_routes: Vec::new(),
            inline_default_routes: Vec::new(),
            global_prepend: Vec::new(),
            global_append: Vec::new(),
            catchall_prepend: Vec::new(),
            catchall_append: Vec::new(),
        }
    }

    pub fn bot_user_id(&self) -> i64 {
        self.bot_user_id
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// Registers a command route.
    pub fn command(
        &mut self,
        command: Command,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<()> {
        self.command_aliases(vec![command], handler, middlewares)
    }

    /// Registers several command aliases sharing one handler and middleware
    /// list.
    pub fn command_aliases(
        &mut self,
        commands: Vec<Command>,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<()> {
        let route = StandardRoute::new(handler, middlewares);
        for command in commands {
            let compiled = CompiledCommand::compile(command, &self.bot_username)?;
            trace!(command = %compiled.command(), "registered command route");
            self.command_routes.push((compiled, route.clone()));
        }
        Ok(())
    }

    /// Registers a callback route for the given identifier.
    pub fn callback(
        &mut self,
        identifier: impl Into<CallbackIdentifier>,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) {
        self.callback_routes
            .push((identifier.into(), StandardRoute::new(handler, middlewares)));
    }

    /// Registers a text route matched by regex against the message text.
    pub fn text(
        &mut self,
        pattern: &str,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<()> {
        let regex = Regex::new(pattern)?;
        self.text_routes
            .push((regex, StandardRoute::new(handler, middlewares)));
        Ok(())
    }

    /// Registers a fallback text route, tried in registration order when no
    /// text route matched; an empty response falls through to the next one.
    pub fn text_default(
        &mut self,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) {
        self.text_default_routes
            .push(StandardRoute::new(handler, middlewares));
    }

    /// Registers an inline route matched by regex against the query text.
    pub fn inline(
        &mut self,
        pattern: &str,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<()> {
        let regex = Regex::new(pattern)?;
        self.inline_routes
            .push((regex, StandardRoute::new(handler, middlewares)));
        Ok(())
    }

    /// Registers a fallback inline route (same semantics as
    /// [`Router::text_default`]).
    pub fn inline_default(
        &mut self,
        handler: Arc<dyn RouteHandler>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) {
        self.inline_default_routes
            .push(StandardRoute::new(handler, middlewares));
    }

    /// Adds middlewares that run before every matched route's own list.
    pub fn add_global_middlewares(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.global_prepend.extend(middlewares);
    }

    /// Adds middlewares that run after every matched route's own list.
    pub fn append_global_middlewares(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.global_append.extend(middlewares);
    }

    /// Adds middlewares that wrap every dispatch, matched or not, at the
    /// outermost position.
    pub fn prepend_catchall_middlewares(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.catchall_prepend.extend(middlewares);
    }

    /// Adds middlewares that wrap every dispatch, matched or not, at the
    /// innermost-after position.
    pub fn append_catchall_middlewares(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.catchall_append.extend(middlewares);
    }

    /// Decodes a raw webhook body (capped at 1 MiB) and routes it.
    pub async fn route_body(&self, body: &[u8]) -> Result<WebhookResponse> {
        if body.len() > MAX_BODY_BYTES {
            return Err(RouterError::BodyTooLarge(body.len()));
        }
        let update: Update = serde_json::from_slice(body)?;
        self.route(update).await
    }

    /// Routes one update. Always yields a response; the worst case is the
    /// explicit empty response after the catch-all path.
    pub async fn route(&self, mut update: Update) -> Result<WebhookResponse> {
        // Tags are per-dispatch; never trust what came in on the update.
        update.tags = RouteTags::default();
        debug!(update_id = update.update_id, "step: routing update");

        if let Some(message) = update.message.clone() {
            self.dispatch_message(update, message).await
        } else if let Some(query) = update.callback_query.clone() {
            self.dispatch_callback(update, query).await
        } else if let Some(query) = update.inline_query.clone() {
            self.dispatch_inline(update, query).await
        } else {
            debug!(update_id = update.update_id, "unrecognized update kind");
            self.dispatch_catchall(update).await
        }
    }

    async fn dispatch_message(
        &self,
        mut update: Update,
        message: Message,
    ) -> Result<WebhookResponse> {
        update.tags.issued_user = message.from.clone();

        for (compiled, route) in &self.command_routes {
            if compiled.matches(&message) {
                info!(
                    update_id = update.update_id,
                    command = %compiled.command(),
                    "command route matched"
                );
                let args = compiled.params(&message);
                update.tags.route_type = Some(RouteType::Command);
                update.tags.command = Some(compiled.command().clone());

                let (prepend, append) = self.matched_buckets();
                return route
                    .call(update, RouteParams::Command(args), &prepend, &append)
                    .await;
            }
        }

        update.tags.route_type = Some(RouteType::Text);
        let text = matcher::message_text(&message).unwrap_or("").to_string();

        for (regex, route) in &self.text_routes {
            if let Some(caps) = regex.captures(&text) {
                info!(
                    update_id = update.update_id,
                    pattern = regex.as_str(),
                    "text route matched"
                );
                let captures = caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str().to_string()))
                    .collect();
                let params = RouteParams::Text { text, captures };

                let (prepend, append) = self.matched_buckets();
                return route.call(update, params, &prepend, &append).await;
            }
        }

        self.dispatch_defaults(update, &self.text_default_routes, text)
            .await
    }

    async fn dispatch_callback(
        &self,
        mut update: Update,
        query: CallbackQuery,
    ) -> Result<WebhookResponse> {
        update.tags.route_type = Some(RouteType::Callback);
        update.tags.issued_user = Some(query.from.clone());
        let data = query.data.clone().unwrap_or_default();

        for (identifier, route) in &self.callback_routes {
            if matcher::callback_matches(identifier, &data) {
                info!(
                    update_id = update.update_id,
                    identifier = identifier.as_str(),
                    "callback route matched"
                );
                update.tags.callback_identifier = Some(identifier.clone());
                let params = RouteParams::Callback(matcher::parse_callback_params(&data));

                let (prepend, append) = self.matched_buckets();
                return route.call(update, params, &prepend, &append).await;
            }
        }

        // No default-route fallback exists for callbacks.
        self.dispatch_catchall(update).await
    }

    async fn dispatch_inline(
        &self,
        mut update: Update,
        query: InlineQuery,
    ) -> Result<WebhookResponse> {
        update.tags.route_type = Some(RouteType::Inline);
        update.tags.issued_user = Some(query.from.clone());

        for (regex, route) in &self.inline_routes {
            if let Some(caps) = regex.captures(&query.query) {
                info!(
                    update_id = update.update_id,
                    pattern = regex.as_str(),
                    "inline route matched"
                );
                let captures = caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str().to_string()))
                    .collect();
                let params = RouteParams::Text {
                    text: query.query.clone(),
                    captures,
                };

                let (prepend, append) = self.matched_buckets();
                return route.call(update, params, &prepend, &append).await;
            }
        }

        self.dispatch_defaults(update, &self.inline_default_routes, query.query)
            .await
    }

    /// Runs the default routes in registration order; the first non-empty
    /// response wins, empty responses fall through, and an exhausted list
    /// ends in the catch-all path.
    async fn dispatch_defaults(
        &self,
        update: Update,
        routes: &[StandardRoute],
        text: String,
    ) -> Result<WebhookResponse> {
        let (prepend, append) = self.matched_buckets();

        for route in routes {
            let params = RouteParams::Text {
                text: text.clone(),
                captures: Vec::new(),
            };
            let response = route
                .call(update.clone(), params, &prepend, &append)
                .await?;
            if !response.is_empty() {
                debug!(update_id = update.update_id, "default route answered");
                return Ok(response);
            }
        }

        self.dispatch_catchall(update).await
    }

    /// Runs only the catch-all buckets around an empty-response handler.
    /// Global buckets are deliberately excluded here.
    async fn dispatch_catchall(&self, update: Update) -> Result<WebhookResponse> {
        debug!(update_id = update.update_id, "step: catch-all dispatch");
        let route = StandardRoute::new(Arc::new(EmptyHandler), Vec::new());
        route
            .call(
                update,
                RouteParams::None,
                &self.catchall_prepend,
                &self.catchall_append,
            )
            .await
    }

    /// Per-call snapshots of the buckets surrounding a matched route:
    /// catch-all-prepend ++ global-prepend before it, global-append ++
    /// catch-all-append behind it.
    fn matched_buckets(&self) -> (Vec<Arc<dyn Middleware>>, Vec<Arc<dyn Middleware>>) {
        let mut prepend = self.catchall_prepend.clone();
        prepend.extend(self.global_prepend.iter().cloned());

        let mut append = self.global_append.clone();
        append.extend(self.catchall_append.iter().cloned());

        (prepend, append)
    }
}

/// Terminal handler of the catch-all route; a catch-all middleware may still
/// short-circuit to a non-empty response around it.
struct EmptyHandler;

#[async_trait]
impl RouteHandler for EmptyHandler {
    async fn handle(
        &self,
        _update: Update,
        _params: RouteParams,
    ) -> Result<Option<WebhookResponse>> {
        Ok(None)
    }
}