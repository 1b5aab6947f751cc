//! Service - command handler registry and dispatch.
//!
//! `Service<R>` holds the shared state handlers work on and a set of named
//! command handlers. Each handler receives a `Context<R>` and returns
//! `Result<Value, HandlerError>`.
//!
//! ## Example
//!
//! ```ignore
//! use labdesk::microsvc::{Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(ops)
//!     .command("lab.stats", |ctx| Ok(json!(ctx.repo().get_stats()?)));
//!
//! let stats = service.dispatch("lab.stats", json!({}), Session::new())?;
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Guard<R> = Box<dyn Fn(&Context<R>) -> bool + Send + Sync>;
type Handle<R> = Box<dyn Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync>;

/// A registered command handler with optional guard.
struct CommandHandler<R> {
    guard: Option<Guard<R>>,
    handle: Handle<R>,
}

/// A service that routes commands to handler functions.
///
/// Generic over `R`, the state handlers operate on, reachable through
/// `ctx.repo()`.
pub struct Service<R> {
    repo: R,
    handlers: HashMap<String, CommandHandler<R>>,
}

impl<R: Send + Sync + 'static> Service<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler. Builder style.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard is called before the handler. If it returns `false`,
    /// the command is rejected with `HandlerError::GuardRejected`.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<R>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name: look up the handler, run its guard, then
    /// call it.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(input, session, &self.repo);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                debug!(command, "guard rejected command");
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        let result = (handler.handle)(&ctx);
        match &result {
            Ok(_) => debug!(
                command,
                actor = ctx.actor(),
                session_id = ctx.session().session_id(),
                "command handled"
            ),
            Err(err) if err.status_code() >= 500 => {
                warn!(command, error = %err, "command failed")
            }
            Err(err) => debug!(command, error = %err, "command refused"),
        }
        result
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}
