//! microsvc - convention-based command handlers over the lab store.
//!
//! Register command handlers on a `Service`. Each handler receives a
//! `Context<R>` with the input payload, session variables and the shared
//! state the service was built with.
//!
//! ## Handler Convention
//!
//! Each handler file follows this convention:
//!
//! ```ignore
//! // src/handlers/request_assign.rs
//!
//! pub const COMMAND: &str = "request.assign";
//!
//! pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
//!     ctx.has_fields(&["requestId", "technicianId"])
//! }
//!
//! pub fn handle<S: KeyValueStore>(
//!     ctx: &Context<LabOperations<S>>,
//! ) -> Result<Value, HandlerError> {
//!     let input = ctx.input::<AssignInput>()?;
//!     let request = ctx.repo().assign_request(&input.request_id, &input.technician_id)?;
//!     Ok(json!(request))
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::Service;
pub use session::Session;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::router;

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str` - the command name
/// - `guard(ctx) -> bool` - input validation
/// - `handle(ctx) -> Result<Value, HandlerError>` - the handler
///
/// Generic handlers take their type arguments after the path:
///
/// ```ignore
/// let service = labdesk::register_handlers!(
///     microsvc::Service::new(ops),
///     [S] handlers::request_assign,
///     [S] handlers::lab_stats,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( [$($ty:ty),*] $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard::<$($ty),*>,
                $($seg)::+::handle::<$($ty),*>,
            )
        )+
    };
}
