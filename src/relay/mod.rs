//! Relay module.
//!
//! The `{type, payload}` → upstream forwarding pipeline and its two hosting
//! bindings: the axum route (request/response style) and the event record
//! entry point (event-object style). Both delegate to the same core in
//! [`forward`].

pub mod event;
pub mod forward;
mod handlers;
mod server;
pub mod types;

pub use event::{handle_event, EventResponse, HttpEvent};
pub use forward::{handle_envelope, relay};
pub use handlers::REQUEST_ID_HEADER;
pub use server::{create_router, run_server, AppState};
pub use types::{GenerationKind, RelayRequest};
