//! Web server module
//!
//! Provides the HTTP API of the contest service.

mod handlers;
mod routes;
mod state;

pub use handlers::GREETING;
pub use routes::create_router;
pub use state::AppState;
