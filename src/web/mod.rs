//! Web server module
//!
//! Serves the documentation site and answers its search form.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
