//! JSON web layer over an EFA session.
//!
//! Provides HTTP endpoints for station search, departure monitors and
//! journey planning.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
