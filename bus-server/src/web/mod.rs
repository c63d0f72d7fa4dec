//! Web layer for the bus position server.
//!
//! JSON endpoints for the line catalogue, the stops of a line and its
//! estimated bus positions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
