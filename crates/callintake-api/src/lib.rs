//! callintake HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use server::{create_router, router_with_timeout, start_server};
pub use state::AppState;
