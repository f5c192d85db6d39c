pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod faker;
pub mod loader;
pub mod problem;
pub mod routing;
pub mod server;
pub mod telemetry;
pub mod validator;

pub use error::{MockbirdError, Result};
