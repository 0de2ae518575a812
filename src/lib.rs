//! fintrack Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod ledger;

// Private modules (used only by the binaries)
pub mod config;
pub mod db;
mod error;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Direction, Nominal, NominalError};
