//! Domain module
//!
//! Core domain types and business logic.

pub mod direction;
pub mod nominal;

pub use direction::Direction;
pub use nominal::{Nominal, NominalError};
