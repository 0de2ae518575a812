//! Authentication module
//!
//! Credential storage, session token issuance/verification, and the
//! cookie transport that carries tokens between client and server.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{CredentialStore, User};
pub use token::{Claims, TokenCodec, TokenError};
