//! Credentials, bearer tokens, and the caching token authenticator.

pub mod authenticator;
pub mod credentials;
pub mod token;

pub use authenticator::*;
pub use credentials::*;
pub use token::{record::*, secret::*};
