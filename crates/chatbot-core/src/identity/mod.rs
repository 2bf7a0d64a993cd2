//! Identity: the provider port and the session service built on it.

pub mod provider;
pub mod service;

pub use provider::IdentityProvider;
pub use service::AuthService;
