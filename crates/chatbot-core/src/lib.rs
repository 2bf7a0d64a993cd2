//! Ports and services for the chatbot client.
//!
//! This crate defines the identity-provider port that the infrastructure
//! layer implements, the session service built on it, the token source the
//! backend adapter reads per request, and validation of backend payloads.
//! It depends only on `chatbot-types` -- never on `chatbot-infra` or any
//! HTTP crate.

pub mod identity;
pub mod token;
pub mod validation;
