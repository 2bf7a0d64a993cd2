//! Infrastructure layer for the chatbot client.
//!
//! Contains the HTTP adapters behind the ports defined in `chatbot-core`:
//! the Cognito identity provider, the chat backend client, and the
//! configuration loader.

pub mod api;
pub mod cognito;
pub mod config;
