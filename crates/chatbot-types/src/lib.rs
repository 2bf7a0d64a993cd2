//! Shared value types for the chatbot client.
//!
//! Configuration, chat/history/health records exchanged with the backend,
//! identity records produced by the identity adapter, and the error enums
//! for both failure domains.
//!
//! Zero infrastructure dependencies -- only serde, secrecy, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
