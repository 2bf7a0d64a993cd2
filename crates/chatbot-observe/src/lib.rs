//! Observability setup for the chatbot client.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing};
