//! Chat backend HTTP adapter.

pub mod client;

pub use client::BackendApiClient;
