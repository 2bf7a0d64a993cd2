//! Bearer-token source read by the backend adapter.

/// Supplies the bearer token attached to outgoing backend requests.
///
/// Called once per request, immediately before it is sent; implementations
/// must not assume the caller caches the result. `None` means the request
/// goes out unauthenticated.
pub trait TokenSource: Send + Sync {
    fn auth_token(&self) -> impl std::future::Future<Output = Option<String>> + Send;
}

/// A token source that never yields a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenSource for Anonymous {
    async fn auth_token(&self) -> Option<String> {
        None
    }
}
