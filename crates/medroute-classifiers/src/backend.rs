//! Backend trait: the capability every classification strategy implements

use async_trait::async_trait;
use medroute_core::{RawResponse, Result};

/// Trait for all classification backends.
///
/// `invoke` receives a non-empty message (the facade validates input
/// before dispatch) and must convert every internal failure — HTTP,
/// parsing, model runtime — into an [`Error`](medroute_core::Error)
/// variant rather than panicking. Implementations hold only long-lived,
/// read-only resources and are safe to share across concurrent callers.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Run the backend against a single message
    async fn invoke(&self, message: &str) -> Result<RawResponse>;

    /// Get the backend name
    fn name(&self) -> &str;
}
