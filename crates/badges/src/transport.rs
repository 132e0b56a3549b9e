use async_trait::async_trait;
use cockpit_registry::Invocation;

/// Count query failure reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
	#[error("request failed: {0}")]
	Request(String),
	#[error("unexpected response: {0}")]
	Response(String),
}

/// Issues count queries against the management API.
///
/// The same transport that executes actions answers badge queries: the
/// invocation carries the action's api name and its bound filter
/// parameters, and the response is the number of matching items.
#[async_trait]
pub trait CountTransport: Send + Sync {
	async fn count(&self, invocation: &Invocation) -> Result<u64, TransportError>;
}
