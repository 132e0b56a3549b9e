use std::time::Duration;

use cockpit_registry::UnresolvedArguments;

use crate::transport::TransportError;

/// Why a badge query produced no count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
	#[error(transparent)]
	Transport(#[from] TransportError),
	#[error("query timed out after {0:?}")]
	Timeout(Duration),
	#[error(transparent)]
	Unresolved(#[from] UnresolvedArguments),
	#[error("no runtime to run the query on: {0}")]
	Runtime(String),
}

/// A badge refresh that failed; the badge keeps its previous count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("badge '{api}' refresh {generation} failed: {kind}")]
pub struct BadgeQueryFailure {
	pub api: String,
	pub generation: u64,
	pub kind: FailureKind,
}

/// Observability collaborator notified of every failed badge query.
pub trait FailureSink: Send + Sync {
	fn report(&self, failure: &BadgeQueryFailure);
}
