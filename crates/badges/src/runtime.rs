//! Runtime selection for badge queries.

use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};

/// Runtime badge queries are spawned on: the handle the aggregator was given,
/// else the ambient runtime, else a shared single-worker runtime for
/// refreshes requested from synchronous code.
///
/// Fails only when no runtime is available and the fallback cannot be built.
pub(crate) fn query_handle(configured: Option<&Handle>) -> Result<Handle, String> {
	if let Some(handle) = configured {
		return Ok(handle.clone());
	}
	if let Ok(handle) = Handle::try_current() {
		return Ok(handle);
	}

	static FALLBACK: OnceLock<Result<Runtime, String>> = OnceLock::new();
	FALLBACK
		.get_or_init(|| {
			tracing::debug!("starting fallback runtime for badge queries");
			Builder::new_multi_thread()
				.worker_threads(1)
				.enable_time()
				.thread_name("cockpit-badge-query")
				.build()
				.map_err(|e| e.to_string())
		})
		.as_ref()
		.map(|runtime| runtime.handle().clone())
		.map_err(Clone::clone)
}
