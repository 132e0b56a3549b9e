use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatorConfig {
	/// Upper bound on a single count query, in milliseconds.
	pub query_timeout_ms: u64,
}

impl Default for AggregatorConfig {
	fn default() -> Self {
		Self { query_timeout_ms: 10_000 }
	}
}

impl AggregatorConfig {
	pub fn query_timeout(&self) -> Duration {
		Duration::from_millis(self.query_timeout_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_take_defaults() {
		let config: AggregatorConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, AggregatorConfig::default());
		assert_eq!(config.query_timeout(), Duration::from_secs(10));
	}

	#[test]
	fn unknown_fields_are_rejected() {
		assert!(serde_json::from_str::<AggregatorConfig>(r#"{ "timeout": 5 }"#).is_err());
	}
}
