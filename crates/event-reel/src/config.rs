use serde::{Deserialize, Serialize};

use crate::error::{ReelError, Result};

const DEFAULT_STARVATION_WATERMARK: usize = 1000;

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
	/// Resident head count past which the time-advance walk reports starvation
	pub starvation_watermark: usize,
}

impl QueueConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_starvation_watermark(mut self, watermark: usize) -> Self {
		self.starvation_watermark = watermark;
		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.starvation_watermark == 0 {
			return Err(ReelError::InvalidConfig("starvation_watermark must be at least 1".to_string()));
		}
		Ok(())
	}
}

impl Default for QueueConfig {
	fn default() -> Self {
		Self {
			starvation_watermark: DEFAULT_STARVATION_WATERMARK,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_valid() {
		let config = QueueConfig::default();
		assert_eq!(config.starvation_watermark, 1000);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn zero_watermark_is_rejected() {
		let config = QueueConfig::new().with_starvation_watermark(0);
		assert!(matches!(config.validate(), Err(ReelError::InvalidConfig(_))));
	}

	#[test]
	fn missing_fields_fall_back_to_defaults() {
		let config: QueueConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, QueueConfig::default());

		let config: QueueConfig = serde_json::from_str(r#"{"starvation_watermark": 8}"#).unwrap();
		assert_eq!(config.starvation_watermark, 8);
	}
}
