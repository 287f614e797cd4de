use serde::{Deserialize, Serialize};

/// Options applied by a [`Decoder`](crate::Decoder)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Upper bound on the element count of any variable-count field
    pub max_count: Option<usize>,
    /// Truncate decoded string bytes at the first NUL (fixed-width text fields)
    pub trim_nul: bool,
}

impl DecodeConfig {
    /// Create a new configuration builder
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }
}

/// Builder for DecodeConfig
#[derive(Debug, Clone, Default)]
pub struct DecodeConfigBuilder {
    max_count: Option<usize>,
    trim_nul: Option<bool>,
}

impl DecodeConfigBuilder {
    /// Reject variable-count fields with more than `limit` elements
    pub fn max_count(mut self, limit: usize) -> Self {
        self.max_count = Some(limit);
        self
    }

    /// Enable or disable truncating strings at the first NUL byte
    pub fn trim_nul(mut self, enabled: bool) -> Self {
        self.trim_nul = Some(enabled);
        self
    }

    /// Build the configuration
    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            max_count: self.max_count.or(default.max_count),
            trim_nul: self.trim_nul.unwrap_or(default.trim_nul),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        assert_eq!(DecodeConfig::builder().build(), DecodeConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = DecodeConfig::builder().max_count(16).trim_nul(true).build();
        assert_eq!(config.max_count, Some(16));
        assert!(config.trim_nul);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DecodeConfig = serde_json::from_str(r#"{"trim_nul": true}"#).unwrap();
        assert_eq!(config.max_count, None);
        assert!(config.trim_nul);
    }
}
