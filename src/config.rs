//! Configuration for the tile storage engine.
use crate::provider::STATIC_MAPS_URL;
use serde::de::Error;

#[cfg(feature = "snapshot")]
pub use crate::storage::SnapshotConfig;

/// Storage engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[cfg(feature = "snapshot")]
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Map imagery provider settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,

    /// Largest tile edge requested from the provider
    #[serde(default = "ProviderConfig::default_max_tile_size_px")]
    pub max_tile_size_px: u32,

    #[serde(default = "ProviderConfig::default_map_type")]
    pub map_type: String,
}

impl ProviderConfig {
    fn default_base_url() -> String {
        STATIC_MAPS_URL.to_string()
    }

    const fn default_max_tile_size_px() -> u32 {
        640
    }

    fn default_map_type() -> String {
        "satellite".to_string()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
            max_tile_size_px: Self::default_max_tile_size_px(),
            map_type: Self::default_map_type(),
        }
    }
}

/// Limits applied to import commands
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Smallest accepted polyline corridor half-width, in meters
    #[serde(default = "ImportConfig::default_min_load_distance_m")]
    pub min_load_distance_m: f64,

    #[serde(default = "ImportConfig::default_max_layer_name_len")]
    pub max_layer_name_len: usize,

    #[serde(default = "ImportConfig::default_max_description_len")]
    pub max_description_len: usize,

    #[serde(default = "ImportConfig::default_max_layer_name_len")]
    pub max_profile_name_len: usize,

    #[serde(default = "ImportConfig::default_max_description_len")]
    pub max_profile_description_len: usize,
}

impl ImportConfig {
    const fn default_min_load_distance_m() -> f64 {
        20.0
    }

    const fn default_max_layer_name_len() -> usize {
        50
    }

    const fn default_max_description_len() -> usize {
        200
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            min_load_distance_m: Self::default_min_load_distance_m(),
            max_layer_name_len: Self::default_max_layer_name_len(),
            max_description_len: Self::default_max_description_len(),
            max_profile_name_len: Self::default_max_layer_name_len(),
            max_profile_description_len: Self::default_max_description_len(),
        }
    }
}

impl Config {
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_import(mut self, import: ImportConfig) -> Self {
        self.import = import;
        self
    }

    #[cfg(feature = "snapshot")]
    pub fn with_auto_snapshot_ops(mut self, ops: usize) -> Self {
        assert!(ops > 0, "Auto snapshot interval must be greater than zero");
        self.snapshot.auto_snapshot_ops = Some(ops);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.provider.max_tile_size_px == 0 {
            return Err("Max tile size must be greater than zero".to_string());
        }

        if self.provider.base_url.is_empty() {
            return Err("Provider base URL must not be empty".to_string());
        }

        if !self.import.min_load_distance_m.is_finite() || self.import.min_load_distance_m < 0.0 {
            return Err("Minimum load distance must be a non-negative number".to_string());
        }

        if self.import.max_layer_name_len == 0 {
            return Err("Max layer name length must be greater than zero".to_string());
        }

        if self.import.max_profile_name_len == 0 {
            return Err("Max profile name length must be greater than zero".to_string());
        }

        #[cfg(feature = "snapshot")]
        if let Some(ops) = self.snapshot.auto_snapshot_ops
            && ops == 0
        {
            return Err("Auto snapshot interval must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            import: ImportConfig::default(),
            #[cfg(feature = "snapshot")]
            snapshot: SnapshotConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.provider.max_tile_size_px, 640);
        assert_eq!(config.provider.map_type, "satellite");
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.import.min_load_distance_m, 20.0);
        assert_eq!(config.import.max_layer_name_len, 50);
        assert_eq!(config.import.max_description_len, 200);
        assert_eq!(config.import.max_profile_name_len, 50);
        assert_eq!(config.import.max_profile_description_len, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_provider(ProviderConfig::default().with_api_key("secret"))
            .with_import(ImportConfig {
                min_load_distance_m: 50.0,
                ..ImportConfig::default()
            });

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"provider": {"api_key": "k"}}"#).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("k"));
        assert_eq!(config.provider.max_tile_size_px, 640);
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Config::from_json(r#"{"provider": {"max_tile_size_px": 0}}"#).is_err());
        assert!(Config::from_json(r#"{"import": {"min_load_distance_m": -1.0}}"#).is_err());
        assert!(Config::from_json(r#"{"unknown": 1}"#).is_err());
    }

    #[cfg(feature = "snapshot")]
    #[test]
    fn test_auto_snapshot_ops() {
        let config = Config::default().with_auto_snapshot_ops(10);
        assert_eq!(config.snapshot.auto_snapshot_ops, Some(10));
        assert!(Config::from_json(r#"{"snapshot": {"auto_snapshot_ops": 0}}"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default().with_provider(ProviderConfig::default().with_api_key("t"));
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
