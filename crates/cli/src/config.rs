use std::fs::File;
use std::io::Read;
use std::path::Path;

use linestamp_engine::MAX_TEMPLATE_LEN;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Template used when no format argument is given.
    pub default_format: String,
    /// Template used by the elapsed modes when no format argument is given.
    pub elapsed_format: String,
    /// Capacity cap for rewritten lines.
    pub max_line_len: usize,
}

impl StampConfig {
    /// Load configuration from file or environment variables.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("LINESTAMP_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/linestamp/config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::debug!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        // Environment variables override file config
        if let Ok(format) = std::env::var("LINESTAMP_DEFAULT_FORMAT") {
            config.default_format = format;
        }
        if let Ok(format) = std::env::var("LINESTAMP_ELAPSED_FORMAT") {
            config.elapsed_format = format;
        }
        if let Ok(len) = std::env::var("LINESTAMP_MAX_LINE_LEN") {
            if let Ok(len) = len.parse() {
                config.max_line_len = len;
            }
        }

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: StampConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_format.is_empty() {
            return Err("default_format must not be empty".to_string());
        }
        if self.elapsed_format.is_empty() {
            return Err("elapsed_format must not be empty".to_string());
        }
        if self.default_format.len() > MAX_TEMPLATE_LEN
            || self.elapsed_format.len() > MAX_TEMPLATE_LEN
        {
            return Err(format!(
                "format templates must be at most {} bytes",
                MAX_TEMPLATE_LEN
            ));
        }
        if self.max_line_len == 0 {
            return Err("max_line_len must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            default_format: "%b %d %H:%M:%S".to_string(),
            elapsed_format: "%H:%M:%S".to_string(),
            max_line_len: linestamp_engine::MAX_LINE_LEN,
        }
    }
}
