use serde::{Deserialize, Serialize};

/// Layout constants for the diagram builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramConfig {
    /// Horizontal distance between consecutive tables.
    pub table_pitch: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub char_width: f64,
    /// Added to the longest label when sizing a table.
    pub label_padding: f64,
    pub row_height: f64,
    /// Extra height below the last row of a table.
    pub padding: f64,
    pub min_row_width: f64,
    pub max_row_width: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            table_pitch: 350.0,
            origin_x: 50.0,
            origin_y: 50.0,
            char_width: 8.0,
            label_padding: 60.0,
            row_height: 36.0,
            padding: 10.0,
            min_row_width: 180.0,
            max_row_width: 320.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid diagram config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid diagram config: {0}")]
    Invalid(&'static str),
}

impl DiagramConfig {
    /// Read a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_height <= 0.0 {
            return Err(ConfigError::Invalid("rowHeight must be positive"));
        }
        if self.char_width <= 0.0 {
            return Err(ConfigError::Invalid("charWidth must be positive"));
        }
        if self.min_row_width.is_nan() || self.max_row_width.is_nan() {
            return Err(ConfigError::Invalid("row width bounds must be numbers"));
        }
        if self.min_row_width > self.max_row_width {
            return Err(ConfigError::Invalid("minRowWidth exceeds maxRowWidth"));
        }
        Ok(())
    }
}
