use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Initial view and frame size of the rendered map.
///
/// Stored as a JSON object on disk; any omitted key keeps its default:
/// ```json
/// {
///   "center": [51.2194, 4.4025],
///   "zoom": 13
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: [f64; 2],
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center: [50.850346, 4.351721],
            zoom: 12,
            width: 1200,
            height: 600,
        }
    }
}

impl MapConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read map config {path}"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid map config {path}"))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
