use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default minimum contour area, in square pixels
pub const DEFAULT_MIN_AREA: f64 = 100.0;

/// Default polygon approximation tolerance, as a fraction of the perimeter
pub const DEFAULT_EPSILON_FRACTION: f64 = 0.04;

/// Tunable detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Contours enclosing less than this are discarded before classification
    pub min_area: f64,
    /// Smaller keeps more vertices (curves look like many-sided polygons),
    /// larger loses real corners
    pub epsilon_fraction: f64,
    /// Margin around each contour in debug crops
    pub crop_padding: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_AREA,
            epsilon_fraction: DEFAULT_EPSILON_FRACTION,
            crop_padding: 10,
        }
    }
}

impl DetectorConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }
}
