//! Dashboard configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::ColumnSchema;
use crate::error::ConfigError;
use crate::forest::ForestParams;
use crate::map::DEFAULT_ZOOM;

pub const DEFAULT_INPUT: &str = "elev_flood_rain_merged.csv";
pub const DEFAULT_OUTPUT: &str = "flood_risk_dashboard_clickable.html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub schema: ColumnSchema,
    pub forest: ForestParams,
    /// Initial map zoom.
    pub zoom: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            schema: ColumnSchema::default(),
            forest: ForestParams::default(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let c = DashboardConfig::default();
        assert_eq!(c.input, PathBuf::from("elev_flood_rain_merged.csv"));
        assert_eq!(c.output, PathBuf::from("flood_risk_dashboard_clickable.html"));
        assert_eq!(c.schema.target, "WNTW_RISKV");
        assert_eq!(c.forest.n_estimators, 300);
        assert_eq!(c.forest.max_depth, Some(12));
        assert_eq!(c.forest.seed, 42);
        assert_eq!(c.zoom, 11);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.json");
        fs::write(
            &path,
            r#"{"output": "out.html", "schema": {"target": "RISK"}, "forest": {"n_estimators": 10}}"#,
        )
        .unwrap();

        let c = DashboardConfig::from_json_file(&path).unwrap();
        assert_eq!(c.output, PathBuf::from("out.html"));
        assert_eq!(c.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(c.schema.target, "RISK");
        assert_eq!(c.schema.latitude, "latitude_x");
        assert_eq!(c.forest.n_estimators, 10);
        assert_eq!(c.forest.max_depth, Some(12));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json_file(dir.path().join("absent.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
