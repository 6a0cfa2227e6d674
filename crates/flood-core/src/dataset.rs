//! Dataset loader.
//!
//! Reads a comma-delimited file with a header row into a [`DataTable`] whose
//! columns are addressed by name, then extracts typed [`FloodSample`] rows
//! using a [`ColumnSchema`]. Row order is the file's order.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coords::LatLon;
use crate::error::DatasetError;

/// Number of model features per row.
pub const N_FEATURES: usize = 9;

/// Target column of the reference flood dataset.
pub const DEFAULT_TARGET: &str = "WNTW_RISKV";

// ── Column schema ─────────────────────────────────────────────────────────────

/// Maps every attribute of a [`FloodSample`] to its source column name.
/// Names are exact-match, case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
    pub total_rainfall_year: String,
    pub average_daily_rain: String,
    pub max_daily_rain: String,
    pub rainy_days_count: String,
    pub heavy_rain_events: String,
    pub very_heavy_events: String,
    pub mean_precip_probability: String,
    pub mean_precip_cover: String,
    pub target: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            latitude: "latitude_x".into(),
            longitude: "longitude_x".into(),
            altitude: "altitude (ft)".into(),
            total_rainfall_year: "total_rainfall_year".into(),
            average_daily_rain: "average_daily_rain".into(),
            max_daily_rain: "max_daily_rain".into(),
            rainy_days_count: "rainy_days_count".into(),
            heavy_rain_events: "heavy_rain_events".into(),
            very_heavy_events: "very_heavy_events".into(),
            mean_precip_probability: "mean_precip_probability".into(),
            mean_precip_cover: "mean_precip_cover".into(),
            target: DEFAULT_TARGET.into(),
        }
    }
}

impl ColumnSchema {
    /// Feature columns in model order.
    pub fn feature_columns(&self) -> [&str; N_FEATURES] {
        [
            self.altitude.as_str(),
            self.total_rainfall_year.as_str(),
            self.average_daily_rain.as_str(),
            self.max_daily_rain.as_str(),
            self.rainy_days_count.as_str(),
            self.heavy_rain_events.as_str(),
            self.very_heavy_events.as_str(),
            self.mean_precip_probability.as_str(),
            self.mean_precip_cover.as_str(),
        ]
    }

    /// Every column the pipeline reads: coordinates, features, target.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.latitude.as_str(), self.longitude.as_str()];
        cols.extend(self.feature_columns());
        cols.push(&self.target);
        cols
    }
}

// ── Named-column table ────────────────────────────────────────────────────────

/// Raw CSV contents with a name → position column index.
#[derive(Debug, Clone)]
pub struct DataTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<csv::StringRecord>,
}

impl DataTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "loaded dataset");
        Ok(table)
    }

    /// Parse CSV from any reader. Rows with a different field count than the
    /// header are rejected. Cell values are trimmed; header names are kept
    /// verbatim so column lookup stays exact.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // Duplicate names resolve to the leftmost column.
            index.entry(h.clone()).or_insert(i);
        }

        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, index, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DatasetError::MissingColumn { column: name.to_string() })
    }

    /// Raw cell text, or None if the row or column does not exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.index.get(column)?;
        self.records.get(row)?.get(col)
    }

    /// Column parsed as finite f64 values.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let col = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, rec)| {
                let raw = rec.get(col).unwrap_or("");
                parse_f64(raw).ok_or_else(|| invalid(row, name, raw))
            })
            .collect()
    }

    /// Column parsed as integers. Integral float spellings such as `"12.0"`
    /// are accepted.
    pub fn column_i64(&self, name: &str) -> Result<Vec<i64>, DatasetError> {
        let col = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, rec)| {
                let raw = rec.get(col).unwrap_or("");
                parse_i64(raw).ok_or_else(|| invalid(row, name, raw))
            })
            .collect()
    }
}

fn invalid(row: usize, column: &str, value: &str) -> DatasetError {
    DatasetError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_i64(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let v = parse_f64(raw)?;
    (v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

// ── Typed rows ────────────────────────────────────────────────────────────────

/// One geographic sample point with its rainfall statistics and risk label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodSample {
    pub location: LatLon,
    /// Feet above sea level.
    pub altitude_ft: f64,
    /// Inches.
    pub total_rainfall_year: f64,
    /// Inches.
    pub average_daily_rain: f64,
    /// Inches.
    pub max_daily_rain: f64,
    pub rainy_days_count: i64,
    pub heavy_rain_events: i64,
    pub very_heavy_events: i64,
    /// Percent, 0-100.
    pub mean_precip_probability: f64,
    pub mean_precip_cover: f64,
    /// Training label, on whatever scale the source uses.
    pub target_risk: f64,
}

impl FloodSample {
    /// Extract typed rows from `table`. Fails on the first missing column
    /// (in [`ColumnSchema::required_columns`] order), the first unreadable
    /// cell, or an empty table.
    pub fn collect(table: &DataTable, schema: &ColumnSchema) -> Result<Vec<Self>, DatasetError> {
        if let Some(missing) = schema.required_columns().into_iter().find(|c| !table.has_column(c)) {
            return Err(DatasetError::MissingColumn { column: missing.to_string() });
        }
        if table.is_empty() {
            return Err(DatasetError::Empty);
        }

        let lat = table.column_f64(&schema.latitude)?;
        let lon = table.column_f64(&schema.longitude)?;
        let altitude = table.column_f64(&schema.altitude)?;
        let total = table.column_f64(&schema.total_rainfall_year)?;
        let average = table.column_f64(&schema.average_daily_rain)?;
        let max = table.column_f64(&schema.max_daily_rain)?;
        let rainy = table.column_i64(&schema.rainy_days_count)?;
        let heavy = table.column_i64(&schema.heavy_rain_events)?;
        let very_heavy = table.column_i64(&schema.very_heavy_events)?;
        let probability = table.column_f64(&schema.mean_precip_probability)?;
        let cover = table.column_f64(&schema.mean_precip_cover)?;
        let target = table.column_f64(&schema.target)?;

        Ok((0..table.len())
            .map(|i| Self {
                location: LatLon::new(lat[i], lon[i]),
                altitude_ft: altitude[i],
                total_rainfall_year: total[i],
                average_daily_rain: average[i],
                max_daily_rain: max[i],
                rainy_days_count: rainy[i],
                heavy_rain_events: heavy[i],
                very_heavy_events: very_heavy[i],
                mean_precip_probability: probability[i],
                mean_precip_cover: cover[i],
                target_risk: target[i],
            })
            .collect())
    }

    /// Model inputs in [`ColumnSchema::feature_columns`] order.
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            self.altitude_ft,
            self.total_rainfall_year,
            self.average_daily_rain,
            self.max_daily_rain,
            self.rainy_days_count as f64,
            self.heavy_rain_events as f64,
            self.very_heavy_events as f64,
            self.mean_precip_probability,
            self.mean_precip_cover,
        ]
    }
}

/// Read `path` and extract typed rows in one step.
pub fn load_samples(path: impl AsRef<Path>, schema: &ColumnSchema) -> Result<Vec<FloodSample>, DatasetError> {
    let table = DataTable::from_path(path)?;
    FloodSample::collect(&table, schema)
}
