//! Flood-risk dashboard builder.
//!
//! Loads a table of sites with elevation and rainfall statistics, scores each
//! site with an in-sample random forest, and writes a self-contained Leaflet
//! page with a risk heat layer, clickable markers, and a marker filter panel.

pub mod colormap;
pub mod config;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod export;
pub mod forest;
pub mod map;
pub mod pipeline;
pub mod predictor;
pub mod widget;

pub use config::DashboardConfig;
pub use error::{FloodError, Result};
pub use pipeline::{DashboardPipeline, DashboardSummary};
