//! Leaflet map document: base tiles, named overlay groups, legend, layer
//! control, and injected HTML fragments, rendered to one HTML page.
//!
//! All values that cross into JavaScript go through [`js_literal`].

pub mod heat;
pub mod legend;
pub mod markers;

use serde::Serialize;

use crate::coords::LatLon;
pub use heat::{HeatLayer, HeatOptions};
pub use legend::Legend;
pub use markers::{CircleMarker, MarkerAttributes, MarkerLayer};

// ── Constants ────────────────────────────────────────────────────────────────

/// Initial zoom of the dashboard map.
pub const DEFAULT_ZOOM: u8 = 11;

pub const HEATMAP_LAYER_NAME: &str = "Flood Risk Heatmap";
pub const MARKER_LAYER_NAME: &str = "Detailed Points";

/// JS variable holding the Leaflet map.
const MAP_VAR: &str = "map";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_CSS_SRI: &str = "sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_JS_SRI: &str = "sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=";
const LEAFLET_HEAT_JS: &str = "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js";

// ── Fragments and tiles ──────────────────────────────────────────────────────

/// Raw markup appended to the page body after the map script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFragment(String);

impl HtmlFragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Base raster tile layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub url: String,
    pub attribution: String,
    #[serde(rename = "maxZoom")]
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        Self {
            name: "openstreetmap".into(),
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                .into(),
            max_zoom: 19,
        }
    }
}

// ── Overlays ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Heat(HeatLayer),
    Markers(MarkerLayer),
}

impl Overlay {
    fn render_js(&self, parent: &str) -> Result<String, serde_json::Error> {
        match self {
            Overlay::Heat(h) => h.render_js(parent),
            Overlay::Markers(m) => m.render_js(parent),
        }
    }
}

/// An overlay wrapped in a feature group the layer control can toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayGroup {
    pub name: String,
    /// Whether the group starts on the map.
    pub show: bool,
    pub overlay: Overlay,
}

// ── Document ─────────────────────────────────────────────────────────────────

/// The composed dashboard map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    title: String,
    center: LatLon,
    zoom: u8,
    tiles: TileLayer,
    overlays: Vec<OverlayGroup>,
    legend: Option<Legend>,
    layer_control: bool,
    fragments: Vec<HtmlFragment>,
}

impl MapDocument {
    pub fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            title: "Flood Risk Dashboard".into(),
            center,
            zoom,
            tiles: TileLayer::openstreetmap(),
            overlays: Vec::new(),
            legend: None,
            layer_control: false,
            fragments: Vec::new(),
        }
    }

    pub fn add_overlay(&mut self, name: impl Into<String>, show: bool, overlay: Overlay) -> &mut Self {
        self.overlays.push(OverlayGroup { name: name.into(), show, overlay });
        self
    }

    pub fn set_legend(&mut self, legend: Legend) -> &mut Self {
        self.legend = Some(legend);
        self
    }

    pub fn add_layer_control(&mut self) -> &mut Self {
        self.layer_control = true;
        self
    }

    pub fn inject(&mut self, fragment: HtmlFragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn overlays(&self) -> &[OverlayGroup] {
        &self.overlays
    }

    pub fn overlay(&self, name: &str) -> Option<&OverlayGroup> {
        self.overlays.iter().find(|g| g.name == name)
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn has_layer_control(&self) -> bool {
        self.layer_control
    }

    pub fn fragments(&self) -> &[HtmlFragment] {
        &self.fragments
    }

    /// Render the complete HTML page.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let mut script = String::new();

        script.push_str(&format!(
            "var {MAP_VAR} = L.map(\"map\", {{center: {}, zoom: {}}});\n",
            js_literal(&self.center.to_array())?,
            self.zoom
        ));
        // The filter widget finds the map through this registry.
        script.push_str(&format!(
            "window.L.map_instances = window.L.map_instances || [];\nwindow.L.map_instances.push({MAP_VAR});\n"
        ));
        script.push_str(&format!(
            "var tile_layer = L.tileLayer({}, {}).addTo({MAP_VAR});\n",
            js_literal(&self.tiles.url)?,
            js_literal(&self.tiles)?
        ));

        for (i, group) in self.overlays.iter().enumerate() {
            let var = overlay_var(i);
            script.push_str(&format!("\nvar {var} = L.featureGroup();\n"));
            script.push_str(&group.overlay.render_js(&var)?);
            if group.show {
                script.push_str(&format!("{var}.addTo({MAP_VAR});\n"));
            }
        }

        if let Some(legend) = &self.legend {
            script.push('\n');
            script.push_str(&legend.render_js(MAP_VAR)?);
        }

        if self.layer_control {
            let overlays = self
                .overlays
                .iter()
                .enumerate()
                .map(|(i, g)| -> Result<String, serde_json::Error> {
                    Ok(format!("{}: {}", js_literal(&g.name)?, overlay_var(i)))
                })
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            script.push_str(&format!(
                "\nL.control.layers({{{}: tile_layer}}, {{{overlays}}}, {{collapsed: true}}).addTo({MAP_VAR});\n",
                js_literal(&self.tiles.name)?
            ));
        }

        let fragments: String = self.fragments.iter().map(|f| format!("{}\n", f.as_str())).collect();

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>{title}</title>
<link rel="stylesheet" href="{LEAFLET_CSS}" integrity="{LEAFLET_CSS_SRI}" crossorigin="" />
<script src="{LEAFLET_JS}" integrity="{LEAFLET_JS_SRI}" crossorigin=""></script>
<script src="{LEAFLET_HEAT_JS}"></script>
<style>
html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
#map {{ position: absolute; top: 0; bottom: 0; left: 0; right: 0; }}
{legend_css}
</style>
</head>
<body>
<div id="map"></div>
<script>
{script}</script>
{fragments}</body>
</html>
"#,
            title = self.title,
            legend_css = legend::LEGEND_CSS,
        ))
    }
}

fn overlay_var(i: usize) -> String {
    format!("overlay_{i}")
}

/// Serialise `value` as a JS literal that is safe inside `<script>`.
pub fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
