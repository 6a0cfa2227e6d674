//! Colour legend drawn as a Leaflet control.

use super::js_literal;
use crate::colormap::{LinearColormap, Rgb};

pub(super) const LEGEND_CSS: &str = ".risk-legend { background: white; padding: 6px 10px; \
border-radius: 4px; box-shadow: 0 1px 4px rgba(0,0,0,0.3); font: 12px sans-serif; }
.risk-legend .bar { width: 220px; height: 12px; margin: 4px 0; }
.risk-legend .ticks { display: flex; justify-content: space-between; }";

/// Number of tick labels under the gradient bar.
const N_TICKS: usize = 5;

/// Legend for a [`LinearColormap`]: caption, gradient bar and tick labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    caption: String,
    stops: Vec<Rgb>,
    vmin: f64,
    vmax: f64,
}

impl Legend {
    pub fn from_colormap(colormap: &LinearColormap) -> Self {
        Self {
            caption: colormap.caption().to_string(),
            stops: colormap.stops().to_vec(),
            vmin: colormap.vmin(),
            vmax: colormap.vmax(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Evenly spaced labels from `vmin` to `vmax`. A zero-width domain gets a
    /// single label.
    pub fn ticks(&self) -> Vec<String> {
        if self.vmax <= self.vmin {
            return vec![format!("{:.2}", self.vmin)];
        }
        let step = (self.vmax - self.vmin) / (N_TICKS - 1) as f64;
        (0..N_TICKS)
            .map(|i| format!("{:.2}", self.vmin + step * i as f64))
            .collect()
    }

    /// Inner HTML of the control.
    pub fn html(&self) -> String {
        let colors: Vec<String> = self.stops.iter().map(|c| c.hex()).collect();
        let ticks: String = self.ticks().iter().map(|t| format!("<span>{t}</span>")).collect();
        format!(
            "<div class=\"caption\">{}</div>\
             <div class=\"bar\" style=\"background: linear-gradient(to right, {});\"></div>\
             <div class=\"ticks\">{ticks}</div>",
            self.caption,
            colors.join(", ")
        )
    }

    pub(super) fn render_js(&self, map: &str) -> Result<String, serde_json::Error> {
        Ok(format!(
            "var legend = L.control({{position: \"topright\"}});
legend.onAdd = function () {{
    var div = L.DomUtil.create(\"div\", \"risk-legend\");
    div.innerHTML = {};
    return div;
}};
legend.addTo({map});
",
            js_literal(&self.html())?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_and_ticks_follow_the_colormap() {
        let legend = Legend::from_colormap(&LinearColormap::flood_risk(0.0, 4.0));
        assert_eq!(legend.caption(), "Predicted Flood Risk");
        assert_eq!(legend.ticks(), ["0.00", "1.00", "2.00", "3.00", "4.00"]);
        let html = legend.html();
        assert!(html.contains("linear-gradient(to right, #008000, #ffff00, #ff0000)"));
        assert!(html.contains("<div class=\"caption\">Predicted Flood Risk</div>"));
    }

    #[test]
    fn degenerate_domain_has_one_tick() {
        let legend = Legend::from_colormap(&LinearColormap::flood_risk(2.5, 2.5));
        assert_eq!(legend.ticks(), ["2.50"]);
    }

    #[test]
    fn control_is_added_to_the_map() {
        let legend = Legend::from_colormap(&LinearColormap::flood_risk(0.0, 1.0));
        let js = legend.render_js("map").unwrap();
        assert!(js.starts_with("var legend = L.control({position: \"topright\"});"));
        assert!(js.trim_end().ends_with("legend.addTo(map);"));
    }
}
