//! Marker filter widget: three range sliders and the script that hides
//! markers below the slider thresholds.
//!
//! The element ids, the `risk`/`elev`/`rain` marker options and the
//! `L.map_instances[0]` lookup form the contract with the map script. The
//! fragment does not depend on the data.

use crate::map::{HtmlFragment, MarkerAttributes};

/// One range input and its numeric readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    /// `<input>` element id.
    pub id: &'static str,
    /// `<span>` readout element id.
    pub value_id: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    /// Marker option compared against this slider.
    pub attribute: &'static str,
}

pub const RISK_SLIDER: SliderSpec = SliderSpec {
    id: "riskSlider",
    value_id: "riskVal",
    label: "Risk",
    min: 0.0,
    max: 100.0,
    step: 1.0,
    default: 0.0,
    attribute: "risk",
};

pub const ELEVATION_SLIDER: SliderSpec = SliderSpec {
    id: "elevSlider",
    value_id: "elevVal",
    label: "Elevation",
    min: 0.0,
    max: 1000.0,
    step: 10.0,
    default: 0.0,
    attribute: "elev",
};

pub const RAINFALL_SLIDER: SliderSpec = SliderSpec {
    id: "rainSlider",
    value_id: "rainVal",
    label: "Rainfall",
    min: 0.0,
    max: 50.0,
    step: 0.1,
    default: 0.0,
    attribute: "rain",
};

pub const SLIDERS: [SliderSpec; 3] = [RISK_SLIDER, ELEVATION_SLIDER, RAINFALL_SLIDER];

/// Current slider positions. [`FilterState::admits`] is the same test the
/// page script applies to each marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    pub risk: f64,
    pub elev: f64,
    pub rain: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            risk: RISK_SLIDER.default,
            elev: ELEVATION_SLIDER.default,
            rain: RAINFALL_SLIDER.default,
        }
    }
}

impl FilterState {
    /// A marker is shown only if every attribute reaches its threshold.
    pub fn admits(&self, marker: &MarkerAttributes) -> bool {
        marker.risk >= self.risk && marker.elev >= self.elev && marker.rain >= self.rain
    }
}

fn slider_markup(s: &SliderSpec) -> String {
    format!(
        "{label}: <input type=\"range\" id=\"{id}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{default}\"> \
         <span id=\"{value_id}\">{default}</span>",
        label = s.label,
        id = s.id,
        min = s.min,
        max = s.max,
        step = s.step,
        default = s.default,
        value_id = s.value_id,
    )
}

const FILTER_SCRIPT: &str = r#"<script>
(function () {
    var map = window.L.map_instances[0];
    var markers = [];
    for (var key in map._layers) {
        var layer = map._layers[key];
        if (layer instanceof L.CircleMarker) { markers.push(layer); }
    }
    var riskSlider = document.getElementById('riskSlider');
    var elevSlider = document.getElementById('elevSlider');
    var rainSlider = document.getElementById('rainSlider');
    var riskVal = document.getElementById('riskVal');
    var elevVal = document.getElementById('elevVal');
    var rainVal = document.getElementById('rainVal');

    function updateMarkers() {
        var r = parseFloat(riskSlider.value);
        var e = parseFloat(elevSlider.value);
        var ra = parseFloat(rainSlider.value);
        riskVal.innerHTML = r;
        elevVal.innerHTML = e;
        rainVal.innerHTML = ra;
        markers.forEach(function (m) {
            if (m.options.risk >= r && m.options.elev >= e && m.options.rain >= ra) {
                m.setStyle({fillOpacity: 0.8, opacity: 1});
            } else {
                m.setStyle({fillOpacity: 0, opacity: 0});
            }
        });
    }

    riskSlider.addEventListener('input', updateMarkers);
    elevSlider.addEventListener('input', updateMarkers);
    rainSlider.addEventListener('input', updateMarkers);
})();
</script>"#;

/// The filter panel and its script, ready to inject after the map script.
pub fn filter_widget() -> HtmlFragment {
    let sliders: Vec<String> = SLIDERS.iter().map(slider_markup).collect();
    HtmlFragment::new(format!(
        "<div id=\"markerFilter\" style=\"position: fixed; bottom: 50px; left: 50px; z-index: 9999; \
         background: white; padding: 10px; border: 2px solid gray;\">\n\
         <h4>Filter Markers</h4>\n{}\n</div>\n{FILTER_SCRIPT}",
        sliders.join("<br>\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(risk: f64, elev: f64, rain: f64) -> MarkerAttributes {
        MarkerAttributes { risk, elev, rain }
    }

    #[test]
    fn defaults_show_everything_non_negative() {
        let f = FilterState::default();
        assert!(f.admits(&marker(0.0, 0.0, 0.0)));
        assert!(f.admits(&marker(3.2, 812.0, 41.7)));
    }

    #[test]
    fn risk_threshold_ignores_other_sliders_at_default() {
        let f = FilterState { risk: 50.0, ..FilterState::default() };
        assert!(!f.admits(&marker(49.99, 900.0, 45.0)));
        assert!(f.admits(&marker(50.0, 0.0, 0.0)));
        assert!(f.admits(&marker(73.0, 5.0, 0.1)));
    }

    #[test]
    fn every_threshold_must_be_met() {
        let f = FilterState { risk: 10.0, elev: 100.0, rain: 20.0 };
        assert!(f.admits(&marker(10.0, 100.0, 20.0)));
        assert!(!f.admits(&marker(10.0, 99.0, 20.0)));
        assert!(!f.admits(&marker(10.0, 100.0, 19.9)));
    }

    #[test]
    fn markup_has_fixed_ids_and_ranges() {
        let html = filter_widget().as_str().to_string();
        assert!(html.contains(r#"<input type="range" id="riskSlider" min="0" max="100" step="1" value="0">"#));
        assert!(html.contains(r#"<input type="range" id="elevSlider" min="0" max="1000" step="10" value="0">"#));
        assert!(html.contains(r#"<input type="range" id="rainSlider" min="0" max="50" step="0.1" value="0">"#));
        for id in ["riskVal", "elevVal", "rainVal"] {
            assert!(html.contains(&format!("<span id=\"{id}\">0</span>")));
        }
        assert!(html.contains("<h4>Filter Markers</h4>"));
    }

    #[test]
    fn script_reads_marker_options_from_first_map() {
        let html = filter_widget().as_str().to_string();
        assert!(html.contains("window.L.map_instances[0]"));
        assert!(html.contains("instanceof L.CircleMarker"));
        assert!(html.contains("m.options.risk >= r && m.options.elev >= e && m.options.rain >= ra"));
        assert!(html.contains("m.setStyle({fillOpacity: 0, opacity: 0});"));
        assert_eq!(html.matches("addEventListener('input', updateMarkers)").count(), 3);
        for s in SLIDERS {
            assert!(html.contains(&format!("m.options.{}", s.attribute)));
        }
    }
}
