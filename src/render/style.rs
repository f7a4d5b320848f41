use serde_json::{Map, Value};

/// Styling of one point category: its heat layer and its markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Layer control label, also the marker tooltip.
    pub name: &'static str,
    pub gradient: &'static [(f64, &'static str)],
    pub blur: u32,
    pub radius: u32,
    pub marker_color: &'static str,
    pub marker_icon: &'static str,
}

impl LayerStyle {
    /// Gradient as the `{ "0.1": "blue", ... }` object Leaflet.heat takes.
    pub fn gradient_json(&self) -> Value {
        let stops: Map<String, Value> = self
            .gradient
            .iter()
            .map(|(stop, color)| (stop.to_string(), Value::from(*color)))
            .collect();
        Value::Object(stops)
    }
}

pub const PICKUP: LayerStyle = LayerStyle {
    name: "Pickup",
    gradient: &[(0.1, "blue"), (0.5, "royalblue"), (0.9, "darkblue")],
    blur: 15,
    radius: 15,
    marker_color: "blue",
    marker_icon: "info-sign",
};

pub const DROPOFF: LayerStyle = LayerStyle {
    name: "Dropoff",
    gradient: &[(0.1, "orange"), (0.5, "red"), (0.9, "darkred")],
    blur: 15,
    radius: 15,
    marker_color: "red",
    marker_icon: "info-sign",
};
