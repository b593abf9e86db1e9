use geo::Point;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct Feature {
    pub id: String,
    // x = longitude, y = latitude
    pub position: Point<f64>,
    pub name: String,
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Numeric value of a property. Numeric strings are accepted, anything else is `None`.
    pub fn value(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendStats {
    pub max: f64,
    pub mean: f64,
    pub min: f64,
}

impl LegendStats {
    /// `(key, value)` pairs in legend drawing order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [("max", self.max), ("mean", self.mean), ("min", self.min)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub html: String,
    pub offset: (f64, f64),
}

/// Derived per-marker rendering state. `radius` is `None` when the feature has no
/// usable value for the active year and is hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolState {
    pub radius: Option<f64>,
    pub popup: Popup,
}
