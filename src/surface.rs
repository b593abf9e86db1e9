//! The map rendering surface: something that can draw sized circle markers with popups.

use crate::config::SymbolConfig;
use crate::types::{Popup, SymbolState};
use geo::Point;
use serde::Serialize;

pub type MarkerId = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl From<&SymbolConfig> for MarkerStyle {
    fn from(config: &SymbolConfig) -> Self {
        Self {
            fill_color: config.fill_color.clone(),
            color: config.stroke_color.clone(),
            weight: config.weight,
            opacity: config.opacity,
            fill_opacity: config.fill_opacity,
        }
    }
}

pub trait MapSurface {
    /// Draws a new circle marker for `feature_id` and returns its handle.
    fn place_marker(&mut self, feature_id: &str, at: Point<f64>, style: &MarkerStyle, symbol: SymbolState) -> MarkerId;

    fn update_marker(&mut self, marker: MarkerId, symbol: SymbolState);

    fn set_popup_open(&mut self, marker: MarkerId, open: bool);

    /// Markers currently on the surface as `(marker, feature id)`.
    fn markers(&self) -> Vec<(MarkerId, String)>;

    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub feature_id: String,
    pub lat: f64,
    pub lng: f64,
    pub style: MarkerStyle,
    pub radius: Option<f64>,
    pub popup: Popup,
    pub popup_open: bool,
}

/// In-memory surface that keeps the latest state of every marker.
#[derive(Debug, Default, Clone)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, marker: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == marker)
    }

    pub fn all(&self) -> &[Marker] {
        &self.markers
    }

    fn get_mut(&mut self, marker: MarkerId) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == marker)
    }
}

impl MapSurface for MarkerLayer {
    fn place_marker(&mut self, feature_id: &str, at: Point<f64>, style: &MarkerStyle, symbol: SymbolState) -> MarkerId {
        let id = self.markers.last().map_or(0, |m| m.id + 1);
        self.markers.push(Marker {
            id,
            feature_id: feature_id.to_string(),
            lat: at.y(),
            lng: at.x(),
            style: style.clone(),
            radius: symbol.radius,
            popup: symbol.popup,
            popup_open: false,
        });
        id
    }

    fn update_marker(&mut self, marker: MarkerId, symbol: SymbolState) {
        if let Some(m) = self.get_mut(marker) {
            m.radius = symbol.radius;
            m.popup = symbol.popup;
        }
    }

    fn set_popup_open(&mut self, marker: MarkerId, open: bool) {
        if let Some(m) = self.get_mut(marker) {
            // hidden markers cannot be hovered
            m.popup_open = open && m.radius.is_some();
        }
    }

    fn markers(&self) -> Vec<(MarkerId, String)> {
        self.markers.iter().map(|m| (m.id, m.feature_id.clone())).collect()
    }

    fn clear(&mut self) {
        self.markers.clear();
    }
}
