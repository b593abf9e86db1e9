use crate::attributes::year_of;
use crate::config::AppConfig;
use crate::controls::{Control, ControlEvent, IndexRequest, SliderControl};
use crate::error::{Result, SymbolError};
use crate::legend::LegendPresenter;
use crate::stats;
use crate::surface::{MapSurface, Marker, MarkerId, MarkerLayer, MarkerStyle};
use crate::symbols::{format_number, radius_scaled, round_to};
use crate::types::{Feature, Popup, SymbolState};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Everything the map shows for one active index.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub index: usize,
    pub attribute: String,
    pub year: String,
    pub markers: Vec<Marker>,
    pub legend: LegendPresenter,
    pub slider: SliderControl,
}

/// Owns the active index and keeps the markers, legend and slider in step with it.
pub struct SymbolSeriesController<S: MapSurface> {
    surface: S,
    features: Vec<Feature>,
    series: Vec<String>,
    index: usize,
    scale: f64,
    // marker -> position in `features`
    markers: HashMap<MarkerId, usize>,
    slider: SliderControl,
    legend: LegendPresenter,
}

impl<S: MapSurface> SymbolSeriesController<S> {
    /// Places one marker per feature at index 0 and builds the controls.
    pub fn new(mut surface: S, features: Vec<Feature>, series: Vec<String>, config: &AppConfig) -> Result<Self> {
        if series.is_empty() {
            return Err(SymbolError::EmptySeries);
        }

        let scale = config.symbols.scale_factor;
        let style = MarkerStyle::from(&config.symbols);
        let mut markers = HashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let symbol = symbol_for(feature, &series[0], scale);
            let id = surface.place_marker(&feature.id, feature.position, &style, symbol);
            markers.insert(id, i);
        }
        info!("Placed {} markers over {} years", markers.len(), series.len());

        let mut controller = Self {
            surface,
            features,
            slider: SliderControl::new(series.len()),
            legend: LegendPresenter::new(config.legend.clone(), scale),
            series,
            index: 0,
            scale,
            markers,
        };
        controller.apply();
        Ok(controller)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn attribute(&self) -> &str {
        &self.series[self.index]
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn legend(&self) -> &LegendPresenter {
        &self.legend
    }

    pub fn slider(&self) -> &SliderControl {
        &self.slider
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.series.len();
        self.apply();
        self.index
    }

    pub fn retreat(&mut self) -> usize {
        let len = self.series.len();
        self.index = (self.index + len - 1) % len;
        self.apply();
        self.index
    }

    /// Out-of-range indices are rejected and leave the current index untouched.
    pub fn set_index(&mut self, index: usize) -> Result<usize> {
        if index >= self.series.len() {
            return Err(SymbolError::InvalidIndex { index, len: self.series.len() });
        }
        self.index = index;
        self.apply();
        Ok(self.index)
    }

    pub fn handle(&mut self, event: ControlEvent) -> Result<usize> {
        match self.slider.on_event(&event) {
            Some(IndexRequest::Advance) => Ok(self.advance()),
            Some(IndexRequest::Retreat) => Ok(self.retreat()),
            Some(IndexRequest::Set(i)) => self.set_index(i),
            None => Ok(self.index),
        }
    }

    /// Opens the popup while the pointer is over the marker, closes it on leave.
    pub fn hover(&mut self, marker: MarkerId, entered: bool) {
        self.surface.set_popup_open(marker, entered);
    }

    /// Removes every marker this controller placed and hands the surface back.
    pub fn teardown(mut self) -> S {
        self.surface.clear();
        self.surface
    }

    pub fn render_controls(&self) -> String {
        let controls: [&dyn Control; 2] = [&self.slider, &self.legend];
        controls.iter().map(|c| c.render()).collect()
    }

    // Re-renders markers, slider and legend for the current index.
    fn apply(&mut self) {
        let attribute = self.series[self.index].clone();
        debug!("Rendering index {} ({})", self.index, attribute);

        let mut rendered = Vec::with_capacity(self.markers.len());
        for (marker, _) in self.surface.markers() {
            let Some(&i) = self.markers.get(&marker) else { continue };
            let feature = &self.features[i];
            self.surface.update_marker(marker, symbol_for(feature, &attribute, self.scale));
            rendered.push(feature);
        }

        self.slider.set_value(self.index);
        let stats = stats::compute(rendered, &attribute);
        self.legend.refresh(&attribute, &stats);
    }
}

impl SymbolSeriesController<MarkerLayer> {
    pub fn frame(&self) -> Frame {
        let attribute = self.attribute().to_string();
        Frame {
            index: self.index,
            year: year_of(&attribute).to_string(),
            attribute,
            markers: self.surface.all().to_vec(),
            legend: self.legend.clone(),
            slider: self.slider.clone(),
        }
    }
}

/// Radius and popup for `feature` in the year given by `attribute`.
pub fn symbol_for(feature: &Feature, attribute: &str, scale: f64) -> SymbolState {
    let value = feature.value(attribute);
    let radius = value.and_then(|v| radius_scaled(v, scale).ok());

    let mut html = format!("<p><b>City:</b> {}</p>", feature.name);
    let year = year_of(attribute);
    match (value, radius) {
        (Some(v), Some(_)) => {
            html += &format!("<p><b>% Pop Homeless in {}:</b> {}%</p>", year, format_number(round_to(v, 2)));
        }
        _ => {
            html += &format!("<p><b>% Pop Homeless in {}:</b> no data</p>", year);
        }
    }

    SymbolState {
        radius,
        popup: Popup {
            html,
            offset: (0.0, -radius.unwrap_or(0.0)),
        },
    }
}
