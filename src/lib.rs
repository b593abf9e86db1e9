pub mod types;
pub mod error;
pub mod config;
pub mod data;
pub mod attributes;
pub mod symbols;
pub mod stats;
pub mod surface;
pub mod controls;
pub mod legend;
pub mod controller;
pub mod server;

use crate::config::AppConfig;
use crate::controller::SymbolSeriesController;
use crate::surface::MapSurface;

/// Loads the dataset, discovers the year series and renders index 0 onto `surface`.
pub fn build<S: MapSurface>(config: &AppConfig, surface: S) -> error::Result<SymbolSeriesController<S>> {
    let features = data::load_features(&config.input)?;
    let series = attributes::discover(&features, &config.input);
    SymbolSeriesController::new(surface, features, series, config)
}
