use crate::config::InputConfig;
use crate::error::{Result, SymbolError};
use crate::types::Feature;
use geojson::{feature::Id, GeoJson};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::{info, warn};

pub fn load_features(input: &InputConfig) -> Result<Vec<Feature>> {
    info!("Loading GeoJSON from {:?}...", input.geojson);
    let file = File::open(&input.geojson)
        .map_err(|e| SymbolError::DataLoad(format!("{:?}: {}", input.geojson, e)))?;
    let features = parse_features(BufReader::new(file), &input.name_property)?;
    info!("Loaded {} point features", features.len());
    Ok(features)
}

/// Parses a point FeatureCollection. Features without point geometry are skipped.
pub fn parse_features<R: Read>(reader: R, name_property: &str) -> Result<Vec<Feature>> {
    let geojson = GeoJson::from_reader(reader)
        .map_err(|e| SymbolError::DataLoad(format!("Failed to parse GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(SymbolError::DataLoad("GeoJSON must be a FeatureCollection".to_string())),
    };

    let mut features = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.into_iter().enumerate() {
        let id = match &feature.id {
            Some(Id::String(s)) => s.clone(),
            Some(Id::Number(n)) => n.to_string(),
            None => i.to_string(),
        };

        let position = match feature.geometry {
            Some(geom) => {
                let geometry: geo::Geometry<f64> = match geom.value.try_into() {
                    Ok(g) => g,
                    Err(e) => {
                        warn!("Skipping feature {}: {:?}", id, e);
                        continue;
                    }
                };
                match geometry {
                    geo::Geometry::Point(p) => p,
                    _ => {
                        warn!("Skipping feature {}: not a point", id);
                        continue;
                    }
                }
            }
            None => continue,
        };

        let properties = feature.properties.unwrap_or_default();
        let name = match properties.get(name_property) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => id.clone(),
        };

        features.push(Feature {
            id,
            position,
            name,
            properties,
        });
    }

    Ok(features)
}
