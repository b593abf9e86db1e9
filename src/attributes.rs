//! Discovery of the year-keyed attributes that make up the time dimension.

use crate::config::{Discovery, InputConfig};
use crate::types::Feature;
use tracing::{debug, warn};

/// Year keys of `features[reference_index]` containing `marker`, in property order.
/// Empty if the reference feature does not exist or has no matching keys.
pub fn extract_attributes(features: &[Feature], reference_index: usize, marker: &str) -> Vec<String> {
    let Some(reference) = features.get(reference_index) else {
        warn!("Reference feature {} not present ({} features)", reference_index, features.len());
        return Vec::new();
    };

    reference.properties.keys()
        .filter(|key| key.contains(marker))
        .cloned()
        .collect()
}

/// Every matching key seen on any feature, sorted by year. Keys with the same
/// year keep the order in which they were first seen.
pub fn discover_union(features: &[Feature], marker: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for feature in features {
        for key in feature.properties.keys() {
            if key.contains(marker) && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys.sort_by(|a, b| year_of(a).cmp(year_of(b)));
    keys
}

pub fn discover(features: &[Feature], input: &InputConfig) -> Vec<String> {
    let series = match input.discovery {
        Discovery::Union => discover_union(features, &input.year_marker),
        Discovery::Reference => {
            extract_attributes(features, input.reference_feature, &input.year_marker)
        }
    };
    debug!("Attribute series: {:?}", series);
    series
}

/// Text before the first `_`, e.g. `"2010"` for `"2010_pct"`.
pub fn year_of(attribute: &str) -> &str {
    attribute.split('_').next().unwrap_or(attribute)
}
