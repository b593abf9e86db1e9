use crate::error::{Result, SymbolError};
use crate::types::{Feature, LegendStats};

/// Max, min and midpoint of `attribute` across `features`.
///
/// `mean` is `(max + min) / 2`, not the average of all values. Features without a
/// usable (finite, non-negative) value are skipped; if that leaves nothing the
/// result is an error instead of infinite sentinels.
pub fn compute<'a, I>(features: I, attribute: &str) -> Result<LegendStats>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut seen_any = false;
    let mut bounds: Option<(f64, f64)> = None;

    for feature in features {
        seen_any = true;
        let Some(value) = feature.value(attribute) else { continue };
        if !value.is_finite() || value < 0.0 {
            continue;
        }
        bounds = Some(match bounds {
            Some((max, min)) => (max.max(value), min.min(value)),
            None => (value, value),
        });
    }

    match bounds {
        Some((max, min)) => Ok(LegendStats { max, mean: (max + min) / 2.0, min }),
        None if seen_any => Err(SymbolError::MissingAttributeKey(attribute.to_string())),
        None => Err(SymbolError::EmptyFeatureSet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use serde_json::json;

    fn city(value: serde_json::Value) -> Feature {
        Feature {
            id: "c".to_string(),
            position: Point::new(0.0, 0.0),
            name: "City".to_string(),
            properties: json!({"name": "City", "2010_pct": value}).as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_mean_is_midpoint() {
        let features = vec![city(json!(3)), city(json!(7)), city(json!(9))];
        let stats = compute(&features, "2010_pct").unwrap();
        assert_eq!(stats, LegendStats { max: 9.0, mean: 6.0, min: 3.0 });
    }

    #[test]
    fn test_skips_unusable_values() {
        let features = vec![city(json!(2)), city(json!("n/a")), city(json!(-4)), city(json!(8))];
        let stats = compute(&features, "2010_pct").unwrap();
        assert_eq!(stats.max, 8.0);
        assert_eq!(stats.min, 2.0);
    }

    #[test]
    fn test_single_feature() {
        let features = vec![city(json!(4.5))];
        let stats = compute(&features, "2010_pct").unwrap();
        assert_eq!(stats, LegendStats { max: 4.5, mean: 4.5, min: 4.5 });
    }

    #[test]
    fn test_empty_feature_set() {
        let features: Vec<Feature> = Vec::new();
        assert_eq!(compute(&features, "2010_pct"), Err(SymbolError::EmptyFeatureSet));
    }

    #[test]
    fn test_missing_attribute() {
        let features = vec![city(json!(3))];
        assert_eq!(
            compute(&features, "2019_pct"),
            Err(SymbolError::MissingAttributeKey("2019_pct".to_string()))
        );
    }
}
