use crate::attributes::year_of;
use crate::config::LegendConfig;
use crate::controls::{Control, ControlEvent, IndexRequest};
use crate::error::Result;
use crate::symbols::{format_number, radius_scaled, round_to};
use crate::types::LegendStats;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendCircle {
    pub key: &'static str,
    pub radius: f64,
    pub cy: f64,
    pub label: String,
}

/// Max/mean/min reference circles and the temporal caption.
#[derive(Debug, Clone, Serialize)]
pub struct LegendPresenter {
    #[serde(skip)]
    config: LegendConfig,
    #[serde(skip)]
    scale: f64,
    pub caption: String,
    pub circles: [LegendCircle; 3],
}

impl LegendPresenter {
    pub fn new(config: LegendConfig, scale: f64) -> Self {
        let circles = ["max", "mean", "min"].map(|key| LegendCircle {
            key,
            radius: 0.0,
            cy: config.baseline,
            label: String::new(),
        });
        Self {
            config,
            scale,
            caption: String::new(),
            circles,
        }
    }

    pub fn refresh(&mut self, attribute: &str, stats: &Result<LegendStats>) {
        self.caption = format!("{} {}", self.config.caption_prefix, year_of(attribute));

        match stats {
            Ok(stats) => {
                for (circle, (_, value)) in self.circles.iter_mut().zip(stats.entries()) {
                    let radius = radius_scaled(value, self.scale).unwrap_or(0.0);
                    circle.radius = radius;
                    circle.cy = self.config.baseline - radius;
                    circle.label = format!("{} percent", format_number(round_to(value, 2)));
                }
            }
            Err(e) => {
                debug!("Legend has no data for {}: {}", attribute, e);
                for circle in self.circles.iter_mut() {
                    circle.radius = 0.0;
                    circle.cy = self.config.baseline;
                    circle.label = "no data".to_string();
                }
            }
        }
    }

    pub fn circle(&self, key: &str) -> Option<&LegendCircle> {
        self.circles.iter().find(|c| c.key == key)
    }

    pub fn render_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg id="attribute-legend" xmlns="http://www.w3.org/2000/svg" width="{}px" height="{}px">"#,
            self.config.width, self.config.height
        );
        for (circle, y) in self.circles.iter().zip(self.config.text_rows) {
            svg += &format!(
                r##"<circle class="legend-circle" id="{}" fill="{}" fill-opacity="0.8" stroke="#000000" cx="{}" cy="{}" r="{}"/>"##,
                circle.key, self.config.fill_color, self.config.circle_x, circle.cy, circle.radius
            );
            svg += &format!(
                r#"<text id="{}-text" x="{}" y="{}">{}</text>"#,
                circle.key, self.config.text_x, y, circle.label
            );
        }
        svg += "</svg>";
        svg
    }
}

impl Control for LegendPresenter {
    fn render(&self) -> String {
        format!(
            r#"<div class="legend-container"><div id="temporal-legend">{}</div>{}</div>"#,
            self.caption,
            self.render_svg()
        )
    }

    fn on_event(&mut self, _event: &ControlEvent) -> Option<IndexRequest> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolError;
    use crate::symbols::{radius, SCALE_FACTOR};

    fn presenter() -> LegendPresenter {
        LegendPresenter::new(LegendConfig::default(), SCALE_FACTOR)
    }

    #[test]
    fn test_refresh_sizes_and_labels() {
        let mut legend = presenter();
        let stats = LegendStats { max: 9.0, mean: 6.0, min: 3.0 };
        legend.refresh("2014_pct", &Ok(stats));

        assert_eq!(legend.caption, "Percent homeless in 2014");
        let max = legend.circle("max").unwrap();
        assert_eq!(max.radius, radius(9.0).unwrap());
        assert_eq!(max.cy, 59.0 - max.radius);
        assert_eq!(max.label, "9 percent");
        assert_eq!(legend.circle("mean").unwrap().label, "6 percent");
        assert_eq!(legend.circle("min").unwrap().label, "3 percent");
    }

    #[test]
    fn test_labels_round_to_two_decimals() {
        let mut legend = presenter();
        let stats = LegendStats { max: 5.006, mean: 4.5, min: 3.99999 };
        legend.refresh("2010_pct", &Ok(stats));
        assert_eq!(legend.circle("max").unwrap().label, "5.01 percent");
        assert_eq!(legend.circle("min").unwrap().label, "4 percent");
    }

    #[test]
    fn test_no_data() {
        let mut legend = presenter();
        legend.refresh("2019_pct", &Err(SymbolError::EmptyFeatureSet));
        assert_eq!(legend.caption, "Percent homeless in 2019");
        for circle in &legend.circles {
            assert_eq!(circle.radius, 0.0);
            assert_eq!(circle.label, "no data");
        }
    }

    #[test]
    fn test_render_svg() {
        let mut legend = presenter();
        legend.refresh("2010_pct", &Ok(LegendStats { max: 2.0, mean: 1.5, min: 1.0 }));
        let html = legend.render();
        assert!(html.contains(r#"<div id="temporal-legend">Percent homeless in 2010</div>"#));
        assert!(html.contains(r#"width="160px" height="90px""#));
        assert!(html.contains(r#"<text id="mean-text" x="65" y="40">1.5 percent</text>"#));
        assert_eq!(legend.clone().on_event(&ControlEvent::Forward), None);
    }
}
