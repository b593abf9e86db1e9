//! UI controls attached to the map. Each renders its own HTML and turns user
//! events into index requests for the controller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ControlEvent {
    Forward,
    Backward,
    /// Range input moved to a position
    Input(usize),
}

/// What a control wants the controller to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRequest {
    Advance,
    Retreat,
    Set(usize),
}

pub trait Control {
    fn render(&self) -> String;

    fn on_event(&mut self, event: &ControlEvent) -> Option<IndexRequest>;
}

/// Range input plus backward/forward step buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderControl {
    pub min: usize,
    pub max: usize,
    pub step: usize,
    pub value: usize,
}

impl SliderControl {
    /// Slider over `len` positions. `len` must be at least 1.
    pub fn new(len: usize) -> Self {
        Self {
            min: 0,
            max: len.saturating_sub(1),
            step: 1,
            value: 0,
        }
    }

    pub fn set_value(&mut self, value: usize) {
        self.value = value.min(self.max);
    }
}

impl Control for SliderControl {
    fn render(&self) -> String {
        format!(
            concat!(
                r#"<div class="sequence-control-container">"#,
                r#"<input class="range-slider" type="range" min="{}" max="{}" step="{}" value="{}">"#,
                r#"<button class="skip" id="backward">Backward</button>"#,
                r#"<button class="skip" id="forward">Forward</button>"#,
                "</div>"
            ),
            self.min, self.max, self.step, self.value
        )
    }

    fn on_event(&mut self, event: &ControlEvent) -> Option<IndexRequest> {
        match event {
            ControlEvent::Forward => Some(IndexRequest::Advance),
            ControlEvent::Backward => Some(IndexRequest::Retreat),
            ControlEvent::Input(i) => Some(IndexRequest::Set(*i)),
        }
    }
}
