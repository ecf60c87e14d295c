//! Tooltip overlay state

use serde::{Deserialize, Serialize};

use crate::weather::WeatherSample;

/// Offset of the tooltip from the cursor, pixels
pub const CURSOR_OFFSET: f64 = 10.0;

/// Result of one pointer-move hit-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TooltipUpdate {
    Show { left: f64, top: f64, content: String },
    Hide,
}

impl TooltipUpdate {
    /// Tooltip for `sample` next to the cursor at (`x`, `y`)
    #[must_use]
    pub fn show(sample: &WeatherSample, x: f64, y: f64) -> Self {
        TooltipUpdate::Show {
            left: x + CURSOR_OFFSET,
            top: y + CURSOR_OFFSET,
            content: tooltip_content(sample),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, TooltipUpdate::Show { .. })
    }
}

/// Externally observable tooltip element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub html: String,
}

impl Tooltip {
    pub fn apply(&mut self, update: &TooltipUpdate) {
        match update {
            TooltipUpdate::Show { left, top, content } => {
                self.visible = true;
                self.left = *left;
                self.top = *top;
                self.html.clone_from(content);
            }
            // position and content are left as they were, only hidden
            TooltipUpdate::Hide => self.visible = false,
        }
    }
}

/// Upper-case the first character, leave the rest alone
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn tooltip_content(sample: &WeatherSample) -> String {
    format!(
        "<strong>{}</strong><br>Temp: {}<br>Weather: {}",
        sample.city,
        sample.format_temperature(),
        capitalize_first(&sample.description)
    )
}
