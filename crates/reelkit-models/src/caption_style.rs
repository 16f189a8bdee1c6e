//! Caption styling for subtitle burn-in.

use serde::{Deserialize, Serialize};

/// Style parameters for burned-in captions.
///
/// Colours use the ASS `&HBBGGRR&` convention expected by the subtitles
/// filter's `force_style` argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    /// Font family name.
    pub font_name: String,
    /// Font size in points.
    pub font_size: u32,
    /// Primary (fill) colour.
    pub primary_colour: String,
    /// Outline colour.
    pub outline_colour: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 24,
            primary_colour: "&HFFFFFF&".to_string(),
            outline_colour: "&H000000&".to_string(),
        }
    }
}

impl CaptionStyle {
    /// Builder-style setter for the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Builder-style setter for the font size.
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Render the `force_style` argument for the subtitles filter.
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},FontSize={},PrimaryColour={},OutlineColour={}",
            self.font_name, self.font_size, self.primary_colour, self.outline_colour
        )
    }
}
