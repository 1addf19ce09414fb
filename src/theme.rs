//! Theme loading and egui styling.
//!
//! A theme is a JSON object with exactly three color values. The key names
//! are the historical ones and are kept for compatibility with existing
//! theme files:
//!
//! ```json
//! {
//!     "backgroundcolor": "#1e1e2e",
//!     "backgroundcolorforbutton": "#313244",
//!     "foregroundcolor": "#cdd6f4"
//! }
//! ```
//!
//! Colors are `#rgb`/`#rrggbb` hex strings or one of a small set of names.
//! A replacement theme restyles every live window immediately: egui redraws
//! from the current [`egui::Visuals`] each frame, so one `set_visuals` call
//! covers the main window and the settings window alike.

use std::fs;
use std::path::Path;

use eframe::egui::{self, Color32};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TagFlowError};

/// A three-color palette as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Window background.
    #[serde(rename = "backgroundcolor")]
    pub background: String,

    /// Button background.
    #[serde(rename = "backgroundcolorforbutton")]
    pub button_background: String,

    /// Text color for labels and buttons.
    #[serde(rename = "foregroundcolor")]
    pub foreground: String,
}

impl Default for Theme {
    /// The built-in "silver glow" palette, used when no theme file loads.
    fn default() -> Self {
        Self {
            background: "#e8e8f0".to_string(),
            button_background: "#d0d0da".to_string(),
            foreground: "#20202a".to_string(),
        }
    }
}

impl Theme {
    /// Load a theme from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let contents =
            fs::read_to_string(path).map_err(|e| TagFlowError::theme_load(&display, e.to_string()))?;
        let theme: Theme = serde_json::from_str(&contents)
            .map_err(|e| TagFlowError::theme_load(&display, e.to_string()))?;
        // Reject unparsable colors at load time so a bad file never half-applies.
        theme
            .colors()
            .map_err(|e| TagFlowError::theme_load(&display, e.to_string()))?;
        Ok(theme)
    }

    /// Parse all three colors.
    pub fn colors(&self) -> Result<ThemeColors> {
        Ok(ThemeColors {
            background: parse_color(&self.background)?,
            button_background: parse_color(&self.button_background)?,
            foreground: parse_color(&self.foreground)?,
        })
    }
}

/// The palette parsed into egui colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Color32,
    pub button_background: Color32,
    pub foreground: Color32,
}

impl ThemeColors {
    /// Build the egui visuals for this palette.
    pub fn visuals(&self) -> egui::Visuals {
        // Pick the base set whose shadows/strokes fit the palette.
        let mut visuals = if is_light(self.background) {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.override_text_color = Some(self.foreground);

        for widget in [
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
            &mut visuals.widgets.open,
        ] {
            widget.bg_fill = self.button_background;
            widget.weak_bg_fill = self.button_background;
            widget.fg_stroke.color = self.foreground;
        }
        visuals.widgets.noninteractive.bg_fill = self.background;
        visuals.widgets.noninteractive.fg_stroke.color = self.foreground;

        visuals
    }
}

fn is_light(color: Color32) -> bool {
    let [r, g, b, _] = color.to_array();
    // Rec. 601 luma.
    (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000 > 128
}

/// Parse a `#rgb`/`#rrggbb` hex string or a named color.
pub fn parse_color(value: &str) -> Result<Color32> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(value, hex);
    }

    match trimmed.to_lowercase().as_str() {
        "black" => Ok(Color32::from_rgb(0x00, 0x00, 0x00)),
        "white" => Ok(Color32::from_rgb(0xff, 0xff, 0xff)),
        "red" => Ok(Color32::from_rgb(0xff, 0x00, 0x00)),
        "green" => Ok(Color32::from_rgb(0x00, 0x80, 0x00)),
        "blue" => Ok(Color32::from_rgb(0x00, 0x00, 0xff)),
        "yellow" => Ok(Color32::from_rgb(0xff, 0xff, 0x00)),
        "cyan" => Ok(Color32::from_rgb(0x00, 0xff, 0xff)),
        "magenta" => Ok(Color32::from_rgb(0xff, 0x00, 0xff)),
        "orange" => Ok(Color32::from_rgb(0xff, 0xa5, 0x00)),
        "purple" => Ok(Color32::from_rgb(0x80, 0x00, 0x80)),
        "gray" | "grey" => Ok(Color32::from_rgb(0x80, 0x80, 0x80)),
        "silver" => Ok(Color32::from_rgb(0xc0, 0xc0, 0xc0)),
        "navy" => Ok(Color32::from_rgb(0x00, 0x00, 0x80)),
        "teal" => Ok(Color32::from_rgb(0x00, 0x80, 0x80)),
        _ => Err(TagFlowError::invalid_color(
            value,
            "expected '#rgb', '#rrggbb', or a known color name",
        )),
    }
}

fn parse_hex(original: &str, hex: &str) -> Result<Color32> {
    if !hex.is_ascii() {
        return Err(TagFlowError::invalid_color(original, "invalid hex digit"));
    }
    let expand = |c: u8| (c << 4) | c;
    let digit = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| TagFlowError::invalid_color(original, "invalid hex digit"))
    };

    match hex.len() {
        3 => Ok(Color32::from_rgb(
            expand(digit(&hex[0..1])?),
            expand(digit(&hex[1..2])?),
            expand(digit(&hex[2..3])?),
        )),
        6 => Ok(Color32::from_rgb(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(TagFlowError::invalid_color(
            original,
            "expected 3 or 6 hex digits",
        )),
    }
}
