//! Color palette handler.

use axum::{Json, extract::Path};
use serde::Serialize;

use prodboard_core::color::{
    BadgeStyle, Rgb, badge_style, card_background, contrasting_text_color, hex_to_rgb,
    row_background,
};

/// Styles derived from one base color.
#[derive(Debug, Serialize)]
pub struct Palette {
    /// Parsed color, `null` when the input is not a 6-digit hex color.
    pub rgb: Option<Rgb>,
    pub text_color: &'static str,
    pub badge: BadgeStyle,
    pub row_background: String,
    pub card_background: String,
}

impl Palette {
    /// Derive every style from `color`, falling back to neutral values.
    #[must_use]
    pub fn from_color(color: &str) -> Self {
        let color = Some(color);
        Self {
            rgb: color.and_then(hex_to_rgb),
            text_color: contrasting_text_color(color),
            badge: badge_style(color),
            row_background: row_background(color),
            card_background: card_background(color),
        }
    }
}

/// `GET /api/colors/{color}` - `color` with or without a (percent-encoded)
/// leading `#`.
pub async fn palette(Path(color): Path<String>) -> Json<Palette> {
    Json(Palette::from_color(&color))
}
