//! Hex color helpers for role and category badges.
//!
//! Every helper is total: a missing or unparseable color degrades to a fixed
//! neutral value instead of failing.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Text color returned when no usable base color is supplied.
pub const DEFAULT_TEXT_COLOR: &str = "#374151";
/// Text color used on light backgrounds.
pub const DARK_TEXT_COLOR: &str = "#111827";
/// Text color used on dark backgrounds.
pub const LIGHT_TEXT_COLOR: &str = "#ffffff";

const BADGE_BACKGROUND_ALPHA: f64 = 0.15;
const BADGE_BORDER_ALPHA: f64 = 0.3;
const CARD_BACKGROUND_ALPHA: f64 = 0.1;
const ROW_BACKGROUND_ALPHA: f64 = 0.063;

const FALLBACK_BADGE_BACKGROUND: &str = "#f3f4f6";
const FALLBACK_BADGE_BORDER: &str = "#e5e7eb";
const FALLBACK_CARD_BACKGROUND: &str = "#ffffff";
const FALLBACK_ROW_BACKGROUND: &str = "transparent";

/// Perceived luminance above which dark text is used.
const LUMINANCE_THRESHOLD: f64 = 0.5;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived luminance in `[0, 1]` using the 0.299/0.587/0.114 weights.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        (0.299f64.mul_add(
            f64::from(self.r),
            0.587f64.mul_add(f64::from(self.g), 0.114 * f64::from(self.b)),
        )) / 255.0
    }

    /// CSS `rgba()` form with the given alpha.
    #[must_use]
    pub fn to_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a 6-digit hex color, with or without a leading `#`.
///
/// Hex digits are case-insensitive. Shorthand (`#fff`), alpha (`#rrggbbaa`)
/// and named colors are rejected.
///
/// ```
/// use prodboard_core::color::{Rgb, hex_to_rgb};
///
/// assert_eq!(hex_to_rgb("#ff0000"), Some(Rgb::new(255, 0, 0)));
/// assert_eq!(hex_to_rgb("00FF7f"), Some(Rgb::new(0, 255, 127)));
/// assert_eq!(hex_to_rgb("not-a-color"), None);
/// ```
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: core::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn parse(color: Option<&str>) -> Option<Rgb> {
    color.and_then(hex_to_rgb)
}

/// Text color that stays readable on top of `background`.
///
/// Returns [`DARK_TEXT_COLOR`] for light backgrounds, [`LIGHT_TEXT_COLOR`]
/// for dark ones and [`DEFAULT_TEXT_COLOR`] when the color is missing or
/// unparseable.
#[must_use]
pub fn contrasting_text_color(background: Option<&str>) -> &'static str {
    match parse(background) {
        Some(rgb) if rgb.luminance() > LUMINANCE_THRESHOLD => DARK_TEXT_COLOR,
        Some(_) => LIGHT_TEXT_COLOR,
        None => DEFAULT_TEXT_COLOR,
    }
}

/// Inline style for a translucent badge tinted with a base color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStyle {
    pub background_color: String,
    pub border_color: String,
    pub color: String,
}

impl BadgeStyle {
    fn neutral() -> Self {
        Self {
            background_color: FALLBACK_BADGE_BACKGROUND.to_owned(),
            border_color: FALLBACK_BADGE_BORDER.to_owned(),
            color: DEFAULT_TEXT_COLOR.to_owned(),
        }
    }
}

/// Badge style derived from `color`, or a neutral gray badge.
#[must_use]
pub fn badge_style(color: Option<&str>) -> BadgeStyle {
    parse(color).map_or_else(BadgeStyle::neutral, |rgb| BadgeStyle {
        background_color: rgb.to_rgba(BADGE_BACKGROUND_ALPHA),
        border_color: rgb.to_rgba(BADGE_BORDER_ALPHA),
        color: rgb.to_string(),
    })
}

/// Faint tint for a table row.
#[must_use]
pub fn row_background(color: Option<&str>) -> String {
    parse(color).map_or_else(
        || FALLBACK_ROW_BACKGROUND.to_owned(),
        |rgb| rgb.to_rgba(ROW_BACKGROUND_ALPHA),
    )
}

/// Light tint for a card.
#[must_use]
pub fn card_background(color: Option<&str>) -> String {
    parse(color).map_or_else(
        || FALLBACK_CARD_BACKGROUND.to_owned(),
        |rgb| rgb.to_rgba(CARD_BACKGROUND_ALPHA),
    )
}
