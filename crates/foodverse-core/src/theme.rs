//! Store customization and its resolution into render-ready theme data.
//!
//! [`resolve`] turns a [`StoreCustomization`] into a [`ResolvedTheme`] that a
//! rendering layer consumes as plain data: a colour-scheme class, CSS
//! variables and display flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("invalid hex colour \"{0}\": expected #rrggbb")]
    InvalidColor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Colorful,
}

impl Theme {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Colorful => "colorful",
        }
    }

    /// Swatch shown next to the theme in a picker.
    #[must_use]
    pub fn preview_color(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#1f2937",
            Theme::Colorful => "#8b5cf6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
    Carousel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub open: String,
    pub close: String,
    pub is_open: bool,
}

impl BusinessHours {
    fn new(open: &str, close: &str, is_open: bool) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            is_open,
        }
    }
}

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreCustomization {
    pub theme: Theme,
    pub primary_color: String,
    pub layout: Layout,
    pub show_rating: bool,
    pub show_reviews: bool,
    pub auto_approve_orders: bool,
    pub notifications_enabled: bool,
    /// Keyed by lower-case weekday name.
    pub business_hours: BTreeMap<String, BusinessHours>,
}

impl StoreCustomization {
    /// Business hours Monday first; keys that are not weekday names follow in
    /// key order.
    #[must_use]
    pub fn hours_by_weekday(&self) -> Vec<(&str, &BusinessHours)> {
        let known = WEEKDAYS
            .iter()
            .filter_map(|day| self.business_hours.get_key_value(*day));
        let other = self
            .business_hours
            .iter()
            .filter(|(day, _)| !WEEKDAYS.contains(&day.as_str()));
        known
            .chain(other)
            .map(|(day, hours)| (day.as_str(), hours))
            .collect()
    }
}

impl Default for StoreCustomization {
    fn default() -> Self {
        let weekday = || BusinessHours::new("09:00", "17:00", true);
        let business_hours = [
            ("monday", weekday()),
            ("tuesday", weekday()),
            ("wednesday", weekday()),
            ("thursday", weekday()),
            ("friday", weekday()),
            ("saturday", BusinessHours::new("10:00", "16:00", true)),
            ("sunday", BusinessHours::new("10:00", "16:00", false)),
        ]
        .into_iter()
        .map(|(day, hours)| (day.to_string(), hours))
        .collect();

        Self {
            theme: Theme::Light,
            primary_color: "#3b82f6".to_string(),
            layout: Layout::Grid,
            show_rating: true,
            show_reviews: true,
            auto_approve_orders: false,
            notifications_enabled: true,
            business_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    pub color_scheme: &'static str,
    pub css_variables: Vec<(&'static str, String)>,
    pub layout: Layout,
    pub show_rating: bool,
    pub show_reviews: bool,
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8), ThemeError> {
    let invalid = || ThemeError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Black or white, whichever reads better on `hex`.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidColor`] unless `hex` is `#rrggbb` (the `#`
/// is optional).
pub fn contrast_color(hex: &str) -> Result<&'static str, ThemeError> {
    let (r, g, b) = parse_hex(hex)?;
    let luminance =
        (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
    Ok(if luminance > 0.5 { "#000000" } else { "#ffffff" })
}

/// Resolves customization into theme data.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidColor`] if the primary colour is malformed.
pub fn resolve(customization: &StoreCustomization) -> Result<ResolvedTheme, ThemeError> {
    let foreground = contrast_color(&customization.primary_color)?;
    Ok(ResolvedTheme {
        color_scheme: customization.theme.class_name(),
        css_variables: vec![
            ("--primary", customization.primary_color.clone()),
            ("--primary-foreground", foreground.to_string()),
        ],
        layout: customization.layout,
        show_rating: customization.show_rating,
        show_reviews: customization.show_reviews,
    })
}
