//! Askama filters for storefront pages.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use storeadmin_core::HexColor;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// A color value safe to place in a `style` attribute.
///
/// Anything that is not a hex code renders as `transparent`.
///
/// Usage in templates: `{{ color.value|swatch }}`
#[askama::filter_fn]
pub fn swatch(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(swatch_color(&value.to_string()))
}

fn swatch_color(raw: &str) -> String {
    HexColor::parse(raw).map_or_else(|_| "transparent".to_string(), |color| color.to_string())
}
