//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;
use storeadmin_core::{HexColor, format_usd};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as USD.
///
/// Usage in templates: `{{ overview.total_revenue|usd }}`
#[askama::filter_fn]
pub fn usd(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(raw
        .parse::<Decimal>()
        .map_or(raw, format_usd))
}

/// A color value safe to place in a `style` attribute. Unsaved form input
/// that is not a hex code renders as `transparent`.
///
/// Usage in templates: `{{ field.value|swatch }}`
#[askama::filter_fn]
pub fn swatch(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(HexColor::parse(&raw).map_or_else(|_| "transparent".to_string(), |c| c.to_string()))
}
