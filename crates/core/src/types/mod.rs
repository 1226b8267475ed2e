//! Core types for the store admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod text;

pub use id::*;
pub use price::{Price, PriceError, format_usd};
pub use text::{Email, HexColor, RequiredText, TextError};
