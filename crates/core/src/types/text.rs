//! Validated text fields.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a text field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The input is empty or only whitespace.
    #[error("is required")]
    Empty,
    /// The input is too long.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not a hex color code.
    #[error("must be a hex code like #ff0000")]
    NotHexColor,
    /// The input is not an email address.
    #[error("must be a valid email address")]
    NotEmail,
}

/// Non-empty, trimmed text.
///
/// Used for every required string column (names, labels, phone numbers,
/// image URLs).
///
/// ```
/// use storeadmin_core::RequiredText;
///
/// assert_eq!(RequiredText::parse("  Large ").unwrap().as_str(), "Large");
/// assert!(RequiredText::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequiredText(String);

impl RequiredText {
    /// Default length limit for names and labels.
    pub const MAX_LENGTH: usize = 255;

    /// Length limit for URLs.
    pub const MAX_URL_LENGTH: usize = 2048;

    /// Validate against [`Self::MAX_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or too long.
    pub fn parse(s: &str) -> Result<Self, TextError> {
        Self::parse_with_limit(s, Self::MAX_LENGTH)
    }

    /// Validate against a caller-provided length limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than `max`
    /// characters.
    pub fn parse_with_limit(s: &str, max: usize) -> Result<Self, TextError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RequiredText {
    type Error = TextError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RequiredText> for String {
    fn from(text: RequiredText) -> Self {
        text.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A CSS hex color (`#rgb`, `#rrggbb`, or with alpha), stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color code.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and
    /// [`TextError::NotHexColor`] unless the input is `#` followed by 3 to 8
    /// hex digits.
    pub fn parse(s: &str) -> Result<Self, TextError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let digits = trimmed.strip_prefix('#').ok_or(TextError::NotHexColor)?;
        if !(3..=8).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TextError::NotHexColor);
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An owner's login email, normalized to lowercase.
///
/// Only the structural check is done here (one `@` with text on both sides);
/// deliverability is not our concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, too long, or not shaped like
    /// `local@domain`.
    pub fn parse(s: &str) -> Result<Self, TextError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(TextError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_lowercase()))
            }
            _ => Err(TextError::NotEmail),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        let text = RequiredText::parse("\tSummer sale\n").unwrap();
        assert_eq!(text.as_str(), "Summer sale");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert_eq!(RequiredText::parse(""), Err(TextError::Empty));
        assert_eq!(RequiredText::parse("  \n"), Err(TextError::Empty));
    }

    #[test]
    fn test_required_text_length_counts_chars() {
        let accented = "é".repeat(RequiredText::MAX_LENGTH);
        assert!(RequiredText::parse(&accented).is_ok());
        let too_long = "a".repeat(RequiredText::MAX_LENGTH + 1);
        assert_eq!(
            RequiredText::parse(&too_long),
            Err(TextError::TooLong { max: 255 })
        );
    }

    #[test]
    fn test_required_text_deserialize_validates() {
        assert!(serde_json::from_str::<RequiredText>("\"  \"").is_err());
        let ok: RequiredText = serde_json::from_str("\" ok \"").unwrap();
        assert_eq!(ok.as_str(), "ok");
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(HexColor::parse("#FFF").unwrap().as_str(), "#fff");
        assert!(HexColor::parse("#00ff0080").is_ok());
        assert_eq!(HexColor::parse("red"), Err(TextError::NotHexColor));
        assert_eq!(HexColor::parse("#12"), Err(TextError::NotHexColor));
        assert_eq!(HexColor::parse("#gggggg"), Err(TextError::NotHexColor));
        assert_eq!(HexColor::parse(""), Err(TextError::Empty));
    }

    #[test]
    fn test_email_normalizes() {
        let email = Email::parse(" Owner@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "owner@example.com");
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert_eq!(Email::parse("no-at"), Err(TextError::NotEmail));
        assert_eq!(Email::parse("@example.com"), Err(TextError::NotEmail));
        assert_eq!(Email::parse("user@"), Err(TextError::NotEmail));
        assert_eq!(Email::parse("a@b@c"), Err(TextError::NotEmail));
    }
}
