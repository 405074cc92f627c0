//! Fixed-width decimal digit strings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::SequenceError;
use crate::MAX_WIDTH;

/// Longest digit string we hold: the square of a MAX_WIDTH value
pub const MAX_DIGITS: usize = 2 * MAX_WIDTH;

/// A non-empty string of ASCII digits whose length is its width.
///
/// Leading zeros are significant: "0042" and "42" are different
/// digit strings with the same numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigitString(String);

impl DigitString {
    /// Validate and wrap a digit string
    pub fn new(s: impl Into<String>) -> Result<Self, SequenceError> {
        let s = s.into();
        validate_digits(&s)?;
        if s.is_empty() {
            return Err(SequenceError::R103_EMPTY);
        }
        if s.len() > MAX_DIGITS {
            return Err(SequenceError::R104_WIDTH_OUT_OF_RANGE {
                width: s.len(),
                min: 1,
                max: MAX_DIGITS,
            });
        }
        Ok(Self(s))
    }

    /// Format `value` left-padded with zeros to `width` digits
    pub fn from_value(value: u64, width: usize) -> Result<Self, SequenceError> {
        let s = crate::core::pad_left_zeros(&value.to_string(), width)?;
        Self::new(s)
    }

    /// Number of digit positions
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Numeric value (fits: at most MAX_DIGITS digits)
    pub fn value(&self) -> u64 {
        self.0
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check every character is '0'..='9'
pub fn validate_digits(s: &str) -> Result<(), SequenceError> {
    match s.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        Some((position, found)) => Err(SequenceError::R101_NON_DIGIT { position, found }),
        None => Ok(()),
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DigitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DigitString {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DigitString {
    type Error = SequenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DigitString> for String {
    fn from(d: DigitString) -> Self {
        d.0
    }
}

impl PartialEq<str> for DigitString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DigitString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zeros_kept() {
        let d = DigitString::new("0042").unwrap();
        assert_eq!(d.width(), 4);
        assert_eq!(d.value(), 42);
        assert_eq!(d.to_string(), "0042");
    }

    #[test]
    fn test_rejects_non_digit() {
        assert_eq!(
            DigitString::new("12a4"),
            Err(SequenceError::R101_NON_DIGIT { position: 2, found: 'a' })
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(DigitString::new(""), Err(SequenceError::R103_EMPTY));
    }

    #[test]
    fn test_rejects_too_long() {
        let long = "1".repeat(MAX_DIGITS + 1);
        assert!(matches!(
            DigitString::new(long),
            Err(SequenceError::R104_WIDTH_OUT_OF_RANGE { .. })
        ));
    }

    #[test]
    fn test_max_digits_value() {
        let d = DigitString::new("9".repeat(MAX_DIGITS)).unwrap();
        assert_eq!(d.value(), 999_999_999_999_999_999);
    }

    #[test]
    fn test_from_value_pads() {
        assert_eq!(DigitString::from_value(7, 4).unwrap(), "0007");
        assert!(DigitString::from_value(12345, 4).is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let d = DigitString::new("0100").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"0100\"");
        let back: DigitString = serde_json::from_str("\"0100\"").unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<DigitString>("\"01x0\"").is_err());
    }
}
