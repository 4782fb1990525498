//! CPF identifier cleaning and validation
//!
//! Only the shape is checked: non-digits are stripped and exactly
//! [`Identifier::LEN`] digits must remain. Check digits are not verified; the
//! upstream site does its own validation and reports it back as markup.

use crate::{Error, Result};
use std::fmt;

/// A cleaned, digits-only CPF
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Number of digits in a CPF
    pub const LEN: usize = 11;

    /// Strip formatting characters and check the digit count
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(Error::MissingIdentifier);
        }

        if digits.len() != Self::LEN {
            return Err(Error::InvalidIdentifier {
                expected: Self::LEN,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// The cleaned digits, as sent in the form field
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form, safe for logs: `*********09`
    pub fn masked(&self) -> String {
        let visible = &self.0[self.0.len() - 2..];
        format!("{}{}", "*".repeat(self.0.len() - 2), visible)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identifier").field(&self.masked()).finish()
    }
}

impl std::str::FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
