use std::{fmt, ops::Deref, str::FromStr};

/// A validated identifier for a category or FAQ entry.
///
/// Aliases double as directory names on disk, so the format is restricted
/// to URL-safe lowercase: the first character must be a lowercase ASCII
/// letter, followed by one or more characters from `[a-z0-9_.-]`.
///
/// Examples: `general`, `install-faq`, `php7.4`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias(String);

impl Alias {
    /// Creates a new `Alias` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAliasError`] if the string does not start with a
    /// lowercase ASCII letter, is shorter than two characters, or contains
    /// characters outside `[a-z0-9_.-]`.
    pub fn new(s: String) -> Result<Self, InvalidAliasError> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidAliasError(s))
        }
    }

    /// Returns the alias as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_ascii_lowercase() {
            return false;
        }
        let mut rest = 0;
        for c in chars {
            if !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')) {
                return false;
            }
            rest += 1;
        }
        rest > 0
    }
}

impl TryFrom<String> for Alias {
    type Error = InvalidAliasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Alias {
    type Error = InvalidAliasError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Alias {
    type Err = InvalidAliasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Alias {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string doesn't match the required alias pattern.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "invalid alias '{0}': must start with a lowercase letter followed by one or more of [a-z0-9_.-]"
)]
pub struct InvalidAliasError(String);
