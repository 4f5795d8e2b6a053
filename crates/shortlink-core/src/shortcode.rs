use crate::base62;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short code identifying a stored URL.
///
/// Generated codes are the base-62 encoding of a counter value, so every
/// valid code is 1-11 characters of `[0-9a-zA-Z]` and decodes to a `u64`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Encodes a counter value as a short code.
    ///
    /// The encoding is deterministic: the same value always yields the same code.
    pub fn from_counter(value: u64) -> Self {
        Self(base62::encode(value))
    }

    /// Parses a caller-supplied code.
    pub fn parse(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.is_empty() || code.len() > base62::MAX_ENCODED_LEN {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                base62::MAX_ENCODED_LEN,
                code.len()
            )));
        }

        if base62::decode(code).is_none() {
            return Err(CoreError::InvalidShortCode(format!(
                "must be a base-62 encoded counter: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::parse("1").is_ok());
        assert!(ShortCode::parse("aZ09").is_ok());
        assert!(ShortCode::parse("a".repeat(11)).is_ok());
    }

    #[test]
    fn empty_or_too_long() {
        assert!(ShortCode::parse("").is_err());
        assert!(ShortCode::parse("a".repeat(12)).is_err());
        assert!(ShortCode::parse("doesNotExist").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::parse("abc def").is_err());
        assert!(ShortCode::parse("abc-def").is_err());
        assert!(ShortCode::parse("abc_def").is_err());
    }

    #[test]
    fn from_counter_is_deterministic() {
        assert_eq!(ShortCode::from_counter(1).as_str(), "1");
        assert_eq!(ShortCode::from_counter(62).as_str(), "10");
        assert_eq!(ShortCode::from_counter(62), ShortCode::from_counter(62));
    }

    #[test]
    fn generated_codes_parse_back() {
        let code = ShortCode::from_counter(123_456_789);
        assert_eq!(ShortCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn serde_rejects_invalid_code() {
        let code: ShortCode = serde_json::from_str("\"1Ab\"").unwrap();
        assert_eq!(code.as_str(), "1Ab");
        assert!(serde_json::from_str::<ShortCode>("\"a-b\"").is_err());
    }
}
