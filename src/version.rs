//! Subversion parsing and storage key layout.
use regex::Regex;
use std::{fmt, str::FromStr, sync::LazyLock};

use crate::error::{PublishError, Result};

static SUBVERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7}$").unwrap());

/// A validated subversion: exactly 7 ASCII digits, e.g. `0000001`.
///
/// Only `0-9` count as digits; numerals from other scripts (Arabic-Indic,
/// fullwidth, superscripts) are rejected even though Unicode classifies them
/// as numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subversion(String);

impl Subversion {
    pub fn parse(value: &str) -> Result<Self> {
        if !SUBVERSION_REGEX.is_match(value) {
            return Err(PublishError::InvalidVersionFormat(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Subversion {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Subversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one published version: `<namespace>/<major>/<subversion>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionKey {
    pub namespace: String,
    pub major_version: String,
    pub subversion: Subversion,
}

impl VersionKey {
    pub fn new(
        namespace: impl Into<String>,
        major_version: impl Into<String>,
        subversion: Subversion,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            major_version: major_version.into(),
            subversion,
        }
    }

    /// Prefix shared by every package of this version.
    pub fn prefix(&self) -> String {
        format!(
            "{}/{}/{}",
            self.namespace, self.major_version, self.subversion
        )
    }

    /// Full object key for an archive uploaded under this version.
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.prefix(), file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seven_digit_subversion() {
        let subversion = Subversion::parse("0000001").unwrap();
        assert_eq!(subversion.as_str(), "0000001");
        assert_eq!(subversion.to_string(), "0000001");
    }

    #[test]
    fn rejects_malformed_subversions() {
        for bad in [
            "", "123456", "12345678", "00000a1", "abcdefg", " 000001",
            "000001 ", "-000001", "1.00000", "٠١٢٣٤٥٦",
        ] {
            let result = Subversion::parse(bad);
            assert!(
                matches!(result, Err(PublishError::InvalidVersionFormat(ref v)) if v == bad),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn from_str_validates() {
        assert!("0001234".parse::<Subversion>().is_ok());
        assert!("1234".parse::<Subversion>().is_err());
    }

    #[test]
    fn builds_prefix_and_object_key() {
        let key = VersionKey::new(
            "atlasMongo",
            "4.0",
            Subversion::parse("0000001").unwrap(),
        );
        assert_eq!(key.prefix(), "atlasMongo/4.0/0000001");
        assert_eq!(
            key.object_key("mongodb-atlas-cluster.zip"),
            "atlasMongo/4.0/0000001/mongodb-atlas-cluster.zip"
        );
    }
}
