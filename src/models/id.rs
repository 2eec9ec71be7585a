//! A-number identifiers for catalog entries.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Error returned when a value cannot be read as an A-number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Key {0} not a valid OEIS id")]
pub struct InvalidId(pub String);

/// Identifier of an OEIS entry, e.g. `A000045`
///
/// Always positive. Displays in the canonical zero-padded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SequenceId(u32);

impl SequenceId {
    /// Create an id from its number
    pub fn new(number: u32) -> Result<Self, InvalidId> {
        if number == 0 {
            return Err(InvalidId(number.to_string()));
        }
        Ok(Self(number))
    }

    /// The numeric part of the id
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Canonical name, e.g. `A000045`
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Name without zero padding, e.g. `A45`
    pub fn short_name(&self) -> String {
        format!("A{}", self.0)
    }

    /// Name of the b-file published for this entry, e.g. `b000045.txt`
    pub fn b_file_name(&self) -> String {
        format!("b{:06}.txt", self.0)
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{:06}", self.0)
    }
}

impl FromStr for SequenceId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('A')
            .or_else(|| trimmed.strip_prefix('a'))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidId(s.to_string()));
        }

        let number = digits
            .parse::<u32>()
            .map_err(|_| InvalidId(s.to_string()))?;
        Self::new(number).map_err(|_| InvalidId(s.to_string()))
    }
}

impl TryFrom<u64> for SequenceId {
    type Error = InvalidId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let number = u32::try_from(value).map_err(|_| InvalidId(value.to_string()))?;
        Self::new(number)
    }
}

impl From<SequenceId> for u64 {
    fn from(id: SequenceId) -> Self {
        u64::from(id.0)
    }
}

/// Conversion into a [`SequenceId`], accepting numbers and `Annnnnn` strings
pub trait IntoSequenceId {
    fn into_sequence_id(self) -> Result<SequenceId, InvalidId>;
}

impl IntoSequenceId for SequenceId {
    fn into_sequence_id(self) -> Result<SequenceId, InvalidId> {
        Ok(self)
    }
}

impl IntoSequenceId for &str {
    fn into_sequence_id(self) -> Result<SequenceId, InvalidId> {
        self.parse()
    }
}

impl IntoSequenceId for String {
    fn into_sequence_id(self) -> Result<SequenceId, InvalidId> {
        self.parse()
    }
}

impl IntoSequenceId for &String {
    fn into_sequence_id(self) -> Result<SequenceId, InvalidId> {
        self.parse()
    }
}

macro_rules! impl_into_sequence_id_for_int {
    ($($t:ty),*) => {
        $(
            impl IntoSequenceId for $t {
                fn into_sequence_id(self) -> Result<SequenceId, InvalidId> {
                    let number = u32::try_from(self).map_err(|_| InvalidId(self.to_string()))?;
                    SequenceId::new(number)
                }
            }
        )*
    };
}

impl_into_sequence_id_for_int!(u32, u64, usize, i32, i64);

fn reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\bA(\d{6,7})\b").expect("valid A-number regex"))
}

/// Find every A-number mentioned in a piece of text, in order of appearance
pub fn find_references(text: &str) -> Vec<SequenceId> {
    reference_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .filter_map(|n| SequenceId::new(n).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_loose_forms() {
        let expected = SequenceId::new(45).unwrap();
        assert_eq!("A000045".parse::<SequenceId>().unwrap(), expected);
        assert_eq!("a45".parse::<SequenceId>().unwrap(), expected);
        assert_eq!("  45 ".parse::<SequenceId>().unwrap(), expected);
        assert_eq!(45u32.into_sequence_id().unwrap(), expected);
    }

    #[test]
    fn test_display_is_zero_padded() {
        let id = SequenceId::new(45).unwrap();
        assert_eq!(id.to_string(), "A000045");
        assert_eq!(id.short_name(), "A45");
        assert_eq!(id.b_file_name(), "b000045.txt");

        let large = SequenceId::new(1_234_567).unwrap();
        assert_eq!(large.to_string(), "A1234567");
    }

    #[test]
    fn test_invalid_ids() {
        for bad in ["", "A", "A-1", "B000045", "A00x045", "sentence", "0", "A000000"] {
            assert!(bad.parse::<SequenceId>().is_err(), "{:?} should be rejected", bad);
        }
        assert!((-3i64).into_sequence_id().is_err());
        assert!(0u32.into_sequence_id().is_err());
    }

    #[test]
    fn test_invalid_id_message_names_key() {
        let err = "sentence".parse::<SequenceId>().unwrap_err();
        assert!(err.to_string().contains("sentence"));
    }

    #[test]
    fn test_serde_as_number() {
        let id: SequenceId = serde_json::from_str("45").unwrap();
        assert_eq!(id.number(), 45);
        assert_eq!(serde_json::to_string(&id).unwrap(), "45");
        assert!(serde_json::from_str::<SequenceId>("0").is_err());
    }

    #[test]
    fn test_find_references() {
        let text = "Cf. A000032, A000045 (Fibonacci) and A001519.";
        let refs: Vec<String> = find_references(text).iter().map(|id| id.name()).collect();
        assert_eq!(refs, vec!["A000032", "A000045", "A001519"]);
    }

    #[test]
    fn test_find_references_ignores_non_ids() {
        assert!(find_references("A12 and BA000045x and plain text").is_empty());
    }
}
