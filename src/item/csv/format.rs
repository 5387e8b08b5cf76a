use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

use super::constants::{DEFAULT_QUOTE, DEFAULT_QUOTE_LIMIT, DEFAULT_SEPARATOR};

/// The dialect shared by a CSV reader and writer.
///
/// A format can be built in code or loaded from JSON, where the separator and
/// the quote are written as one-character strings. Missing keys fall back to
/// the defaults.
///
/// # Examples
///
/// ```
/// use csv_stream::item::csv::format::CsvFormat;
///
/// let format = CsvFormat::from_json(r#"{ "separator": "|", "quote": "*" }"#).unwrap();
///
/// assert_eq!(format.separator, b'|');
/// assert_eq!(format.quote, b'*');
/// assert_eq!(format.quote_limit, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    /// Byte separating two fields (default: comma)
    #[serde(with = "ascii_char")]
    pub separator: u8,
    /// Byte wrapping a field that needs escaping (default: double quote)
    #[serde(with = "ascii_char")]
    pub quote: u8,
    /// Length in characters from which the writer quotes a field without
    /// scanning it.
    /// Zero quotes every non-empty field.
    pub quote_limit: usize,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE,
            quote_limit: DEFAULT_QUOTE_LIMIT,
        }
    }
}

impl CsvFormat {
    /// Parses a format from a JSON object.
    pub fn from_json(json: &str) -> CsvResult<Self> {
        serde_json::from_str(json).map_err(|error| CsvError::Format(error.to_string()))
    }

    /// Renders the format as a JSON object.
    pub fn to_json(&self) -> CsvResult<String> {
        serde_json::to_string(self).map_err(|error| CsvError::Format(error.to_string()))
    }

    /// Whether the separator and the quote are the same byte, which makes the
    /// grammar ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        self.separator == self.quote
    }

    pub(crate) fn warn_if_ambiguous(&self) {
        if self.is_ambiguous() {
            warn!(
                "separator and quote are both '{}': quoted fields cannot be told apart",
                self.separator.escape_ascii()
            );
        }
    }
}

/// (De)serializes a byte as a one-character ASCII string.
mod ascii_char {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(char::from(*byte))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let value = String::deserialize(deserializer)?;
        let mut chars = value.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(D::Error::custom(format!(
                "expected a single ASCII character, found {value:?}"
            ))),
        }
    }
}
