//! Grammar of `Content-Disposition` and `Content-Type` values.
//!
//! A value is a `;` separated list of pieces. A bare piece is the main value,
//! a `key=value` piece becomes an attribute.
//!
//! ```
//! use raw_form_data::header::HeaderValue;
//!
//! let value = HeaderValue::parse(Some(r#"form-data; name="x"; filename="f.txt""#));
//!
//! assert_eq!(value.main_value(), Some("form-data"));
//! assert_eq!(value.get("name"), Some("x"));
//! assert_eq!(value.get("filename"), Some("f.txt"));
//! ```

use std::collections::HashMap;

use serde::Serialize;

/// Parsed header value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderValue {
    /// The bare token, `form-data` in `form-data; name="x"`.
    pub main_value: Option<String>,
    /// The `key=value` pieces, values unquoted.
    pub attributes: HashMap<String, String>,
}

impl HeaderValue {
    /// Parses a header value.
    ///
    /// Quotes are stripped once from around an attribute value. There is no
    /// escaping: `;` and `=` inside quotes are still separators. Every piece
    /// without `=` is a main value and the last one wins, so a trailing `;`
    /// leaves an empty main value.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        let mut header = Self::default();

        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return header;
        };

        for piece in value.split(';').map(str::trim) {
            match piece.split_once('=') {
                None => {
                    header.main_value.replace(piece.to_string());
                }
                Some((key, value)) => {
                    header
                        .attributes
                        .insert(key.trim().to_string(), unquote(value.trim()).to_string());
                }
            }
        }

        header
    }

    /// Gets the main value.
    #[must_use]
    pub fn main_value(&self) -> Option<&str> {
        self.main_value.as_deref()
    }

    /// Gets an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Checks an attribute is present, even if empty.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

/// Parses a header value and returns only its main value.
#[must_use]
pub fn parse_main_value(value: Option<&str>) -> Option<String> {
    HeaderValue::parse(value).main_value
}

/// Parses a header value and returns only the named attribute.
#[must_use]
pub fn parse_attribute(value: Option<&str>, key: &str) -> Option<String> {
    HeaderValue::parse(value).attributes.remove(key)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
