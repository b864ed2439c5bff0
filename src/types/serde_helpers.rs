//! Serde helpers for the exchange's loosely-typed fields.
//!
//! Several response fields are decimal strings that may be `""`, `null` or
//! missing, and some identifiers come back as empty strings instead of `null`.

use std::fmt;

use serde::{Deserialize, Deserializer, de};

/// Deserialize an optional decimal string that may also be `null` or `""`.
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use serde::Deserialize;
/// use coinbase_exchange_client::types::serde_helpers::optional_decimal;
///
/// #[derive(Deserialize, Debug)]
/// struct Fill {
///     #[serde(deserialize_with = "optional_decimal::deserialize", default)]
///     fee: Option<Decimal>,
/// }
///
/// let fill: Fill = serde_json::from_str(r#"{"fee":"0.0025"}"#).unwrap();
/// assert_eq!(fill.fee.unwrap().to_string(), "0.0025");
///
/// let fill: Fill = serde_json::from_str(r#"{"fee":""}"#).unwrap();
/// assert!(fill.fee.is_none());
/// ```
pub mod optional_decimal {
    use super::*;
    use rust_decimal::Decimal;

    /// Deserialize a value that may be empty or a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionalDecimalVisitor;

        impl<'de> de::Visitor<'de> for OptionalDecimalVisitor {
            type Value = Option<Decimal>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string, an empty string or null")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let v = v.trim();
                if v.is_empty() {
                    return Ok(None);
                }
                v.parse().map(Some).map_err(de::Error::custom)
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_str(&v)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }
        }

        deserializer.deserialize_any(OptionalDecimalVisitor)
    }
}

/// Helper for empty strings that should be deserialized as None.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use coinbase_exchange_client::types::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize, Debug)]
/// struct Report {
///     #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
///     file_url: Option<String>,
/// }
///
/// let report: Report = serde_json::from_str(r#"{"file_url":""}"#).unwrap();
/// assert!(report.file_url.is_none());
/// ```
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning None if empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty()))
    }
}
