//! Lenient number decoding
//!
//! The service sends most numeric fields as JSON strings ("6929.82"), some as
//! plain numbers, and uses `null` or `""` when a value is unknown.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Num(T),
    Str(String),
}

/// Decodes an optional number given as a JSON number, a numeric string, `null` or `""`
pub fn opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Num(value)) => Ok(Some(value)),
        Some(Lenient::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Lenient::Str(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Decodes a required number given as a JSON number or a numeric string
pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Num(value) => Ok(value),
        Lenient::Str(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_number")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "opt_number")]
        rank: Option<u32>,
        #[serde(deserialize_with = "number")]
        period: i64,
    }

    #[test]
    fn test_numbers_from_strings() {
        let s: Sample =
            serde_json::from_str(r#"{"price":"6929.8217756835","rank":"1","period":"1530720000000"}"#)
                .unwrap();
        assert!((s.price.unwrap() - 6929.8217756835).abs() < 1e-9);
        assert_eq!(s.rank, Some(1));
        assert_eq!(s.period, 1_530_720_000_000);
    }

    #[test]
    fn test_numbers_from_numbers() {
        let s: Sample = serde_json::from_str(r#"{"price":1.5,"rank":3,"period":42}"#).unwrap();
        assert_eq!(s.price, Some(1.5));
        assert_eq!(s.rank, Some(3));
        assert_eq!(s.period, 42);
    }

    #[test]
    fn test_null_empty_and_missing_are_none() {
        let s: Sample = serde_json::from_str(r#"{"price":null,"rank":"","period":0}"#).unwrap();
        assert!(s.price.is_none());
        assert!(s.rank.is_none());

        let s: Sample = serde_json::from_str(r#"{"period":0}"#).unwrap();
        assert!(s.price.is_none());
    }

    #[test]
    fn test_garbage_string_is_an_error() {
        let result = serde_json::from_str::<Sample>(r#"{"price":"abc","period":0}"#);
        assert!(result.is_err());
    }
}
