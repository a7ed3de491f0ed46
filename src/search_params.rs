//! # SearchParams — Request Model and Validation
//!
//! `SearchRequest` is the raw, untrusted form of a search as it arrives over
//! HTTP (JSON), from a batch file (TOML) or from the command line. Numeric
//! fields are decoded leniently: integers, integral floats and numeric strings
//! are all accepted, so `{"end": "100"}` and `{"end": 100}` are equivalent.
//!
//! `SearchRequest::validate` turns it into a `SearchParams` with every
//! invariant checked, or the first `ValidationError` in a fixed rule order.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the match count for a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxSequences {
    #[default]
    Unlimited,
    AtMost(i64),
}

impl MaxSequences {
    /// `-1` is the wire sentinel for "no upper bound".
    fn from_wire(n: i64) -> Self {
        if n == -1 {
            MaxSequences::Unlimited
        } else {
            MaxSequences::AtMost(n)
        }
    }
}

impl FromStr for MaxSequences {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "∞" || s.eq_ignore_ascii_case("unlimited") || s.eq_ignore_ascii_case("inf") {
            return Ok(MaxSequences::Unlimited);
        }
        s.parse::<i64>()
            .map(MaxSequences::from_wire)
            .map_err(|_| format!("'{}' is not an integer or \"unlimited\"", s))
    }
}

impl fmt::Display for MaxSequences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxSequences::Unlimited => f.write_str("unlimited"),
            MaxSequences::AtMost(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for MaxSequences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxSequences::Unlimited => serializer.serialize_str("unlimited"),
            MaxSequences::AtMost(n) => serializer.serialize_i64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for MaxSequences {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaxSequencesVisitor;

        impl<'de> Visitor<'de> for MaxSequencesVisitor {
            type Value = MaxSequences;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer, \"unlimited\" or \"∞\"")
            }

            fn visit_unit<E: de::Error>(self) -> Result<MaxSequences, E> {
                Ok(MaxSequences::Unlimited)
            }

            fn visit_none<E: de::Error>(self) -> Result<MaxSequences, E> {
                Ok(MaxSequences::Unlimited)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<MaxSequences, D::Error> {
                d.deserialize_any(self)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MaxSequences, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MaxSequences, E> {
                Ok(MaxSequences::from_wire(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MaxSequences, E> {
                IntVisitor.visit_u64(v).map(MaxSequences::from_wire)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MaxSequences, E> {
                IntVisitor.visit_f64(v).map(MaxSequences::from_wire)
            }
        }

        deserializer.deserialize_any(MaxSequencesVisitor)
    }
}

/// Accepts an integer, an integral float, or a string holding an integer.
struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("{} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(v as i64)
        } else {
            Err(E::custom(format!("{} is not an integer", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("'{}' is not an integer", v)))
    }
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(IntVisitor)
}

fn default_start() -> i64 {
    2
}

fn default_end() -> i64 {
    100
}

fn default_one() -> i64 {
    1
}

fn default_max_length() -> i64 {
    10
}

/// A search as submitted by a client. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default = "default_start", deserialize_with = "lenient_int")]
    pub start: i64,
    #[serde(default = "default_end", deserialize_with = "lenient_int")]
    pub end: i64,
    #[serde(default = "default_one", deserialize_with = "lenient_int")]
    pub min_sequences: i64,
    #[serde(default)]
    pub max_sequences: MaxSequences,
    #[serde(default = "default_one", deserialize_with = "lenient_int")]
    pub min_length: i64,
    #[serde(default = "default_max_length", deserialize_with = "lenient_int")]
    pub max_length: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            start: default_start(),
            end: default_end(),
            min_sequences: default_one(),
            max_sequences: MaxSequences::Unlimited,
            min_length: default_one(),
            max_length: default_max_length(),
        }
    }
}

/// Host-imposed bounds that keep a single request's trial-division cost finite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchLimits {
    #[serde(default = "default_max_end")]
    pub max_end: u64,
}

fn default_max_end() -> u64 {
    1_000_000
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_end: default_max_end(),
        }
    }
}

/// A validated search. `max_sequences == None` means unlimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub start: u64,
    pub end: u64,
    pub min_length: usize,
    pub max_length: usize,
    pub min_sequences: usize,
    pub max_sequences: Option<usize>,
}

impl SearchParams {
    /// Whether a target with `count` matching runs is kept.
    pub fn admits_count(&self, count: usize) -> bool {
        count >= self.min_sequences && self.max_sequences.map_or(true, |max| count <= max)
    }
}

/// Why a request was rejected. `Display` is the client-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBody(String),
    StartBelowTwo,
    EndBeforeStart,
    MinLengthBelowOne,
    MaxLengthBelowMinLength,
    MinSequencesBelowOne,
    MaxSequencesBelowMinSequences,
    EndAboveLimit { max_end: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidBody(detail) => {
                write!(f, "invalid request data: {}", detail)
            }
            ValidationError::StartBelowTwo => {
                f.write_str("start must be greater than or equal to 2")
            }
            ValidationError::EndBeforeStart => {
                f.write_str("end must be greater than or equal to start")
            }
            ValidationError::MinLengthBelowOne => f.write_str("min_length must be greater than 0"),
            ValidationError::MaxLengthBelowMinLength => {
                f.write_str("max_length must be greater than or equal to min_length")
            }
            ValidationError::MinSequencesBelowOne => {
                f.write_str("min_sequences must be greater than 0")
            }
            ValidationError::MaxSequencesBelowMinSequences => {
                f.write_str("max_sequences must be greater than or equal to min_sequences")
            }
            ValidationError::EndAboveLimit { max_end } => {
                write!(f, "end must not exceed {}", max_end)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl SearchRequest {
    /// Parse a JSON request body. Empty bodies and non-object JSON are rejected;
    /// `{}` takes every default.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::InvalidBody("request body is empty".into()));
        }
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::InvalidBody(e.to_string()))?;
        if !value.is_object() {
            return Err(ValidationError::InvalidBody(
                "request body must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value).map_err(|e| {
            ValidationError::InvalidBody(format!("fields must be valid integers ({})", e))
        })
    }

    /// Check every rule in order and return the first violation.
    pub fn validate(&self, limits: &SearchLimits) -> Result<SearchParams, ValidationError> {
        if self.start < 2 {
            return Err(ValidationError::StartBelowTwo);
        }
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart);
        }
        if self.min_length < 1 {
            return Err(ValidationError::MinLengthBelowOne);
        }
        if self.max_length < self.min_length {
            return Err(ValidationError::MaxLengthBelowMinLength);
        }
        if self.min_sequences < 1 {
            return Err(ValidationError::MinSequencesBelowOne);
        }
        let max_sequences = match self.max_sequences {
            MaxSequences::Unlimited => None,
            MaxSequences::AtMost(n) if n < self.min_sequences => {
                return Err(ValidationError::MaxSequencesBelowMinSequences)
            }
            MaxSequences::AtMost(n) => Some(to_usize(n)),
        };
        // start >= 2 and end >= start, so both are positive from here on.
        let end = self.end as u64;
        if end > limits.max_end {
            return Err(ValidationError::EndAboveLimit {
                max_end: limits.max_end,
            });
        }

        Ok(SearchParams {
            start: self.start as u64,
            end,
            min_length: to_usize(self.min_length),
            max_length: to_usize(self.max_length),
            min_sequences: to_usize(self.min_sequences),
            max_sequences,
        })
    }
}

/// Positive i64 to usize, saturating on 32-bit targets.
fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<SearchRequest, ValidationError> {
        SearchRequest::from_json(json.as_bytes())
    }

    fn validate(req: SearchRequest) -> Result<SearchParams, ValidationError> {
        req.validate(&SearchLimits::default())
    }

    // ── Decoding ────────────────────────────────────────────────

    #[test]
    fn empty_object_takes_defaults() {
        let req = parse("{}").unwrap();
        assert_eq!(req, SearchRequest::default());
        assert_eq!(req.start, 2);
        assert_eq!(req.end, 100);
        assert_eq!(req.min_sequences, 1);
        assert_eq!(req.max_sequences, MaxSequences::Unlimited);
        assert_eq!(req.min_length, 1);
        assert_eq!(req.max_length, 10);
    }

    #[test]
    fn numeric_strings_and_integral_floats_are_accepted() {
        let req = parse(r#"{"start": "3", "end": 50.0, "max_length": " 4 "}"#).unwrap();
        assert_eq!(req.start, 3);
        assert_eq!(req.end, 50);
        assert_eq!(req.max_length, 4);
    }

    #[test]
    fn non_numeric_field_is_invalid_body() {
        let err = parse(r#"{"end": "lots"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBody(_)));
        assert!(err.to_string().contains("valid integers"));
    }

    #[test]
    fn fractional_float_is_rejected() {
        assert!(parse(r#"{"end": 10.5}"#).is_err());
    }

    #[test]
    fn null_numeric_field_is_rejected() {
        assert!(parse(r#"{"start": null}"#).is_err());
    }

    #[test]
    fn empty_and_non_object_bodies_are_rejected() {
        assert!(matches!(parse(""), Err(ValidationError::InvalidBody(_))));
        assert!(matches!(parse("  \n"), Err(ValidationError::InvalidBody(_))));
        assert!(matches!(parse("[1, 2]"), Err(ValidationError::InvalidBody(_))));
        assert!(matches!(parse("not json"), Err(ValidationError::InvalidBody(_))));
    }

    #[test]
    fn max_sequences_unlimited_spellings() {
        for json in [
            r#"{"max_sequences": "∞"}"#,
            r#"{"max_sequences": "unlimited"}"#,
            r#"{"max_sequences": -1}"#,
            r#"{"max_sequences": "-1"}"#,
            r#"{"max_sequences": null}"#,
        ] {
            assert_eq!(
                parse(json).unwrap().max_sequences,
                MaxSequences::Unlimited,
                "{}",
                json
            );
        }
    }

    #[test]
    fn max_sequences_numeric_forms() {
        assert_eq!(
            parse(r#"{"max_sequences": 3}"#).unwrap().max_sequences,
            MaxSequences::AtMost(3)
        );
        assert_eq!(
            parse(r#"{"max_sequences": "3"}"#).unwrap().max_sequences,
            MaxSequences::AtMost(3)
        );
    }

    #[test]
    fn max_sequences_from_str_and_display() {
        assert_eq!("unlimited".parse::<MaxSequences>(), Ok(MaxSequences::Unlimited));
        assert_eq!("7".parse::<MaxSequences>(), Ok(MaxSequences::AtMost(7)));
        assert!("seven".parse::<MaxSequences>().is_err());
        assert_eq!(MaxSequences::Unlimited.to_string(), "unlimited");
        assert_eq!(MaxSequences::AtMost(7).to_string(), "7");
    }

    #[test]
    fn request_parses_from_toml() {
        let req: SearchRequest =
            toml::from_str("start = 5\nend = \"60\"\nmax_sequences = 4\n").unwrap();
        assert_eq!(req.start, 5);
        assert_eq!(req.end, 60);
        assert_eq!(req.max_sequences, MaxSequences::AtMost(4));
    }

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn defaults_validate() {
        let params = validate(SearchRequest::default()).unwrap();
        assert_eq!(
            params,
            SearchParams {
                start: 2,
                end: 100,
                min_length: 1,
                max_length: 10,
                min_sequences: 1,
                max_sequences: None,
            }
        );
    }

    #[test]
    fn each_rule_rejects_with_its_message() {
        let cases: Vec<(SearchRequest, &str)> = vec![
            (
                SearchRequest {
                    start: 1,
                    ..Default::default()
                },
                "start must be greater than or equal to 2",
            ),
            (
                SearchRequest {
                    start: -40,
                    ..Default::default()
                },
                "start must be greater than or equal to 2",
            ),
            (
                SearchRequest {
                    start: 50,
                    end: 49,
                    ..Default::default()
                },
                "end must be greater than or equal to start",
            ),
            (
                SearchRequest {
                    min_length: 0,
                    ..Default::default()
                },
                "min_length must be greater than 0",
            ),
            (
                SearchRequest {
                    min_length: 5,
                    max_length: 4,
                    ..Default::default()
                },
                "max_length must be greater than or equal to min_length",
            ),
            (
                SearchRequest {
                    min_sequences: 0,
                    ..Default::default()
                },
                "min_sequences must be greater than 0",
            ),
            (
                SearchRequest {
                    min_sequences: 3,
                    max_sequences: MaxSequences::AtMost(2),
                    ..Default::default()
                },
                "max_sequences must be greater than or equal to min_sequences",
            ),
            (
                SearchRequest {
                    end: 2_000_000,
                    ..Default::default()
                },
                "end must not exceed 1000000",
            ),
        ];
        for (req, expected) in cases {
            let err = validate(req.clone()).unwrap_err();
            assert_eq!(err.to_string(), expected, "for {:?}", req);
        }
    }

    /// min_sequences is at least 1, so a zero ceiling can never be satisfied.
    #[test]
    fn max_sequences_zero_is_rejected() {
        let req = SearchRequest {
            max_sequences: MaxSequences::AtMost(0),
            ..Default::default()
        };
        assert_eq!(
            validate(req),
            Err(ValidationError::MaxSequencesBelowMinSequences)
        );
    }

    #[test]
    fn rules_are_checked_in_order() {
        // Both start and min_length are invalid; start is reported.
        let req = SearchRequest {
            start: 0,
            min_length: 0,
            ..Default::default()
        };
        assert_eq!(validate(req), Err(ValidationError::StartBelowTwo));
    }

    #[test]
    fn start_equal_to_end_is_valid() {
        let req = SearchRequest {
            start: 7,
            end: 7,
            ..Default::default()
        };
        assert!(validate(req).is_ok());
    }

    #[test]
    fn end_limit_is_configurable() {
        let limits = SearchLimits { max_end: 50 };
        let req = SearchRequest {
            end: 50,
            ..Default::default()
        };
        assert!(req.validate(&limits).is_ok());
        let req = SearchRequest {
            end: 51,
            ..Default::default()
        };
        assert_eq!(
            req.validate(&limits),
            Err(ValidationError::EndAboveLimit { max_end: 50 })
        );
    }

    #[test]
    fn admits_count_respects_bounds() {
        let mut params = validate(SearchRequest::default()).unwrap();
        assert!(!params.admits_count(0));
        assert!(params.admits_count(1));
        assert!(params.admits_count(10_000));
        params.min_sequences = 2;
        params.max_sequences = Some(3);
        assert!(!params.admits_count(1));
        assert!(params.admits_count(2));
        assert!(params.admits_count(3));
        assert!(!params.admits_count(4));
    }
}
