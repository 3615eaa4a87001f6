//! Developer-declared AI percentage, read from the pull request description.
//!
//! The labelled field is located first and its value read strictly: an
//! integer, an optional `%`, optional closing emphasis, nothing else. When
//! the event payload carries no usable value the body is refetched once and
//! parsed again. Validation runs once on the outcome.

pub mod fetch;

use crate::error::DeclarationError;
use fetch::BodySource;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{info, warn};

// Label words may be split by spaces, hyphens or any Unicode dash, and the
// label may sit inside bold/italic markers with the colon on either side.
const DECLARED_PATTERN: &str = r"(?im)(?:\*\*|__|\*|_)?[ \t]*declared[ \t\-\x{2010}-\x{2015}]*ai[ \t\-\x{2010}-\x{2015}]*percent(?:age)?[ \t]*(?:\*\*|__|\*|_)?[ \t]*:[ \t]*(?:\*\*|__|\*|_)?[ \t]*([^\n]*)";

const ESTIMATED_PATTERN: &str = r"(?im)estimated[ \t\w\-]*%[ \t*_]*:[ \t*_]*([^\n]*)";

const VALUE_PATTERN: &str = r"^(?:\*\*|__|\*|_)?[ \t]*(-?\d+)[ \t]*%?[ \t]*(?:\*\*|__|\*|_)?$";

fn declared_regex() -> &'static Regex {
    static DECLARED: OnceLock<Regex> = OnceLock::new();
    DECLARED.get_or_init(|| Regex::new(DECLARED_PATTERN).expect("declared regex is valid"))
}

fn estimated_regex() -> &'static Regex {
    static ESTIMATED: OnceLock<Regex> = OnceLock::new();
    ESTIMATED.get_or_init(|| Regex::new(ESTIMATED_PATTERN).expect("estimated regex is valid"))
}

fn value_regex() -> &'static Regex {
    static VALUE: OnceLock<Regex> = OnceLock::new();
    VALUE.get_or_init(|| Regex::new(VALUE_PATTERN).expect("value regex is valid"))
}

/// What a labelled field held. Range is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declared {
    Value(i64),
    Malformed(String),
}

impl Declared {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// `None` for an empty value, so a blank template line counts as absent.
fn read_value(raw: &str) -> Option<Declared> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let found = match value_regex().captures(raw).and_then(|caps| caps.get(1)) {
        // digits only; overflow is simply out of range
        Some(digits) => Declared::Value(digits.as_str().parse::<i64>().unwrap_or(i64::MAX)),
        None => Declared::Malformed(raw.to_string()),
    };
    Some(found)
}

fn field_value(regex: &Regex, body: &str) -> Option<Declared> {
    regex
        .captures_iter(body)
        .find_map(|caps| read_value(caps.get(1)?.as_str()))
}

/// Finds the declared percentage, preferring `Declared-AI-Percent` over the
/// looser `Estimated ... %` field.
pub fn parse_declared(body: &str) -> Option<Declared> {
    field_value(declared_regex(), body).or_else(|| field_value(estimated_regex(), body))
}

pub fn validate(found: Option<Declared>) -> Result<u8, DeclarationError> {
    match found {
        None => Err(DeclarationError::Missing),
        Some(Declared::Malformed(raw)) => Err(DeclarationError::NotInteger(raw)),
        Some(Declared::Value(value)) => u8::try_from(value)
            .ok()
            .filter(|percent| *percent <= 100)
            .ok_or(DeclarationError::OutOfRange(value)),
    }
}

fn refetched(source: &dyn BodySource) -> Option<Declared> {
    match source.fetch_body() {
        Ok(fresh) => {
            info!("no usable declaration in event payload, retrying with refetched body");
            parse_declared(&fresh)
        }
        Err(err) => {
            warn!(error = %err, "refetch of pull request body failed");
            None
        }
    }
}

/// Parses `body`; unless that yields an integer, refetches once through
/// `refetch` and prefers whatever the fresh body holds. A failed refetch only
/// logs, and validation decides on what was found.
pub fn resolve_declared(
    body: &str,
    refetch: Option<&dyn BodySource>,
) -> Result<u8, DeclarationError> {
    let from_payload = parse_declared(body);
    let found = match (from_payload, refetch) {
        (Some(found), _) if found.is_value() => Some(found),
        (stale, Some(source)) => refetched(source).or(stale),
        (stale, None) => stale,
    };
    validate(found)
}
