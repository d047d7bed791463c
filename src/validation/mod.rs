//! Validation library
//!
//! Deterministic, side-effect-free domain checks used by the workflows before
//! any network call is made. Local validation failures never reach the
//! network; the workflow fails immediately with the specific kind.
//!
//! None of these functions return errors for "not found" cases; extraction
//! helpers return `Option` and format checks return `bool`. Fail conditions
//! are decided by the workflow steps that call them.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Permissive by design: the remote API performs its own strict check
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9+\-() ]+$").expect("valid phone regex"))
}

/// Check that a date string matches `YYYY-MM-DD` and is a real calendar date
///
/// `1990-3-15` fails (no zero padding), `15/03/1990` fails, `1990-02-30`
/// fails (not a real date), `1990-03-15` passes.
pub fn is_valid_date_format(date: &str) -> bool {
    parse_date(date).is_some()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    if !date_regex().is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Whole-years age of someone born on `date_of_birth`, evaluated on `on`
///
/// Floor semantics, not calendar-year subtraction: the year difference is
/// reduced by one when the month/day has not yet been reached. For a birth
/// date of 1990-03-15 evaluated on 2024-03-14 the result is 33, not 34.
pub fn compute_age(date_of_birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Check an identification string
///
/// Fails on empty/whitespace-only input or fewer than 6 alphanumeric
/// characters. Separators (dots, dashes) are tolerated but don't count.
pub fn is_valid_identification(identification: &str) -> bool {
    if identification.trim().is_empty() {
        return false;
    }
    identification.chars().filter(|c| c.is_alphanumeric()).count() >= 6
}

/// Permissive email format check
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Permissive phone format check
///
/// Accepts digits plus `+ - ( )` and spaces, minimum 7 characters.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() >= 7 && phone_regex().is_match(phone)
}

/// Extract the primary identifier from a decoded response body
///
/// Searches, in order, `data.id`, `data.product_id`, top-level `id`,
/// top-level `product_id` and returns the first present, coerced to an
/// integer. The remote API is inconsistent about whether ids arrive as JSON
/// numbers or numeric strings, so both are accepted. Returns `None` when no
/// identifier is present; this is not an error condition.
pub fn extract_primary_id(body: &Value) -> Option<i64> {
    let candidates = [
        body.get("data").and_then(|d| d.get("id")),
        body.get("data").and_then(|d| d.get("product_id")),
        body.get("id"),
        body.get("product_id"),
    ];
    candidates.into_iter().flatten().find_map(coerce_id)
}

/// Coerce a JSON value into an integer id
///
/// Accepts numbers and numeric strings; also unwraps the first element of an
/// array, which the create-patient endpoint uses for its `data.ids` field.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(coerce_id),
        _ => None,
    }
}
