//! Strict parsing of birthdate and reference-time strings.
//!
//! Free-form input is turned into a tagged [`DateValue`] or a typed
//! [`DateError`]; nothing is silently coerced.
//!
//! Accepted forms, tried in order:
//!
//! | Form | Example |
//! |------|---------|
//! | date-time with offset | `2000-04-30T08:15:00+02:00`, `2000-04-30T08:15:00Z` |
//! | local date-time | `2000-04-30T08:15:00`, `2000-04-30 08:15` |
//! | extended date | `2000-04-30` |
//! | basic date | `20000430` |

use std::{fmt, str::FromStr};

use chrono::{
  DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use thiserror::Error;

// ─── Error ───────────────────────────────────────────────────────────────────

/// Why a date string could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
  #[error("date is missing or empty")]
  Missing,

  #[error("unrecognised date: {0:?}")]
  Malformed(String),
}

// ─── Value ───────────────────────────────────────────────────────────────────

/// A successfully parsed date or date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DateValue {
  /// A calendar date without time component.
  Date(NaiveDate),
  /// A wall-clock date-time with no offset.
  Local(NaiveDateTime),
  /// A date-time anchored to a UTC offset.
  Zoned(DateTime<FixedOffset>),
}

impl DateValue {
  /// The calendar date as written. Time of day is dropped; a zoned value
  /// keeps the date in its own offset rather than converting to UTC.
  pub fn calendar_date(&self) -> NaiveDate {
    match self {
      Self::Date(d) => *d,
      Self::Local(dt) => dt.date(),
      Self::Zoned(dt) => dt.date_naive(),
    }
  }

  /// Convert to an instant. Values without an offset are read as UTC, and a
  /// bare date is midnight.
  pub fn to_instant(&self) -> DateTime<FixedOffset> {
    match self {
      Self::Date(d) => d.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
      Self::Local(dt) => dt.and_utc().fixed_offset(),
      Self::Zoned(dt) => *dt,
    }
  }
}

impl fmt::Display for DateValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
      Self::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
      Self::Zoned(dt) => {
        write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
      }
    }
  }
}

impl FromStr for DateValue {
  type Err = DateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { parse_date_value(s) }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

const ZONED_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f%z",
  "%Y-%m-%d %H:%M:%S%.f%:z",
  "%Y-%m-%dT%H:%M%:z",
  "%Y-%m-%d %H:%M%:z",
];

const LOCAL_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse a birthdate or reference-time string.
///
/// Surrounding whitespace is ignored. Year-omitted vCard dates (`--MMDD`)
/// are rejected: an age cannot be computed without a year.
pub fn parse_date_value(input: &str) -> Result<DateValue, DateError> {
  let s = input.trim();
  if s.is_empty() {
    return Err(DateError::Missing);
  }
  if s.starts_with("--") {
    return Err(DateError::Malformed(s.to_string()));
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(DateValue::Zoned(dt));
  }
  for fmt in ZONED_FORMATS {
    if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
      return Ok(DateValue::Zoned(dt));
    }
  }
  for fmt in LOCAL_FORMATS {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(DateValue::Local(dt));
    }
  }
  for fmt in DATE_FORMATS {
    if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
      return Ok(DateValue::Date(d));
    }
  }

  Err(DateError::Malformed(s.to_string()))
}

/// Parse a string into an instant; see [`DateValue::to_instant`].
pub fn parse_instant(input: &str) -> Result<DateTime<FixedOffset>, DateError> {
  parse_date_value(input).map(|v| v.to_instant())
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// `deserialize_with` for an optional reference time given as text.
///
/// Goes through [`parse_instant`], so a bare date or a naive timestamp is
/// accepted as well as RFC 3339. Unparseable text is a deserialization
/// error.
pub fn deserialize_opt_instant<'de, D>(
  deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(s) => parse_instant(&s).map(Some).map_err(serde::de::Error::custom),
    None => Ok(None),
  }
}

/// `deserialize_with` for an optional birthdate.
///
/// Any value that is not a string (a number, an object) reads as absent and
/// so evaluates as a missing birthdate instead of failing the whole document.
pub fn deserialize_opt_text<'de, D>(
  deserializer: D,
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Text {
    Str(String),
    Other(IgnoredAny),
  }

  Ok(match Option::<Text>::deserialize(deserializer)? {
    Some(Text::Str(s)) => Some(s),
    Some(Text::Other(_)) | None => None,
  })
}

#[cfg(test)]
mod tests {
  use chrono::{Datelike, Timelike};

  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn extended_date() {
    let v = parse_date_value("2000-04-30").unwrap();
    assert_eq!(v, DateValue::Date(ymd(2000, 4, 30)));
  }

  #[test]
  fn basic_date() {
    let v = parse_date_value("19900315").unwrap();
    assert_eq!(v.calendar_date(), ymd(1990, 3, 15));
  }

  #[test]
  fn surrounding_whitespace_is_ignored() {
    let v = parse_date_value("  2000-04-30\n").unwrap();
    assert_eq!(v.calendar_date(), ymd(2000, 4, 30));
  }

  #[test]
  fn rfc3339_with_offset_keeps_its_own_calendar_date() {
    // 23:30 at -05:00 is already the next day in UTC.
    let v = parse_date_value("2000-04-30T23:30:00-05:00").unwrap();
    assert!(matches!(v, DateValue::Zoned(_)));
    assert_eq!(v.calendar_date(), ymd(2000, 4, 30));
    assert_eq!(v.to_instant().naive_utc().date(), ymd(2000, 5, 1));
  }

  #[test]
  fn zulu_suffix() {
    let v = parse_date_value("2021-04-30T00:00:00Z").unwrap();
    assert_eq!(v.to_instant().offset().local_minus_utc(), 0);
  }

  #[test]
  fn offset_without_seconds() {
    let v = parse_date_value("2000-04-30T08:15+02:00").unwrap();
    let dt = v.to_instant();
    assert_eq!(dt.hour(), 8);
    assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
  }

  #[test]
  fn local_date_time_variants() {
    for s in [
      "2000-04-30T08:15:00",
      "2000-04-30 08:15:00",
      "2000-04-30T08:15:00.250",
      "2000-04-30 08:15",
    ] {
      let v = parse_date_value(s).unwrap_or_else(|e| panic!("{s}: {e}"));
      assert!(matches!(v, DateValue::Local(_)), "{s} parsed as {v:?}");
      assert_eq!(v.calendar_date(), ymd(2000, 4, 30));
    }
  }

  #[test]
  fn bare_date_instant_is_midnight_utc() {
    let dt = parse_instant("2021-04-30").unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 4, 30));
    assert_eq!(dt.hour(), 0);
    assert_eq!(dt.offset().local_minus_utc(), 0);
  }

  #[test]
  fn empty_is_missing() {
    assert_eq!(parse_date_value(""), Err(DateError::Missing));
    assert_eq!(parse_date_value("   "), Err(DateError::Missing));
  }

  #[test]
  fn garbage_is_malformed() {
    assert_eq!(
      parse_date_value("not-a-date"),
      Err(DateError::Malformed("not-a-date".to_string()))
    );
  }

  #[test]
  fn impossible_calendar_date_is_malformed() {
    assert!(matches!(
      parse_date_value("2001-02-29"),
      Err(DateError::Malformed(_))
    ));
    assert!(matches!(
      parse_date_value("2000-13-01"),
      Err(DateError::Malformed(_))
    ));
  }

  #[test]
  fn year_omitted_is_malformed() {
    assert!(matches!(
      parse_date_value("--0315"),
      Err(DateError::Malformed(_))
    ));
  }

  #[test]
  fn display_round_trips_through_parse() {
    for s in ["2000-04-30", "2000-04-30T08:15:00", "2000-04-30T08:15:00+02:00"] {
      let v = parse_date_value(s).unwrap();
      assert_eq!(v.to_string().parse::<DateValue>().unwrap(), v);
    }
  }

  #[derive(Debug, Deserialize)]
  struct Wire {
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    at:   Option<DateTime<FixedOffset>>,
  }

  fn wire(v: serde_json::Value) -> Result<Wire, serde_json::Error> {
    serde_json::from_value(v)
  }

  #[test]
  fn non_string_text_reads_as_absent() {
    for v in [
      serde_json::json!(20000430),
      serde_json::json!(true),
      serde_json::json!(null),
      serde_json::json!({ "y": 2000 }),
      serde_json::json!(["2000-04-30"]),
    ] {
      let w = wire(serde_json::json!({ "text": v })).unwrap();
      assert_eq!(w.text, None, "{v}");
    }
    let w = wire(serde_json::json!({ "text": "2000-04-30" })).unwrap();
    assert_eq!(w.text.as_deref(), Some("2000-04-30"));
  }

  #[test]
  fn instant_field_accepts_bare_date() {
    let w = wire(serde_json::json!({ "at": "2021-04-30" })).unwrap();
    assert_eq!(w.at, Some(parse_instant("2021-04-30T00:00:00Z").unwrap()));

    let w = wire(serde_json::json!({ "at": "2021-04-30T09:30:00+02:00" })).unwrap();
    assert_eq!(w.at.unwrap().offset().local_minus_utc(), 7200);

    assert!(wire(serde_json::json!({})).unwrap().at.is_none());
  }

  #[test]
  fn instant_field_rejects_garbage() {
    let err = wire(serde_json::json!({ "at": "yesterday" })).unwrap_err();
    assert!(err.to_string().contains("yesterday"));
  }
}
