//! Value-type validation for attribute and data values.
//!
//! Failures carry stable message keys (`value_not_numeric`, ...) that clients
//! translate; attribute failures are additionally wrapped as E1007.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;
use tracker_model::{AttributeDefinition, DataElement, ValueType};

use crate::geo;

/// Longest value accepted for a data element.
pub const MAX_VALUE_LENGTH: usize = 50_000;

/// Longest value accepted for a tracked-entity attribute.
pub const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1_200;

static NUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?0|-?[1-9]\d*)(\.\d+)?([eE]-?\d+)?$").expect("Invalid numeric regex")
});

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|-?[1-9]\d*)$").expect("Invalid integer regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9+()#./\s-]{6,50}$").expect("Invalid phone number regex")
});

static UID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{10}$").expect("Invalid uid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value_length_greater_than_max_length")]
    TooLong,
    #[error("value_not_numeric")]
    NotNumeric,
    #[error("value_not_unit_interval")]
    NotUnitInterval,
    #[error("value_not_percentage")]
    NotPercentage,
    #[error("value_not_integer")]
    NotInteger,
    #[error("value_not_positive_integer")]
    NotPositiveInteger,
    #[error("value_not_negative_integer")]
    NotNegativeInteger,
    #[error("value_not_zero_or_positive_integer")]
    NotZeroOrPositiveInteger,
    #[error("value_not_bool")]
    NotBool,
    #[error("value_not_true_only")]
    NotTrueOnly,
    #[error("value_not_valid_date")]
    NotDate,
    #[error("value_not_valid_datetime")]
    NotDatetime,
    #[error("value_not_valid_time")]
    NotTime,
    #[error("value_not_valid_letter")]
    NotLetter,
    #[error("value_not_valid_email")]
    NotEmail,
    #[error("value_not_valid_phone_number")]
    NotPhoneNumber,
    #[error("value_not_url")]
    NotUrl,
    #[error("value_not_coordinate")]
    NotCoordinate,
    #[error("value_not_valid_uid")]
    NotUid,
    #[error("value_not_in_option_set")]
    NotInOptionSet,
}

/// Validate a data value against its data element.
pub fn validate_data_value(element: &DataElement, value: &str) -> Result<(), ValueError> {
    validate_value(element.value_type, value, &element.options, MAX_VALUE_LENGTH)
}

/// Validate an attribute value against its definition.
pub fn validate_attribute_value(
    attribute: &AttributeDefinition,
    value: &str,
) -> Result<(), ValueError> {
    validate_value(
        attribute.value_type,
        value,
        &attribute.options,
        MAX_ATTRIBUTE_VALUE_LENGTH,
    )
}

/// Validate `value` as `value_type`.
///
/// A non-empty `options` list restricts the value to those codes.
pub fn validate_value(
    value_type: ValueType,
    value: &str,
    options: &[String],
    max_length: usize,
) -> Result<(), ValueError> {
    if value.chars().count() > max_length {
        return Err(ValueError::TooLong);
    }
    check_type(value_type, value)?;
    if !options.is_empty() && !options.iter().any(|option| option == value) {
        return Err(ValueError::NotInOptionSet);
    }
    Ok(())
}

fn check_type(value_type: ValueType, value: &str) -> Result<(), ValueError> {
    match value_type {
        ValueType::Text | ValueType::LongText | ValueType::Username => Ok(()),
        ValueType::Letter => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_alphabetic() => Ok(()),
                _ => Err(ValueError::NotLetter),
            }
        }
        ValueType::Number => parse_number(value).map(|_| ()),
        ValueType::UnitInterval => {
            let number = parse_number(value).map_err(|_| ValueError::NotUnitInterval)?;
            ensure((0.0..=1.0).contains(&number), ValueError::NotUnitInterval)
        }
        ValueType::Percentage => {
            let number = parse_number(value).map_err(|_| ValueError::NotPercentage)?;
            ensure((0.0..=100.0).contains(&number), ValueError::NotPercentage)
        }
        ValueType::Integer => parse_integer(value).map(|_| ()),
        ValueType::IntegerPositive => {
            let number = parse_integer(value).map_err(|_| ValueError::NotPositiveInteger)?;
            ensure(number > 0, ValueError::NotPositiveInteger)
        }
        ValueType::IntegerNegative => {
            let number = parse_integer(value).map_err(|_| ValueError::NotNegativeInteger)?;
            ensure(number < 0, ValueError::NotNegativeInteger)
        }
        ValueType::IntegerZeroOrPositive => {
            let number = parse_integer(value).map_err(|_| ValueError::NotZeroOrPositiveInteger)?;
            ensure(number >= 0, ValueError::NotZeroOrPositiveInteger)
        }
        ValueType::Boolean => ensure(
            value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"),
            ValueError::NotBool,
        ),
        ValueType::TrueOnly => ensure(value.eq_ignore_ascii_case("true"), ValueError::NotTrueOnly),
        ValueType::Date | ValueType::Age => ensure(is_date(value), ValueError::NotDate),
        ValueType::Datetime => ensure(is_datetime(value), ValueError::NotDatetime),
        ValueType::Time => ensure(is_time(value), ValueError::NotTime),
        ValueType::Email => ensure(EMAIL_REGEX.is_match(value), ValueError::NotEmail),
        ValueType::PhoneNumber => ensure(PHONE_REGEX.is_match(value), ValueError::NotPhoneNumber),
        ValueType::Url => ensure(is_url(value), ValueError::NotUrl),
        ValueType::Coordinate => geo::parse_point(value)
            .map(|_| ())
            .map_err(|_| ValueError::NotCoordinate),
        ValueType::OrganisationUnit | ValueType::File | ValueType::Image => {
            ensure(is_valid_uid(value), ValueError::NotUid)
        }
    }
}

fn ensure(condition: bool, error: ValueError) -> Result<(), ValueError> {
    if condition { Ok(()) } else { Err(error) }
}

fn parse_number(value: &str) -> Result<f64, ValueError> {
    if !NUMERIC_REGEX.is_match(value) {
        return Err(ValueError::NotNumeric);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or(ValueError::NotNumeric)
}

fn parse_integer(value: &str) -> Result<i32, ValueError> {
    if !INTEGER_REGEX.is_match(value) {
        return Err(ValueError::NotInteger);
    }
    value.parse::<i32>().map_err(|_| ValueError::NotInteger)
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn is_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

fn is_time(value: &str) -> bool {
    ["%H:%M", "%H:%M:%S"]
        .iter()
        .any(|format| NaiveTime::parse_from_str(value, format).is_ok())
}

fn is_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    rest.is_some_and(|rest| !rest.is_empty() && !rest.chars().any(char::is_whitespace))
}

/// Whether `value` has the shape of a system identifier.
pub fn is_valid_uid(value: &str) -> bool {
    UID_REGEX.is_match(value)
}
