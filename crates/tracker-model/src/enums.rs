//! Type-safe enumerations for tracker metadata and import options.
//!
//! These enums provide compile-time type safety for concepts that arrive as
//! upper-case strings in import payloads and reference data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a record is being created or updating an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStrategy {
    #[default]
    Create,
    Update,
}

impl ImportStrategy {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update)
    }
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
    Visited,
    Scheduled,
    Overdue,
    Skipped,
}

/// When a program stage demands its compulsory data elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStrategy {
    /// Compulsory values are only enforced once the event is completed.
    #[default]
    OnComplete,
    /// Compulsory values are enforced on every insert and update.
    OnUpdateAndInsert,
}

/// Geometry kind configured on a tracked-entity type or program stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    #[default]
    None,
    Point,
    Polygon,
    MultiPolygon,
    Symbol,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Point => "POINT",
            Self::Polygon => "POLYGON",
            Self::MultiPolygon => "MULTI_POLYGON",
            Self::Symbol => "SYMBOL",
        }
    }

    /// Map a GeoJSON geometry type name ("Point", "MultiPolygon", ...) to a feature type.
    ///
    /// Unknown names map to `None`.
    pub fn from_geometry_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "point" => Self::Point,
            "polygon" => Self::Polygon,
            "multipolygon" | "multi_polygon" => Self::MultiPolygon,
            "symbol" => Self::Symbol,
            _ => Self::None,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of an attribute definition or data element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    #[default]
    Text,
    LongText,
    Letter,
    PhoneNumber,
    Email,
    Boolean,
    TrueOnly,
    Date,
    Datetime,
    Time,
    Number,
    UnitInterval,
    Percentage,
    Integer,
    IntegerPositive,
    IntegerNegative,
    IntegerZeroOrPositive,
    Username,
    Coordinate,
    OrganisationUnit,
    Age,
    Url,
    File,
    Image,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::LongText => "LONG_TEXT",
            Self::Letter => "LETTER",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::Email => "EMAIL",
            Self::Boolean => "BOOLEAN",
            Self::TrueOnly => "TRUE_ONLY",
            Self::Date => "DATE",
            Self::Datetime => "DATETIME",
            Self::Time => "TIME",
            Self::Number => "NUMBER",
            Self::UnitInterval => "UNIT_INTERVAL",
            Self::Percentage => "PERCENTAGE",
            Self::Integer => "INTEGER",
            Self::IntegerPositive => "INTEGER_POSITIVE",
            Self::IntegerNegative => "INTEGER_NEGATIVE",
            Self::IntegerZeroOrPositive => "INTEGER_ZERO_OR_POSITIVE",
            Self::Username => "USERNAME",
            Self::Coordinate => "COORDINATE",
            Self::OrganisationUnit => "ORGANISATION_UNIT",
            Self::Age => "AGE",
            Self::Url => "URL",
            Self::File => "FILE_RESOURCE",
            Self::Image => "IMAGE",
        }
    }

    /// Values of this type reference a stored file resource.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File | Self::Image)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::UnitInterval
                | Self::Percentage
                | Self::Integer
                | Self::IntegerPositive
                | Self::IntegerNegative
                | Self::IntegerZeroOrPositive
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        let value = match normalized.as_str() {
            "TEXT" => Self::Text,
            "LONG_TEXT" => Self::LongText,
            "LETTER" => Self::Letter,
            "PHONE_NUMBER" => Self::PhoneNumber,
            "EMAIL" => Self::Email,
            "BOOLEAN" => Self::Boolean,
            "TRUE_ONLY" => Self::TrueOnly,
            "DATE" => Self::Date,
            "DATETIME" => Self::Datetime,
            "TIME" => Self::Time,
            "NUMBER" => Self::Number,
            "UNIT_INTERVAL" => Self::UnitInterval,
            "PERCENTAGE" => Self::Percentage,
            "INTEGER" => Self::Integer,
            "INTEGER_POSITIVE" => Self::IntegerPositive,
            "INTEGER_NEGATIVE" => Self::IntegerNegative,
            "INTEGER_ZERO_OR_POSITIVE" => Self::IntegerZeroOrPositive,
            "USERNAME" => Self::Username,
            "COORDINATE" => Self::Coordinate,
            "ORGANISATION_UNIT" => Self::OrganisationUnit,
            "AGE" => Self::Age,
            "URL" => Self::Url,
            "FILE_RESOURCE" | "FILE" => Self::File,
            "IMAGE" => Self::Image,
            _ => return Err(format!("Unknown value type: {s}")),
        };
        Ok(value)
    }
}

/// Which identifier of a metadata object an import payload refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Uid,
    Code,
    Name,
}

impl IdScheme {
    pub const fn all() -> &'static [Self] {
        &[Self::Uid, Self::Code, Self::Name]
    }
}

/// How a batch reacts to records that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicMode {
    /// Any failing record rejects the whole batch.
    All,
    /// Each record is persisted on its own merit.
    #[default]
    Object,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_type_from_geometry_name() {
        assert_eq!(FeatureType::from_geometry_name("Point"), FeatureType::Point);
        assert_eq!(
            FeatureType::from_geometry_name("MultiPolygon"),
            FeatureType::MultiPolygon
        );
        assert_eq!(
            FeatureType::from_geometry_name("LineString"),
            FeatureType::None
        );
    }

    #[test]
    fn value_type_parses_case_insensitively() {
        assert_eq!(
            "integer_positive".parse::<ValueType>(),
            Ok(ValueType::IntegerPositive)
        );
        assert!("SOMETHING".parse::<ValueType>().is_err());
        assert!(ValueType::Image.is_file());
        assert!(!ValueType::Text.is_file());
    }
}
