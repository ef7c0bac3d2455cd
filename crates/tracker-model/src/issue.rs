//! Validation issue types.
//!
//! The Issue enum provides type-safe conflict creation where each variant
//! carries only its needed data. Error codes, subjects and message templates
//! are derived from the variant, so every rule is covered exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::FeatureType;

/// Stable error codes reported for tracker rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    E1004,
    E1005,
    E1006,
    E1007,
    E1008,
    E1009,
    E1010,
    E1011,
    E1012,
    E1013,
    E1063,
    E1064,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        Self::E1004,
        Self::E1005,
        Self::E1006,
        Self::E1007,
        Self::E1008,
        Self::E1009,
        Self::E1010,
        Self::E1011,
        Self::E1012,
        Self::E1013,
        Self::E1063,
        Self::E1064,
    ];

    /// Short description of the rule behind the code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E1004 => "Tracked entity type is missing",
            Self::E1005 => "Tracked entity type does not exist",
            Self::E1006 => "Attribute does not exist",
            Self::E1007 => "Attribute value does not match its value type",
            Self::E1008 => "Generated attribute value does not match its pattern",
            Self::E1009 => "File resource is assigned to another object",
            Self::E1010 => "Organisation unit is missing",
            Self::E1011 => "Organisation unit does not exist",
            Self::E1012 => "Geometry does not match the feature type",
            Self::E1013 => "Coordinates cannot be turned into a geometry",
            Self::E1063 => "Record to update does not exist",
            Self::E1064 => "Attribute value is not unique",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E1004 => "E1004",
            Self::E1005 => "E1005",
            Self::E1006 => "E1006",
            Self::E1007 => "E1007",
            Self::E1008 => "E1008",
            Self::E1009 => "E1009",
            Self::E1010 => "E1010",
            Self::E1011 => "E1011",
            Self::E1012 => "E1012",
            Self::E1013 => "E1013",
            Self::E1063 => "E1063",
            Self::E1064 => "E1064",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxonomy of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Missing or unresolvable reference.
    Structural,
    /// Malformed value, geometry or encoding.
    Format,
    /// Violated business rule.
    BusinessRule,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structural => "Structural",
            Self::Format => "Format",
            Self::BusinessRule => "Business rule",
        }
    }
}

/// A single validation failure - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum Issue {
    // Organisation unit
    /// CREATE without an organisation unit reference
    OrgUnitMissing,
    /// Organisation unit reference does not resolve
    OrgUnitNotFound { org_unit: String },
    /// Persisted record targeted by an UPDATE has no organisation unit
    ExistingOrgUnitMissing { uid: String },
    /// UPDATE of a record that is not persisted
    RecordNotFound { uid: String },

    // Tracked-entity type
    TrackedEntityTypeMissing,
    TrackedEntityTypeNotFound { tracked_entity_type: String },

    // Geometry
    /// Geometry kind differs from the configured feature type
    GeometryMismatch { feature_type: FeatureType },
    /// Coordinates could not be turned into a geometry
    InvalidGeometry { coordinates: String, error: String },

    // Attributes
    AttributeNotFound { attribute: String },
    PatternMismatch { attribute: String, value: String },
    InvalidAttributeValue { attribute: String, error: String },
    NonUniqueAttributeValue {
        attribute: String,
        value: String,
        owner: String,
    },
    FileAlreadyAssigned {
        attribute: String,
        file_resource: String,
    },

    // Events
    ProgramStageNotFound { program_stage: String },
    NonRepeatableStage { program_stage: String },
    InvalidDataElement { data_element: String },
    InvalidDataValue { data_element: String, reason: String },
    DataValueNotEncodable { data_element: String },
    MandatoryValueMissing { data_element: String },
}

impl Issue {
    /// Error code, for rules that carry one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Issue::TrackedEntityTypeMissing => Some(ErrorCode::E1004),
            Issue::TrackedEntityTypeNotFound { .. } => Some(ErrorCode::E1005),
            Issue::AttributeNotFound { .. } => Some(ErrorCode::E1006),
            Issue::InvalidAttributeValue { .. } => Some(ErrorCode::E1007),
            Issue::PatternMismatch { .. } => Some(ErrorCode::E1008),
            Issue::FileAlreadyAssigned { .. } => Some(ErrorCode::E1009),
            Issue::OrgUnitMissing => Some(ErrorCode::E1010),
            Issue::OrgUnitNotFound { .. } => Some(ErrorCode::E1011),
            Issue::ExistingOrgUnitMissing { .. } => Some(ErrorCode::E1011),
            Issue::GeometryMismatch { .. } => Some(ErrorCode::E1012),
            Issue::InvalidGeometry { .. } => Some(ErrorCode::E1013),
            Issue::RecordNotFound { .. } => Some(ErrorCode::E1063),
            Issue::NonUniqueAttributeValue { .. } => Some(ErrorCode::E1064),
            Issue::ProgramStageNotFound { .. }
            | Issue::NonRepeatableStage { .. }
            | Issue::InvalidDataElement { .. }
            | Issue::InvalidDataValue { .. }
            | Issue::DataValueNotEncodable { .. }
            | Issue::MandatoryValueMissing { .. } => None,
        }
    }

    /// What failed: an object identifier or a property name.
    pub fn subject(&self) -> &str {
        match self {
            Issue::OrgUnitMissing => "orgUnit",
            Issue::OrgUnitNotFound { org_unit } => org_unit,
            Issue::ExistingOrgUnitMissing { uid } => uid,
            Issue::RecordNotFound { uid } => uid,
            Issue::TrackedEntityTypeMissing => "trackedEntityType",
            Issue::TrackedEntityTypeNotFound {
                tracked_entity_type,
            } => tracked_entity_type,
            Issue::GeometryMismatch { .. } => "geometry",
            Issue::InvalidGeometry { .. } => "geometry",
            Issue::AttributeNotFound { attribute } => attribute,
            Issue::PatternMismatch { attribute, .. } => attribute,
            Issue::InvalidAttributeValue { attribute, .. } => attribute,
            Issue::NonUniqueAttributeValue { attribute, .. } => attribute,
            Issue::FileAlreadyAssigned { attribute, .. } => attribute,
            Issue::ProgramStageNotFound { .. } => "programStage",
            Issue::NonRepeatableStage { program_stage } => program_stage,
            // Unknown elements have no resolved uid to report against
            Issue::InvalidDataElement { .. } => "dataElement",
            Issue::InvalidDataValue { data_element, .. } => data_element,
            Issue::DataValueNotEncodable { data_element } => data_element,
            Issue::MandatoryValueMissing { data_element } => data_element,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Issue::OrgUnitMissing
            | Issue::OrgUnitNotFound { .. }
            | Issue::ExistingOrgUnitMissing { .. }
            | Issue::RecordNotFound { .. }
            | Issue::TrackedEntityTypeMissing
            | Issue::TrackedEntityTypeNotFound { .. }
            | Issue::AttributeNotFound { .. }
            | Issue::ProgramStageNotFound { .. }
            | Issue::InvalidDataElement { .. } => Category::Structural,
            Issue::GeometryMismatch { .. }
            | Issue::InvalidGeometry { .. }
            | Issue::InvalidAttributeValue { .. }
            | Issue::InvalidDataValue { .. }
            | Issue::DataValueNotEncodable { .. } => Category::Format,
            Issue::PatternMismatch { .. }
            | Issue::NonUniqueAttributeValue { .. }
            | Issue::FileAlreadyAssigned { .. }
            | Issue::NonRepeatableStage { .. }
            | Issue::MandatoryValueMissing { .. } => Category::BusinessRule,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::OrgUnitMissing => "Missing required property: `orgUnit`.".to_string(),
            Issue::OrgUnitNotFound { org_unit } => {
                format!("Could not find OrganisationUnit: `{org_unit}`.")
            }
            Issue::ExistingOrgUnitMissing { uid } => {
                format!("Existing record: `{uid}`, has no OrganisationUnit.")
            }
            Issue::RecordNotFound { uid } => format!("Record: `{uid}`, does not exist."),
            Issue::TrackedEntityTypeMissing => {
                "Missing required property: `trackedEntityType`.".to_string()
            }
            Issue::TrackedEntityTypeNotFound {
                tracked_entity_type,
            } => format!("Could not find TrackedEntityType: `{tracked_entity_type}`."),
            Issue::GeometryMismatch { feature_type } => {
                format!("Geometry does not conform to FeatureType: `{feature_type}`.")
            }
            Issue::InvalidGeometry { coordinates, error } => {
                format!("Could not create Geometry from coordinates: `{coordinates}`; Error: `{error}`.")
            }
            Issue::AttributeNotFound { attribute } => {
                format!("Attribute: `{attribute}`, does not exist.")
            }
            Issue::PatternMismatch { value, .. } => {
                format!("Value: `{value}`, does not match the attribute pattern.")
            }
            Issue::InvalidAttributeValue { attribute, error } => {
                format!("Error validating attribute value type: `{attribute}`; Error: `{error}`.")
            }
            Issue::NonUniqueAttributeValue {
                attribute,
                value,
                owner,
            } => format!(
                "Non-unique attribute value `{value}` for attribute `{attribute}`: already assigned to `{owner}`."
            ),
            Issue::FileAlreadyAssigned { file_resource, .. } => format!(
                "File resource: `{file_resource}`, has already been assigned to a different object."
            ),
            Issue::ProgramStageNotFound { program_stage } => {
                format!("Event.programStage does not point to a valid programStage: {program_stage}")
            }
            Issue::NonRepeatableStage { .. } => {
                "Program stage is not repeatable and an event already exists".to_string()
            }
            Issue::InvalidDataElement { data_element } => {
                format!("{data_element} is not a valid data element")
            }
            Issue::InvalidDataValue { reason, .. } => reason.clone(),
            Issue::DataValueNotEncodable { .. } => "Invalid data value found.".to_string(),
            Issue::MandatoryValueMissing { .. } => "value_required_but_not_provided".to_string(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "[{code}] {}", self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

/// A reported conflict as exposed to import reports: subject plus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConflict {
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub category: Category,
}

impl From<&Issue> for ValidationConflict {
    fn from(issue: &Issue) -> Self {
        Self {
            subject: issue.subject().to_string(),
            message: issue.message(),
            code: issue.code(),
            category: issue.category(),
        }
    }
}
