//! Collaborators injected into checks.
//!
//! Each method that reaches persisted state may fail with a [`ServiceError`],
//! which aborts the batch rather than being reported as a conflict.

use std::collections::HashMap;

use tracker_model::{AttributeDefinition, DataValue, ImportRecord, OrganisationUnit};

use crate::encoding::EncodeError;
use crate::error::ServiceError;

/// Previously stored attribute values of a tracked entity.
pub trait ExistingValueLookup: Send + Sync {
    /// Stored values of `entity` keyed by attribute uid.
    fn values_for(&self, entity: &str) -> Result<HashMap<String, String>, ServiceError>;
}

/// Existence of persisted events for a program stage.
pub trait OccurrenceStore: Send + Sync {
    /// Whether a non-deleted, non-skipped event of the stage uid exists.
    fn exists(&self, program_stage: &str) -> Result<bool, ServiceError>;
}

/// A lookup for another owner of a unique attribute value.
#[derive(Debug, Clone, Copy)]
pub struct UniqueValueQuery<'a> {
    pub attribute: &'a AttributeDefinition,
    pub value: &'a str,
    /// The record being validated; its own stored value never conflicts.
    pub exclude: &'a str,
    /// Restrict the search to this organisation unit and its descendants.
    pub scope: Option<&'a OrganisationUnit>,
}

/// Scoped existence query for unique attribute values.
///
/// The answer is advisory: two records validated concurrently may both pass.
/// Only a storage-level constraint guarantees uniqueness.
pub trait UniquenessQuery: Send + Sync {
    /// Uid of another record already holding the value, if any.
    fn find_owner(&self, query: &UniqueValueQuery<'_>) -> Result<Option<String>, ServiceError>;
}

/// Text-pattern grammar and value reservations for generated attributes.
pub trait TextPatternService: Send + Sync {
    fn validate_pattern(&self, pattern: &str, value: &str) -> bool;

    fn is_reserved(&self, pattern: &str, value: &str) -> Result<bool, ServiceError>;
}

/// Encoding of data values for storage.
pub trait ValueEncoder: Send + Sync {
    fn encode(&self, value: &DataValue) -> Result<String, EncodeError>;
}

/// Destination for records that passed validation.
pub trait RecordSink {
    fn persist(&mut self, record: &ImportRecord) -> Result<(), ServiceError>;
}
