//! Data model for tracker imports: incoming records, reference metadata,
//! validation issues and per-record outcomes.

#![deny(unsafe_code)]

pub mod enums;
pub mod issue;
pub mod metadata;
pub mod outcome;
pub mod record;
pub mod user;

pub use enums::{
    AtomicMode, EventStatus, FeatureType, IdScheme, ImportStrategy, ValidationStrategy, ValueType,
};
pub use issue::{Category, ErrorCode, Issue, ValidationConflict};
pub use metadata::{
    AttributeDefinition, DataElement, Enrollment, FileResource, Identifiable, OrganisationUnit,
    ProgramStage, ProgramStageDataElement, TrackedEntityType,
};
pub use outcome::{OutcomeReport, OutcomeStatus, ValidationOutcome};
pub use record::{
    Attribute, DataValue, Event, ExistingEvent, ExistingTrackedEntity, Geometry, ImportRecord,
    TrackedEntity,
};
pub use user::{AUTHORITY_ALL, AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION, ImportUser};
