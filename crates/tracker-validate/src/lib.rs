//! Validation engine for tracker imports.
//!
//! Records run through a [`CheckChain`] of checks that report issues into a
//! per-record [`ValidationOutcome`](tracker_model::ValidationOutcome):
//!
//! - **Events**: program stage, repeatable stage, org unit, geometry, data values
//! - **Tracked entities**: org unit, tracked-entity type, geometry, attributes
//!
//! Attribute values pass four ordered sub-checks (text pattern, value type,
//! uniqueness, file assignment) that stop at the first failure.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tracker_validate::{
//!     CollectingSink, ImportDriver, ImportOptions, Preheat, RegexTextPatternService, Services,
//!     Validator,
//! };
//!
//! let preheat = Arc::new(Preheat::from_json_str(&snapshot_json)?);
//! let services = Services::from_preheat(preheat.clone(), Arc::new(RegexTextPatternService::new()));
//! let driver = ImportDriver::new(Validator::with_services(&services), ImportOptions::default());
//!
//! let mut sink = CollectingSink::default();
//! let report = driver.import(preheat.as_ref(), &records, &mut sink)?;
//! println!("imported {} of {}", report.imported, report.total);
//! ```

#![deny(unsafe_code)]

pub mod chain;
pub mod checks;
pub mod context;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod geo;
pub mod logging;
pub mod options;
pub mod preheat;
pub mod services;
pub mod snapshot;
pub mod text_pattern;
pub mod value_type;

pub use chain::{Check, CheckChain, FnCheck, Services, Validator};
pub use checks::{
    AttributeCheck, AttributeInput, AttributeRule, AttributeValidator, DataValueCheck,
    GeometryCheck, OrgUnitCheck, ProgramStageCheck, RepeatableStageCheck, TrackedEntityTypeCheck,
};
pub use context::WorkContext;
pub use driver::{BatchStatus, CollectingSink, ImportDriver, ImportReport};
pub use encoding::{EncodeError, JsonbValueEncoder};
pub use error::{ConfigError, ServiceError, ValidateError};
pub use geo::{GeometryError, ParsedGeometry};
pub use options::{IdSchemes, ImportOptions};
pub use preheat::{IdentifiableIndex, Preheat, PreheatData};
pub use services::{
    ExistingValueLookup, OccurrenceStore, RecordSink, TextPatternService, UniqueValueQuery,
    UniquenessQuery, ValueEncoder,
};
pub use snapshot::ReferenceSnapshot;
pub use text_pattern::{RegexTextPatternService, Segment, TextPattern, TextPatternError};
pub use value_type::ValueError;
