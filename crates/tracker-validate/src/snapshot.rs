//! Read-only lookup surface over preloaded reference data.
//!
//! A snapshot is built once per batch by an external loader and shared by
//! every record validation in that batch, so implementations must be safe to
//! read concurrently.

use tracker_model::{
    AttributeDefinition, DataElement, Enrollment, ExistingEvent, ExistingTrackedEntity,
    FileResource, IdScheme, OrganisationUnit, ProgramStage, TrackedEntityType,
};

pub trait ReferenceSnapshot: Send + Sync {
    fn program_stage(&self, scheme: IdScheme, id: &str) -> Option<&ProgramStage>;

    fn organisation_unit(&self, scheme: IdScheme, id: &str) -> Option<&OrganisationUnit>;

    fn tracked_entity_type(&self, scheme: IdScheme, id: &str) -> Option<&TrackedEntityType>;

    fn attribute(&self, scheme: IdScheme, id: &str) -> Option<&AttributeDefinition>;

    fn data_element(&self, scheme: IdScheme, id: &str) -> Option<&DataElement>;

    fn file_resource(&self, uid: &str) -> Option<&FileResource>;

    fn enrollment(&self, uid: &str) -> Option<&Enrollment>;

    /// Persisted tracked entity targeted by an update.
    fn existing_tracked_entity(&self, uid: &str) -> Option<&ExistingTrackedEntity>;

    /// Persisted event targeted by an update.
    fn existing_event(&self, uid: &str) -> Option<&ExistingEvent>;
}
