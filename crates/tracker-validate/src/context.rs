//! Per-batch context handed to every check.

use tracker_model::{
    AttributeDefinition, DataElement, IdScheme, OrganisationUnit, ProgramStage, TrackedEntityType,
};

use crate::options::ImportOptions;
use crate::snapshot::ReferenceSnapshot;

/// Read-only view shared by all record validations of a batch.
#[derive(Clone, Copy)]
pub struct WorkContext<'a> {
    pub snapshot: &'a dyn ReferenceSnapshot,
    pub options: &'a ImportOptions,
}

impl<'a> WorkContext<'a> {
    pub fn new(snapshot: &'a dyn ReferenceSnapshot, options: &'a ImportOptions) -> Self {
        Self { snapshot, options }
    }

    pub fn program_stage(&self, id: &str) -> Option<&'a ProgramStage> {
        self.snapshot
            .program_stage(self.options.id_schemes.program_stage, id)
    }

    pub fn organisation_unit(&self, id: &str) -> Option<&'a OrganisationUnit> {
        self.snapshot
            .organisation_unit(self.options.id_schemes.org_unit, id)
    }

    pub fn tracked_entity_type(&self, id: &str) -> Option<&'a TrackedEntityType> {
        self.snapshot
            .tracked_entity_type(self.options.id_schemes.tracked_entity_type, id)
    }

    pub fn attribute(&self, id: &str) -> Option<&'a AttributeDefinition> {
        self.snapshot
            .attribute(self.options.id_schemes.attribute, id)
    }

    pub fn data_element(&self, id: &str) -> Option<&'a DataElement> {
        self.snapshot
            .data_element(self.options.id_schemes.data_element, id)
    }

    /// Organisation unit referenced by uid from persisted state.
    pub fn organisation_unit_by_uid(&self, uid: &str) -> Option<&'a OrganisationUnit> {
        self.snapshot.organisation_unit(IdScheme::Uid, uid)
    }

    pub fn is_authorized(&self, authority: &str) -> bool {
        self.options.user_is_authorized(authority)
    }
}
