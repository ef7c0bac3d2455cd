//! In-memory reference snapshot.
//!
//! A [`Preheat`] is loaded once per batch (usually from a JSON export) and
//! answers every snapshot lookup and persisted-state query without I/O.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracker_model::{
    AttributeDefinition, DataElement, Enrollment, ExistingEvent, ExistingTrackedEntity,
    FileResource, IdScheme, Identifiable, OrganisationUnit, ProgramStage, TrackedEntityType,
};

use crate::error::ServiceError;
use crate::services::{ExistingValueLookup, OccurrenceStore, UniqueValueQuery, UniquenessQuery};
use crate::snapshot::ReferenceSnapshot;

/// Metadata objects addressable under every id scheme.
#[derive(Debug, Clone)]
pub struct IdentifiableIndex<T> {
    items: Vec<T>,
    keys: HashMap<(IdScheme, String), usize>,
}

impl<T> Default for IdentifiableIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: HashMap::new(),
        }
    }
}

impl<T: Identifiable> IdentifiableIndex<T> {
    /// Index `items`; on a duplicate identifier the first object wins.
    pub fn new(items: Vec<T>) -> Self {
        let mut keys = HashMap::new();
        for (position, item) in items.iter().enumerate() {
            for &scheme in IdScheme::all() {
                if let Some(identifier) = item.identifier(scheme) {
                    keys.entry((scheme, identifier.to_string()))
                        .or_insert(position);
                }
            }
        }
        Self { items, keys }
    }

    pub fn get(&self, scheme: IdScheme, id: &str) -> Option<&T> {
        self.keys
            .get(&(scheme, id.to_string()))
            .map(|&position| &self.items[position])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// Serialized form of a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreheatData {
    pub program_stages: Vec<ProgramStage>,
    pub organisation_units: Vec<OrganisationUnit>,
    pub tracked_entity_types: Vec<TrackedEntityType>,
    pub attributes: Vec<AttributeDefinition>,
    pub data_elements: Vec<DataElement>,
    pub file_resources: Vec<FileResource>,
    pub enrollments: Vec<Enrollment>,
    pub tracked_entities: Vec<ExistingTrackedEntity>,
    pub events: Vec<ExistingEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct Preheat {
    program_stages: IdentifiableIndex<ProgramStage>,
    organisation_units: IdentifiableIndex<OrganisationUnit>,
    tracked_entity_types: IdentifiableIndex<TrackedEntityType>,
    attributes: IdentifiableIndex<AttributeDefinition>,
    data_elements: IdentifiableIndex<DataElement>,
    file_resources: HashMap<String, FileResource>,
    enrollments: HashMap<String, Enrollment>,
    tracked_entities: BTreeMap<String, ExistingTrackedEntity>,
    events: BTreeMap<String, ExistingEvent>,
}

impl Preheat {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<PreheatData>(source).map(Self::from)
    }

    pub fn program_stages(&self) -> &IdentifiableIndex<ProgramStage> {
        &self.program_stages
    }

    pub fn attributes(&self) -> &IdentifiableIndex<AttributeDefinition> {
        &self.attributes
    }

    pub fn tracked_entity_count(&self) -> usize {
        self.tracked_entities.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl From<PreheatData> for Preheat {
    fn from(data: PreheatData) -> Self {
        Self {
            program_stages: IdentifiableIndex::new(data.program_stages),
            organisation_units: IdentifiableIndex::new(data.organisation_units),
            tracked_entity_types: IdentifiableIndex::new(data.tracked_entity_types),
            attributes: IdentifiableIndex::new(data.attributes),
            data_elements: IdentifiableIndex::new(data.data_elements),
            file_resources: data
                .file_resources
                .into_iter()
                .map(|file| (file.uid.clone(), file))
                .collect(),
            enrollments: data
                .enrollments
                .into_iter()
                .map(|enrollment| (enrollment.uid.clone(), enrollment))
                .collect(),
            tracked_entities: data
                .tracked_entities
                .into_iter()
                .map(|entity| (entity.uid.clone(), entity))
                .collect(),
            events: data
                .events
                .into_iter()
                .map(|event| (event.uid.clone(), event))
                .collect(),
        }
    }
}

impl ReferenceSnapshot for Preheat {
    fn program_stage(&self, scheme: IdScheme, id: &str) -> Option<&ProgramStage> {
        self.program_stages.get(scheme, id)
    }

    fn organisation_unit(&self, scheme: IdScheme, id: &str) -> Option<&OrganisationUnit> {
        self.organisation_units.get(scheme, id)
    }

    fn tracked_entity_type(&self, scheme: IdScheme, id: &str) -> Option<&TrackedEntityType> {
        self.tracked_entity_types.get(scheme, id)
    }

    fn attribute(&self, scheme: IdScheme, id: &str) -> Option<&AttributeDefinition> {
        self.attributes.get(scheme, id)
    }

    fn data_element(&self, scheme: IdScheme, id: &str) -> Option<&DataElement> {
        self.data_elements.get(scheme, id)
    }

    fn file_resource(&self, uid: &str) -> Option<&FileResource> {
        self.file_resources.get(uid)
    }

    fn enrollment(&self, uid: &str) -> Option<&Enrollment> {
        self.enrollments.get(uid)
    }

    fn existing_tracked_entity(&self, uid: &str) -> Option<&ExistingTrackedEntity> {
        self.tracked_entities.get(uid)
    }

    fn existing_event(&self, uid: &str) -> Option<&ExistingEvent> {
        self.events.get(uid)
    }
}

impl ExistingValueLookup for Preheat {
    fn values_for(&self, entity: &str) -> Result<HashMap<String, String>, ServiceError> {
        Ok(self
            .tracked_entities
            .get(entity)
            .map(|entity| {
                entity
                    .attributes
                    .iter()
                    .map(|(attribute, value)| (attribute.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl OccurrenceStore for Preheat {
    fn exists(&self, program_stage: &str) -> Result<bool, ServiceError> {
        Ok(self
            .events
            .values()
            .any(|event| event.program_stage == program_stage && event.is_live_occurrence()))
    }
}

impl UniquenessQuery for Preheat {
    fn find_owner(&self, query: &UniqueValueQuery<'_>) -> Result<Option<String>, ServiceError> {
        let in_scope = |entity: &ExistingTrackedEntity| match query.scope {
            None => true,
            Some(scope) => entity
                .org_unit
                .as_deref()
                .and_then(|uid| self.organisation_units.get(IdScheme::Uid, uid))
                .is_some_and(|org_unit| org_unit.is_descendant_of(scope)),
        };

        Ok(self
            .tracked_entities
            .values()
            .filter(|entity| entity.uid != query.exclude)
            .filter(|entity| {
                entity
                    .attributes
                    .get(&query.attribute.uid)
                    .is_some_and(|value| value == query.value)
            })
            .find(|&entity| in_scope(entity))
            .map(|entity| entity.uid.clone()))
    }
}
