//! Incoming import records and the persisted state they are compared against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{EventStatus, FeatureType, ImportStrategy};

/// The unit being validated: one event or one tracked entity.
///
/// A record is owned by its batch for the duration of validation and is never
/// shared between concurrent validations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportRecord {
    Event(Event),
    TrackedEntity(TrackedEntity),
}

impl ImportRecord {
    pub fn uid(&self) -> &str {
        match self {
            ImportRecord::Event(event) => &event.uid,
            ImportRecord::TrackedEntity(entity) => &entity.uid,
        }
    }

    pub fn strategy(&self) -> ImportStrategy {
        match self {
            ImportRecord::Event(event) => event.strategy,
            ImportRecord::TrackedEntity(entity) => entity.strategy,
        }
    }

    pub fn org_unit(&self) -> Option<&str> {
        match self {
            ImportRecord::Event(event) => event.org_unit.as_deref(),
            ImportRecord::TrackedEntity(entity) => entity.org_unit.as_deref(),
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            ImportRecord::Event(event) => event.geometry.as_ref(),
            ImportRecord::TrackedEntity(entity) => entity.geometry.as_ref(),
        }
    }

    /// Short label used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportRecord::Event(_) => "Event",
            ImportRecord::TrackedEntity(_) => "TrackedEntity",
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            ImportRecord::Event(event) => Some(event),
            ImportRecord::TrackedEntity(_) => None,
        }
    }

    pub fn as_tracked_entity(&self) -> Option<&TrackedEntity> {
        match self {
            ImportRecord::TrackedEntity(entity) => Some(entity),
            ImportRecord::Event(_) => None,
        }
    }
}

impl From<Event> for ImportRecord {
    fn from(event: Event) -> Self {
        ImportRecord::Event(event)
    }
}

impl From<TrackedEntity> for ImportRecord {
    fn from(entity: TrackedEntity) -> Self {
        ImportRecord::TrackedEntity(entity)
    }
}

/// One occurrence of a program stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub uid: String,
    #[serde(default)]
    pub strategy: ImportStrategy,
    /// Program stage identifier under the configured id scheme.
    pub program_stage: String,
    #[serde(default)]
    pub enrollment: Option<String>,
    #[serde(default)]
    pub org_unit: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub data_values: Vec<DataValue>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// A person or case carrying attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    pub uid: String,
    #[serde(default)]
    pub strategy: ImportStrategy,
    #[serde(default)]
    pub tracked_entity_type: Option<String>,
    #[serde(default)]
    pub org_unit: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Legacy coordinate string, interpreted with `feature_type`.
    #[serde(default)]
    pub coordinates: Option<String>,
    #[serde(default)]
    pub feature_type: FeatureType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute identifier under the configured id scheme.
    pub attribute: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Attribute {
    /// The value when present and non-empty.
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    /// Data element identifier under the configured id scheme.
    pub data_element: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub provided_elsewhere: bool,
}

impl DataValue {
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.trim().is_empty())
    }
}

/// A GeoJSON-like geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

/// A tracked entity as currently persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingTrackedEntity {
    pub uid: String,
    #[serde(default)]
    pub org_unit: Option<String>,
    #[serde(default)]
    pub tracked_entity_type: Option<String>,
    /// Stored values keyed by attribute uid.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// An event as currently persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingEvent {
    pub uid: String,
    /// Uid of the program stage.
    pub program_stage: String,
    /// Uid of the owning enrollment.
    #[serde(default)]
    pub enrollment: Option<String>,
    #[serde(default)]
    pub org_unit: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub deleted: bool,
    /// Stored values keyed by data element uid.
    #[serde(default)]
    pub data_values: BTreeMap<String, String>,
}

impl ExistingEvent {
    /// Counts towards a non-repeatable stage's single allowed occurrence.
    pub fn is_live_occurrence(&self) -> bool {
        !self.deleted && self.status != EventStatus::Skipped
    }
}
