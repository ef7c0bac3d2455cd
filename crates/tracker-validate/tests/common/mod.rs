//! Shared fixtures: a small reference snapshot and record builders.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use tracker_model::{
    Attribute, AttributeDefinition, DataElement, DataValue, Enrollment, Event, EventStatus,
    ExistingEvent, ExistingTrackedEntity, FeatureType, FileResource, ImportRecord, ImportStrategy,
    OrganisationUnit, ProgramStage, ProgramStageDataElement, TrackedEntity, TrackedEntityType,
    ValidationOutcome, ValidationStrategy, ValueType,
};
use tracker_validate::{
    ImportOptions, Preheat, PreheatData, RegexTextPatternService, Services, Validator, WorkContext,
};

pub const DISTRICT: &str = "DiszpKrYNg8";
pub const FACILITY: &str = "g8upMTyEZGZ";
pub const OTHER_DISTRICT: &str = "O6uvpzGd5pu";

pub const PERSON: &str = "nEenWmSyUEp";
pub const HOUSEHOLD: &str = "MCPQUTHX1Ze";

pub const FIRST_NAME: &str = "w75KJ2mc4zz";
pub const UNIQUE_ID: &str = "lZGmxYbs97q";
pub const NATIONAL_ID: &str = "AuPLng5hLbE";
pub const GENDER: &str = "cejWyOfXge6";
pub const AGE: &str = "ruQQnf6rswq";
pub const PHOTO: &str = "kZeSYCgaHTk";

pub const BIRTH: &str = "A03MvHHogjR";
pub const POSTNATAL: &str = "ZzYYXq4fJie";

pub const APGAR: &str = "a3kGcGDCuk6";
pub const WEIGHT: &str = "UXz7xuGCEhU";
pub const FEEDING: &str = "X8zyunlgUfM";

pub const ENROLLMENT: &str = "RiLEKhWHlxZ";
pub const ASSIGNED_FILE: &str = "Jzwi0nMLYQq";
pub const FREE_FILE: &str = "yzCX3GfOHd6";

pub const EXISTING_PERSON: &str = "PQfMcpmXeFE";
pub const EXISTING_NEIGHBOUR: &str = "dNpxRu1mWG5";
pub const ORPHAN_PERSON: &str = "vOxUH373fy5";
pub const EXISTING_BIRTH: &str = "ZwwuwNp6gVd";

pub const UNIQUE_ID_PATTERN: &str = r#""ID-" + SEQUENTIAL(####)"#;

fn org_unit(uid: &str, code: &str, path: &str) -> OrganisationUnit {
    OrganisationUnit {
        uid: uid.to_string(),
        code: Some(code.to_string()),
        name: None,
        path: path.to_string(),
    }
}

pub fn attribute(uid: &str, code: &str, value_type: ValueType) -> AttributeDefinition {
    AttributeDefinition {
        uid: uid.to_string(),
        code: Some(code.to_string()),
        name: None,
        value_type,
        generated: false,
        unique: false,
        org_unit_scope: false,
        text_pattern: None,
        options: vec![],
    }
}

fn data_element(uid: &str, code: &str, value_type: ValueType) -> DataElement {
    DataElement {
        uid: uid.to_string(),
        code: Some(code.to_string()),
        name: None,
        value_type,
        options: vec![],
    }
}

fn stage_element(uid: &str, compulsory: bool) -> ProgramStageDataElement {
    ProgramStageDataElement {
        data_element: uid.to_string(),
        compulsory,
    }
}

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub fn preheat_data() -> PreheatData {
    PreheatData {
        program_stages: vec![
            ProgramStage {
                uid: BIRTH.to_string(),
                code: Some("BIRTH".to_string()),
                name: Some("Birth".to_string()),
                repeatable: false,
                validation_strategy: ValidationStrategy::OnComplete,
                feature_type: FeatureType::Point,
                data_elements: vec![stage_element(APGAR, true), stage_element(WEIGHT, false)],
            },
            ProgramStage {
                uid: POSTNATAL.to_string(),
                code: Some("POSTNATAL".to_string()),
                name: Some("Baby postnatal".to_string()),
                repeatable: true,
                validation_strategy: ValidationStrategy::OnUpdateAndInsert,
                feature_type: FeatureType::None,
                data_elements: vec![stage_element(APGAR, true), stage_element(FEEDING, false)],
            },
        ],
        organisation_units: vec![
            org_unit("ImspTQPwCqd", "SL", "/ImspTQPwCqd"),
            org_unit(DISTRICT, "BO", "/ImspTQPwCqd/DiszpKrYNg8"),
            org_unit(FACILITY, "BO_NGELEHUN", "/ImspTQPwCqd/DiszpKrYNg8/g8upMTyEZGZ"),
            org_unit(OTHER_DISTRICT, "KE", "/ImspTQPwCqd/O6uvpzGd5pu"),
        ],
        tracked_entity_types: vec![
            TrackedEntityType {
                uid: PERSON.to_string(),
                code: Some("PERSON".to_string()),
                name: Some("Person".to_string()),
                feature_type: FeatureType::None,
            },
            TrackedEntityType {
                uid: HOUSEHOLD.to_string(),
                code: Some("HOUSEHOLD".to_string()),
                name: Some("Household".to_string()),
                feature_type: FeatureType::Point,
            },
        ],
        attributes: vec![
            attribute(FIRST_NAME, "FIRST_NAME", ValueType::Text),
            AttributeDefinition {
                generated: true,
                unique: true,
                text_pattern: Some(UNIQUE_ID_PATTERN.to_string()),
                ..attribute(UNIQUE_ID, "UNIQUE_ID", ValueType::Text)
            },
            AttributeDefinition {
                unique: true,
                org_unit_scope: true,
                ..attribute(NATIONAL_ID, "NATIONAL_ID", ValueType::Text)
            },
            AttributeDefinition {
                options: vec!["Male".to_string(), "Female".to_string()],
                ..attribute(GENDER, "GENDER", ValueType::Text)
            },
            attribute(AGE, "AGE", ValueType::Integer),
            attribute(PHOTO, "PHOTO", ValueType::Image),
        ],
        data_elements: vec![
            data_element(APGAR, "APGAR", ValueType::Number),
            data_element(WEIGHT, "WEIGHT", ValueType::IntegerPositive),
            DataElement {
                options: vec![
                    "Exclusive".to_string(),
                    "Replacement".to_string(),
                    "Mixed".to_string(),
                ],
                ..data_element(FEEDING, "FEEDING", ValueType::Text)
            },
        ],
        file_resources: vec![
            FileResource {
                uid: ASSIGNED_FILE.to_string(),
                assigned: true,
            },
            FileResource {
                uid: FREE_FILE.to_string(),
                assigned: false,
            },
        ],
        enrollments: vec![Enrollment {
            uid: ENROLLMENT.to_string(),
            tracked_entity: Some(EXISTING_PERSON.to_string()),
            program: Some("IpHINAT79UW".to_string()),
        }],
        tracked_entities: vec![
            ExistingTrackedEntity {
                uid: EXISTING_PERSON.to_string(),
                org_unit: Some(DISTRICT.to_string()),
                tracked_entity_type: Some(PERSON.to_string()),
                attributes: values(&[
                    (UNIQUE_ID, "LEGACY-17"),
                    (NATIONAL_ID, "NAT-1"),
                    (PHOTO, ASSIGNED_FILE),
                ]),
            },
            ExistingTrackedEntity {
                uid: EXISTING_NEIGHBOUR.to_string(),
                org_unit: Some(OTHER_DISTRICT.to_string()),
                tracked_entity_type: Some(PERSON.to_string()),
                attributes: values(&[(UNIQUE_ID, "ID-0002"), (NATIONAL_ID, "NAT-2")]),
            },
            ExistingTrackedEntity {
                uid: ORPHAN_PERSON.to_string(),
                org_unit: None,
                tracked_entity_type: Some(PERSON.to_string()),
                attributes: BTreeMap::new(),
            },
        ],
        events: vec![ExistingEvent {
            uid: EXISTING_BIRTH.to_string(),
            program_stage: BIRTH.to_string(),
            enrollment: Some(ENROLLMENT.to_string()),
            org_unit: Some(DISTRICT.to_string()),
            status: EventStatus::Completed,
            deleted: false,
            data_values: values(&[(APGAR, "8")]),
        }],
    }
}

pub fn preheat() -> Arc<Preheat> {
    Arc::new(Preheat::from(preheat_data()))
}

pub fn services(preheat: &Arc<Preheat>) -> Services {
    Services::from_preheat(preheat.clone(), Arc::new(RegexTextPatternService::new()))
}

/// Validate `record` with the default chains and options.
pub fn validate(record: impl Into<ImportRecord>) -> ValidationOutcome {
    validate_with(record, &ImportOptions::default())
}

pub fn validate_with(record: impl Into<ImportRecord>, options: &ImportOptions) -> ValidationOutcome {
    let preheat = preheat();
    let validator = Validator::with_services(&services(&preheat));
    let ctx = WorkContext::new(preheat.as_ref(), options);
    validator
        .validate(&record.into(), &ctx)
        .expect("validation should not fail")
}

pub fn person(uid: &str) -> TrackedEntity {
    TrackedEntity {
        uid: uid.to_string(),
        strategy: ImportStrategy::Create,
        tracked_entity_type: Some(PERSON.to_string()),
        org_unit: Some(FACILITY.to_string()),
        ..TrackedEntity::default()
    }
}

pub fn with_attribute(mut entity: TrackedEntity, attribute: &str, value: &str) -> TrackedEntity {
    entity.attributes.push(Attribute {
        attribute: attribute.to_string(),
        value: Some(value.to_string()),
    });
    entity
}

pub fn event(uid: &str, program_stage: &str) -> Event {
    Event {
        uid: uid.to_string(),
        strategy: ImportStrategy::Create,
        program_stage: program_stage.to_string(),
        enrollment: Some(ENROLLMENT.to_string()),
        org_unit: Some(FACILITY.to_string()),
        status: EventStatus::Active,
        ..Event::default()
    }
}

pub fn with_value(mut event: Event, data_element: &str, value: &str) -> Event {
    event.data_values.push(DataValue {
        data_element: data_element.to_string(),
        value: Some(value.to_string()),
        provided_elsewhere: false,
    });
    event
}

/// Messages of the outcome's conflicts, in report order.
pub fn messages(outcome: &ValidationOutcome) -> Vec<String> {
    outcome
        .conflicts()
        .into_iter()
        .map(|conflict| conflict.message)
        .collect()
}
