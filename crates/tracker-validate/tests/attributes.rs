//! Attribute sub-checks: order, short-circuiting and aggregation.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{
    AGE, ASSIGNED_FILE, DISTRICT, EXISTING_NEIGHBOUR, EXISTING_PERSON, FIRST_NAME, FREE_FILE,
    GENDER, NATIONAL_ID, OTHER_DISTRICT, PHOTO, UNIQUE_ID, UNIQUE_ID_PATTERN, messages, person,
    preheat, services, validate, validate_with, with_attribute,
};
use tracker_model::{ErrorCode, ImportRecord, ImportStrategy, Issue, ValidationOutcome};
use tracker_validate::{
    ImportOptions, JsonbValueEncoder, RegexTextPatternService, ServiceError, Services,
    TextPatternService, UniqueValueQuery, UniquenessQuery, Validator, WorkContext,
};

struct RejectingPatterns;

impl TextPatternService for RejectingPatterns {
    fn validate_pattern(&self, _pattern: &str, _value: &str) -> bool {
        false
    }

    fn is_reserved(&self, _pattern: &str, _value: &str) -> Result<bool, ServiceError> {
        Ok(false)
    }
}

#[derive(Default)]
struct AlwaysTaken {
    calls: AtomicUsize,
}

impl UniquenessQuery for AlwaysTaken {
    fn find_owner(&self, _query: &UniqueValueQuery<'_>) -> Result<Option<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some("GhostOwner1".to_string()))
    }
}

struct Unreachable;

impl UniquenessQuery for Unreachable {
    fn find_owner(&self, _query: &UniqueValueQuery<'_>) -> Result<Option<String>, ServiceError> {
        Err(ServiceError::new("uniqueness", "timeout"))
    }
}

fn run_with(services: &Services, record: impl Into<ImportRecord>) -> ValidationOutcome {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    Validator::with_services(services)
        .validate(&record.into(), &ctx)
        .expect("validation should not fail")
}

fn codes(outcome: &ValidationOutcome) -> Vec<Option<ErrorCode>> {
    outcome.issues().iter().map(Issue::code).collect()
}

#[test]
fn valid_attributes_pass() {
    let entity = person("Kj6vYde4LHh");
    let entity = with_attribute(entity, FIRST_NAME, "Anna");
    let entity = with_attribute(entity, UNIQUE_ID, "ID-0042");
    let entity = with_attribute(entity, GENDER, "Female");
    let entity = with_attribute(entity, AGE, "31");
    let entity = with_attribute(entity, PHOTO, FREE_FILE);

    let outcome = validate(entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn resubmitting_stored_value_skips_pattern() {
    // The stored value predates the pattern and does not match it.
    let mut entity = with_attribute(person(EXISTING_PERSON), UNIQUE_ID, "LEGACY-17");
    entity.strategy = ImportStrategy::Update;

    let outcome = validate(entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn pattern_mismatch_is_reported() {
    let entity = with_attribute(person("Kj6vYde4LHh"), UNIQUE_ID, "LEGACY-17");

    let outcome = validate(entity);
    assert_eq!(
        outcome.issues(),
        &[Issue::PatternMismatch {
            attribute: UNIQUE_ID.to_string(),
            value: "LEGACY-17".to_string(),
        }]
    );
    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1008)]);
}

#[test]
fn reserved_value_passes_pattern() {
    let preheat = preheat();
    let mut services = services(&preheat);
    services.text_patterns = Arc::new(
        RegexTextPatternService::new().with_reservations([(UNIQUE_ID_PATTERN, "RESERVED-1")]),
    );

    let entity = with_attribute(person("Kj6vYde4LHh"), UNIQUE_ID, "RESERVED-1");
    let outcome = run_with(&services, entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn pattern_validation_can_be_skipped() {
    let options = ImportOptions {
        skip_pattern_validation: true,
        ..ImportOptions::default()
    };
    let entity = with_attribute(person("Kj6vYde4LHh"), UNIQUE_ID, "LEGACY-99");

    let outcome = validate_with(entity, &options);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn pattern_failure_short_circuits_uniqueness() {
    let preheat = preheat();
    let taken = Arc::new(AlwaysTaken::default());
    let services = Services {
        existing_values: preheat.clone(),
        occurrences: preheat.clone(),
        uniqueness: taken.clone(),
        text_patterns: Arc::new(RejectingPatterns),
        encoder: Arc::new(JsonbValueEncoder),
    };

    let entity = with_attribute(person("Kj6vYde4LHh"), UNIQUE_ID, "ID-0042");
    let outcome = run_with(&services, entity);

    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1008)]);
    assert_eq!(taken.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn type_failure_short_circuits_uniqueness() {
    let preheat = preheat();
    let taken = Arc::new(AlwaysTaken::default());
    let mut services = services(&preheat);
    services.uniqueness = taken.clone();

    let too_long = "N".repeat(1_201);
    let entity = with_attribute(person("Kj6vYde4LHh"), NATIONAL_ID, &too_long);
    let outcome = run_with(&services, entity);

    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1007)]);
    assert_eq!(taken.calls.load(Ordering::SeqCst), 0);

    // A value that passes the cheaper checks does reach the query.
    let entity = with_attribute(person("Kj6vYde4LHh"), NATIONAL_ID, "NAT-9");
    let outcome = run_with(&services, entity);

    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1064)]);
    assert_eq!(taken.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn value_type_errors_carry_message_key() {
    let entity = with_attribute(person("Kj6vYde4LHh"), AGE, "forty");
    let entity = with_attribute(entity, GENDER, "Other");

    let outcome = validate(entity);
    assert_eq!(
        messages(&outcome),
        vec![
            format!("Error validating attribute value type: `{AGE}`; Error: `value_not_integer`."),
            format!(
                "Error validating attribute value type: `{GENDER}`; Error: `value_not_in_option_set`."
            ),
        ]
    );
}

#[test]
fn duplicate_value_is_not_unique() {
    let entity = with_attribute(person("Kj6vYde4LHh"), UNIQUE_ID, "ID-0002");

    let outcome = validate(entity);
    assert_eq!(
        outcome.issues(),
        &[Issue::NonUniqueAttributeValue {
            attribute: UNIQUE_ID.to_string(),
            value: "ID-0002".to_string(),
            owner: EXISTING_NEIGHBOUR.to_string(),
        }]
    );
}

#[test]
fn own_stored_value_is_not_a_duplicate() {
    let mut entity = with_attribute(person(EXISTING_NEIGHBOUR), UNIQUE_ID, "ID-0002");
    entity.strategy = ImportStrategy::Update;

    let outcome = validate(entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn org_unit_scoped_uniqueness() {
    let mut in_district = with_attribute(person("Kj6vYde4LHh"), NATIONAL_ID, "NAT-1");
    in_district.org_unit = Some(DISTRICT.to_string());
    let outcome = validate(in_district);
    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1064)]);

    let mut elsewhere = with_attribute(person("Kj6vYde4LHh"), NATIONAL_ID, "NAT-1");
    elsewhere.org_unit = Some(OTHER_DISTRICT.to_string());
    let outcome = validate(elsewhere);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn assigned_file_is_rejected() {
    let entity = with_attribute(person("Kj6vYde4LHh"), PHOTO, ASSIGNED_FILE);

    let outcome = validate(entity);
    assert_eq!(codes(&outcome), vec![Some(ErrorCode::E1009)]);
    assert_eq!(
        messages(&outcome),
        vec![format!(
            "File resource: `{ASSIGNED_FILE}`, has already been assigned to a different object."
        )]
    );
}

#[test]
fn resubmitted_own_file_is_accepted() {
    let mut entity = with_attribute(person(EXISTING_PERSON), PHOTO, ASSIGNED_FILE);
    entity.strategy = ImportStrategy::Update;

    let outcome = validate(entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn unknown_attribute_does_not_stop_the_others() {
    let entity = with_attribute(person("Kj6vYde4LHh"), "NoSuchAttr1", "x");
    let entity = with_attribute(entity, AGE, "forty");
    let entity = with_attribute(entity, FIRST_NAME, "Anna");

    let outcome = validate(entity);
    assert_eq!(
        codes(&outcome),
        vec![Some(ErrorCode::E1006), Some(ErrorCode::E1007)]
    );
    assert_eq!(outcome.issues()[0].subject(), "NoSuchAttr1");
}

#[test]
fn empty_values_are_not_validated() {
    let entity = with_attribute(person("Kj6vYde4LHh"), AGE, "");
    // Empty values are skipped before the attribute is resolved.
    let entity = with_attribute(entity, "NoSuchAttr1", "");

    let outcome = validate(entity);
    assert!(outcome.is_success(), "{:?}", outcome.issues());
}

#[test]
fn uniqueness_service_failure_aborts() {
    let preheat = preheat();
    let mut services = services(&preheat);
    services.uniqueness = Arc::new(Unreachable);

    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let record = ImportRecord::from(with_attribute(person("Kj6vYde4LHh"), NATIONAL_ID, "NAT-9"));

    let error = Validator::with_services(&services)
        .validate(&record, &ctx)
        .unwrap_err();
    assert!(error.to_string().contains("uniqueness unavailable: timeout"));
}
