//! Check chain contract: ordering, accumulation and terminal short-circuit.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{event, person, preheat, services};
use tracker_model::{ImportRecord, Issue, OutcomeStatus};
use tracker_validate::{
    CheckChain, FnCheck, ImportOptions, ServiceError, ValidateError, WorkContext,
};

fn org_unit_missing() -> FnCheck {
    FnCheck::new("org_unit_missing", |_, _, outcome| {
        outcome.add(Issue::OrgUnitMissing);
        Ok(())
    })
}

fn type_missing() -> FnCheck {
    FnCheck::new("type_missing", |_, _, outcome| {
        outcome.add(Issue::TrackedEntityTypeMissing);
        Ok(())
    })
}

fn counting(calls: Arc<AtomicUsize>) -> FnCheck {
    FnCheck::new("counting", move |_, _, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn non_terminal_conflicts_accumulate_in_order() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let chain = CheckChain::new().with(type_missing()).with(org_unit_missing());

    let outcome = chain
        .run(&ImportRecord::from(person("Kj6vYde4LHh")), &ctx)
        .expect("run chain");

    assert_eq!(outcome.status(), OutcomeStatus::Error);
    assert_eq!(
        outcome.issues(),
        &[Issue::TrackedEntityTypeMissing, Issue::OrgUnitMissing]
    );
    assert!(!outcome.is_terminated());
}

#[test]
fn failing_terminal_check_stops_the_chain() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = CheckChain::new()
        .with(org_unit_missing().terminal())
        .with(counting(calls.clone()));

    let outcome = chain
        .run(&ImportRecord::from(person("Kj6vYde4LHh")), &ctx)
        .expect("run chain");

    assert_eq!(outcome.conflict_count(), 1);
    assert_eq!(outcome.terminated_by(), Some("org_unit_missing"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn passing_terminal_check_does_not_stop_the_chain() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = CheckChain::new()
        .with(FnCheck::new("noop", |_, _, _| Ok(())).terminal())
        .with(counting(calls.clone()));

    let outcome = chain
        .run(&ImportRecord::from(person("Kj6vYde4LHh")), &ctx)
        .expect("run chain");

    assert!(outcome.is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn conflicts_before_a_terminal_check_do_not_trigger_it() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = CheckChain::new()
        .with(type_missing())
        .with(FnCheck::new("noop", |_, _, _| Ok(())).terminal())
        .with(counting(calls.clone()));

    let outcome = chain
        .run(&ImportRecord::from(person("Kj6vYde4LHh")), &ctx)
        .expect("run chain");

    assert_eq!(outcome.conflict_count(), 1);
    assert!(!outcome.is_terminated());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn service_failures_propagate() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let chain = CheckChain::new().with(FnCheck::new("lookup", |_, _, _| {
        Err(ValidateError::Service {
            check: "lookup",
            source: ServiceError::new("uniqueness", "connection refused"),
        })
    }));

    let error = chain
        .run(&ImportRecord::from(person("Kj6vYde4LHh")), &ctx)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "lookup check could not complete: uniqueness unavailable: connection refused"
    );
}

#[test]
fn default_chains_have_canonical_order() {
    let preheat = preheat();
    let services = services(&preheat);

    assert_eq!(
        CheckChain::for_events(&services).names(),
        vec![
            "program_stage",
            "repeatable_stage",
            "org_unit",
            "geometry",
            "data_values"
        ]
    );
    assert_eq!(
        CheckChain::for_tracked_entities(&services).names(),
        vec!["org_unit", "tracked_entity_type", "geometry", "attributes"]
    );
}

#[test]
fn checks_ignore_other_record_kinds() {
    let preheat = preheat();
    let options = ImportOptions::default();
    let ctx = WorkContext::new(preheat.as_ref(), &options);
    let chain = CheckChain::for_tracked_entities(&services(&preheat));

    // A well-formed event passes the tracked-entity-only checks untouched.
    let outcome = chain
        .run(&ImportRecord::from(event("Kj6vYde4LHh", common::POSTNATAL)), &ctx)
        .expect("run chain");
    assert!(outcome.is_success());
}
