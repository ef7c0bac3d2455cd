//! Ordered check execution.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tracker_model::{ImportRecord, ValidationOutcome};

use crate::checks::{
    AttributeCheck, DataValueCheck, GeometryCheck, OrgUnitCheck, ProgramStageCheck,
    RepeatableStageCheck, TrackedEntityTypeCheck,
};
use crate::context::WorkContext;
use crate::encoding::JsonbValueEncoder;
use crate::error::ValidateError;
use crate::preheat::Preheat;
use crate::services::{
    ExistingValueLookup, OccurrenceStore, TextPatternService, UniquenessQuery, ValueEncoder,
};

/// One validation step.
///
/// Checks hold no per-record state: everything a check learns about a record
/// goes into the outcome, so a single instance serves concurrent validations.
pub trait Check: Send + Sync {
    /// Stable name used in logs and in the outcome of a terminated chain.
    fn name(&self) -> &'static str;

    /// Inspect `record` and report any issues into `outcome`.
    ///
    /// Rule violations are never errors; `Err` means a collaborator failed
    /// and the batch cannot continue.
    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError>;

    /// A terminal check that reports any issue stops the chain.
    fn is_terminal(&self) -> bool {
        false
    }
}

type CheckFn = dyn Fn(&ImportRecord, &WorkContext<'_>, &mut ValidationOutcome) -> Result<(), ValidateError>
    + Send
    + Sync;

/// A check built from a closure.
pub struct FnCheck {
    name: &'static str,
    terminal: bool,
    run: Box<CheckFn>,
}

impl FnCheck {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(&ImportRecord, &WorkContext<'_>, &mut ValidationOutcome) -> Result<(), ValidateError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            terminal: false,
            run: Box::new(run),
        }
    }

    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}

impl Check for FnCheck {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError> {
        (self.run)(record, ctx, outcome)
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl fmt::Debug for FnCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCheck")
            .field("name", &self.name)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// Collaborators shared by the default checks.
#[derive(Clone)]
pub struct Services {
    pub existing_values: Arc<dyn ExistingValueLookup>,
    pub occurrences: Arc<dyn OccurrenceStore>,
    pub uniqueness: Arc<dyn UniquenessQuery>,
    pub text_patterns: Arc<dyn TextPatternService>,
    pub encoder: Arc<dyn ValueEncoder>,
}

impl Services {
    /// Answer persisted-state queries from `preheat` and encode values as jsonb.
    pub fn from_preheat(preheat: Arc<Preheat>, text_patterns: Arc<dyn TextPatternService>) -> Self {
        Self {
            existing_values: preheat.clone(),
            occurrences: preheat.clone(),
            uniqueness: preheat,
            text_patterns,
            encoder: Arc::new(JsonbValueEncoder),
        }
    }
}

/// An ordered list of checks run against one record.
#[derive(Default)]
pub struct CheckChain {
    checks: Vec<Box<dyn Check>>,
}

impl CheckChain {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.push(check);
        self
    }

    pub fn push(&mut self, check: impl Check + 'static) {
        self.checks.push(Box::new(check));
    }

    /// Program stage, repeatable stage, org unit, geometry, data values.
    pub fn for_events(services: &Services) -> Self {
        Self::new()
            .with(ProgramStageCheck)
            .with(RepeatableStageCheck::new(services.occurrences.clone()))
            .with(OrgUnitCheck)
            .with(GeometryCheck)
            .with(DataValueCheck::new(services.encoder.clone()))
    }

    /// Org unit, tracked-entity type, geometry, attributes.
    pub fn for_tracked_entities(services: &Services) -> Self {
        Self::new()
            .with(OrgUnitCheck)
            .with(TrackedEntityTypeCheck)
            .with(GeometryCheck)
            .with(AttributeCheck::new(
                services.existing_values.clone(),
                services.uniqueness.clone(),
                services.text_patterns.clone(),
            ))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Run every check in order against `record`.
    ///
    /// Issues accumulate across checks. A terminal check that added an issue
    /// ends the run and marks the outcome as terminated.
    pub fn run(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
    ) -> Result<ValidationOutcome, ValidateError> {
        let mut outcome = ValidationOutcome::new(record.uid());

        for check in &self.checks {
            let before = outcome.conflict_count();
            check.check(record, ctx, &mut outcome)?;
            let added = outcome.conflict_count() - before;
            debug!(
                check = check.name(),
                uid = record.uid(),
                conflicts = added,
                "check completed"
            );

            if added > 0 && check.is_terminal() {
                debug!(check = check.name(), uid = record.uid(), "terminal check failed");
                outcome.terminate(check.name());
                break;
            }
        }

        debug!(
            uid = record.uid(),
            kind = record.kind(),
            status = %outcome.status(),
            conflicts = outcome.conflict_count(),
            "record validated"
        );
        Ok(outcome)
    }
}

impl fmt::Debug for CheckChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Dispatches records to the chain for their kind.
#[derive(Debug)]
pub struct Validator {
    events: CheckChain,
    tracked_entities: CheckChain,
}

impl Validator {
    pub fn new(events: CheckChain, tracked_entities: CheckChain) -> Self {
        Self {
            events,
            tracked_entities,
        }
    }

    /// The default chains for both record kinds.
    pub fn with_services(services: &Services) -> Self {
        Self::new(
            CheckChain::for_events(services),
            CheckChain::for_tracked_entities(services),
        )
    }

    pub fn validate(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
    ) -> Result<ValidationOutcome, ValidateError> {
        match record {
            ImportRecord::Event(_) => self.events.run(record, ctx),
            ImportRecord::TrackedEntity(_) => self.tracked_entities.run(record, ctx),
        }
    }
}
