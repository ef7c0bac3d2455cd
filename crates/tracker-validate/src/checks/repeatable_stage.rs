use std::sync::Arc;

use tracing::{debug, warn};
use tracker_model::{ImportRecord, Issue, ValidationOutcome};

use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;
use crate::services::OccurrenceStore;

/// Rejects a new event in a non-repeatable program stage that already has a
/// live occurrence.
///
/// Only new events are checked, and only when their enrollment resolves.
pub struct RepeatableStageCheck {
    occurrences: Arc<dyn OccurrenceStore>,
}

impl RepeatableStageCheck {
    pub fn new(occurrences: Arc<dyn OccurrenceStore>) -> Self {
        Self { occurrences }
    }
}

impl Check for RepeatableStageCheck {
    fn name(&self) -> &'static str {
        "repeatable_stage"
    }

    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError> {
        let Some(event) = record.as_event() else {
            return Ok(());
        };
        if !event.strategy.is_create() {
            return Ok(());
        }
        let Some(stage) = ctx.program_stage(&event.program_stage) else {
            return Ok(());
        };
        if stage.repeatable {
            return Ok(());
        }
        if event
            .enrollment
            .as_deref()
            .and_then(|uid| ctx.snapshot.enrollment(uid))
            .is_none()
        {
            debug!(uid = %event.uid, "no enrollment, skipping repeatable stage check");
            return Ok(());
        }

        let exists = self
            .occurrences
            .exists(&stage.uid)
            .map_err(|error| {
                warn!(uid = %event.uid, %error, "occurrence lookup failed");
                ValidateError::service(self.name(), error)
            })?;
        if exists {
            outcome.add(Issue::NonRepeatableStage {
                program_stage: stage.uid.clone(),
            });
            outcome.increment_ignored();
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        true
    }
}
