use tracker_model::{ImportRecord, Issue, ValidationOutcome};

use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;

/// An event's program stage must resolve; every later event check needs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramStageCheck;

impl Check for ProgramStageCheck {
    fn name(&self) -> &'static str {
        "program_stage"
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
        if ctx.program_stage(&event.program_stage).is_none() {
            outcome.add(Issue::ProgramStageNotFound {
                program_stage: event.program_stage.clone(),
            });
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        true
    }
}
