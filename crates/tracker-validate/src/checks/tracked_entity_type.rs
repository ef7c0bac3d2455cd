use tracker_model::{ImportRecord, Issue, ValidationOutcome};

use super::is_blank;
use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;

/// A new tracked entity must name a known type; an update may omit it but
/// must not name an unknown one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedEntityTypeCheck;

impl Check for TrackedEntityTypeCheck {
    fn name(&self) -> &'static str {
        "tracked_entity_type"
    }

    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError> {
        let Some(entity) = record.as_tracked_entity() else {
            return Ok(());
        };

        let reference = entity.tracked_entity_type.as_deref();
        if is_blank(reference) {
            if entity.strategy.is_create() {
                outcome.add(Issue::TrackedEntityTypeMissing);
            }
            return Ok(());
        }
        if let Some(reference) = reference
            && ctx.tracked_entity_type(reference).is_none()
        {
            outcome.add(Issue::TrackedEntityTypeNotFound {
                tracked_entity_type: reference.to_string(),
            });
        }
        Ok(())
    }
}
