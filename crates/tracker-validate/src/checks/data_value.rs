use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, trace};
use tracker_model::{
    AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION, Event, EventStatus, ImportRecord, Issue,
    ProgramStage, ValidationOutcome, ValidationStrategy,
};

use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;
use crate::logging::redact_value;
use crate::services::ValueEncoder;
use crate::value_type::validate_data_value;

/// Data value checks for events.
///
/// Every submitted value must reference a known data element, satisfy its
/// value type and be encodable for storage. When all of them pass, the
/// stage's compulsory data elements must carry a value unless the user may
/// skip that rule or the stage's validation strategy does not apply yet.
pub struct DataValueCheck {
    encoder: Arc<dyn ValueEncoder>,
}

impl DataValueCheck {
    pub fn new(encoder: Arc<dyn ValueEncoder>) -> Self {
        Self { encoder }
    }

    fn check_values(&self, event: &Event, ctx: &WorkContext<'_>, outcome: &mut ValidationOutcome) {
        for data_value in &event.data_values {
            let Some(element) = ctx.data_element(&data_value.data_element) else {
                outcome.add(Issue::InvalidDataElement {
                    data_element: data_value.data_element.clone(),
                });
                continue;
            };

            if let Some(value) = data_value.non_empty_value() {
                trace!(
                    data_element = %element.uid,
                    value = redact_value(value),
                    "validating data value"
                );
                if let Err(error) = validate_data_value(element, value) {
                    outcome.add(Issue::InvalidDataValue {
                        data_element: element.uid.clone(),
                        reason: error.to_string(),
                    });
                    continue;
                }
            }

            if let Err(error) = self.encoder.encode(data_value) {
                debug!(data_element = %element.uid, %error, "data value not encodable");
                outcome.add(Issue::DataValueNotEncodable {
                    data_element: element.uid.clone(),
                });
            }
        }
    }

    fn check_mandatory(
        event: &Event,
        stage: &ProgramStage,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) {
        if ctx.is_authorized(AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION) {
            return;
        }
        let applies = match stage.validation_strategy {
            ValidationStrategy::OnUpdateAndInsert => true,
            ValidationStrategy::OnComplete => event.status == EventStatus::Completed,
        };
        if !applies {
            return;
        }

        // Submitted values merge over persisted ones; an empty submitted
        // value clears the element.
        let mut present: BTreeSet<&str> = BTreeSet::new();
        if event.strategy.is_update()
            && let Some(existing) = ctx.snapshot.existing_event(&event.uid)
        {
            present.extend(
                existing
                    .data_values
                    .iter()
                    .filter(|(_, value)| !value.trim().is_empty())
                    .map(|(uid, _)| uid.as_str()),
            );
        }
        for data_value in &event.data_values {
            let Some(element) = ctx.data_element(&data_value.data_element) else {
                continue;
            };
            if data_value.non_empty_value().is_some() {
                present.insert(element.uid.as_str());
            } else {
                present.remove(element.uid.as_str());
            }
        }

        for compulsory in stage.compulsory_data_elements() {
            if !present.contains(compulsory) {
                outcome.add(Issue::MandatoryValueMissing {
                    data_element: compulsory.to_string(),
                });
            }
        }
    }
}

impl Check for DataValueCheck {
    fn name(&self) -> &'static str {
        "data_values"
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
        let Some(stage) = ctx.program_stage(&event.program_stage) else {
            return Ok(());
        };

        let before = outcome.conflict_count();
        self.check_values(event, ctx, outcome);
        if outcome.conflict_count() > before {
            debug!(uid = %event.uid, "invalid data values, skipping mandatory check");
            return Ok(());
        }
        Self::check_mandatory(event, stage, ctx, outcome);
        Ok(())
    }
}
