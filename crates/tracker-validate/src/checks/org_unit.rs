use tracker_model::{ImportRecord, Issue, ValidationOutcome};

use super::is_blank;
use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;

/// Organisation unit presence.
///
/// A new record must reference a known org unit. An update must target a
/// persisted record that already has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgUnitCheck;

impl Check for OrgUnitCheck {
    fn name(&self) -> &'static str {
        "org_unit"
    }

    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError> {
        if record.strategy().is_create() {
            match record.org_unit() {
                reference if is_blank(reference) => {
                    outcome.add(Issue::OrgUnitMissing);
                }
                Some(reference) if ctx.organisation_unit(reference).is_none() => {
                    outcome.add(Issue::OrgUnitNotFound {
                        org_unit: reference.to_string(),
                    });
                }
                _ => {}
            }
            return Ok(());
        }

        let uid = record.uid();
        let existing_org_unit = match record {
            ImportRecord::TrackedEntity(_) => ctx
                .snapshot
                .existing_tracked_entity(uid)
                .map(|existing| existing.org_unit.as_deref()),
            ImportRecord::Event(_) => ctx
                .snapshot
                .existing_event(uid)
                .map(|existing| existing.org_unit.as_deref()),
        };
        match existing_org_unit {
            None => {
                outcome.add(Issue::RecordNotFound {
                    uid: uid.to_string(),
                });
            }
            Some(org_unit) if is_blank(org_unit) => {
                outcome.add(Issue::ExistingOrgUnitMissing {
                    uid: uid.to_string(),
                });
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        true
    }
}
