use tracker_model::{FeatureType, IdScheme, ImportRecord, Issue, ValidationOutcome};

use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;
use crate::geo::geometry_from_coordinates;

/// Geometry must conform to the feature type configured for the record's
/// tracked-entity type or program stage.
///
/// Records whose feature type cannot be determined are left to the
/// reference checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryCheck;

impl GeometryCheck {
    fn configured_feature_type(record: &ImportRecord, ctx: &WorkContext<'_>) -> Option<FeatureType> {
        match record {
            ImportRecord::Event(event) => ctx
                .program_stage(&event.program_stage)
                .map(|stage| stage.feature_type),
            ImportRecord::TrackedEntity(entity) => {
                let submitted = entity
                    .tracked_entity_type
                    .as_deref()
                    .filter(|reference| !reference.trim().is_empty());
                let tracked_entity_type = match submitted {
                    Some(reference) => ctx.tracked_entity_type(reference),
                    None => ctx
                        .snapshot
                        .existing_tracked_entity(&entity.uid)
                        .and_then(|existing| existing.tracked_entity_type.as_deref())
                        .and_then(|uid| ctx.snapshot.tracked_entity_type(IdScheme::Uid, uid)),
                };
                tracked_entity_type.map(|tracked_entity_type| tracked_entity_type.feature_type)
            }
        }
    }
}

impl Check for GeometryCheck {
    fn name(&self) -> &'static str {
        "geometry"
    }

    fn check(
        &self,
        record: &ImportRecord,
        ctx: &WorkContext<'_>,
        outcome: &mut ValidationOutcome,
    ) -> Result<(), ValidateError> {
        let Some(feature_type) = Self::configured_feature_type(record, ctx) else {
            return Ok(());
        };

        if let Some(geometry) = record.geometry() {
            let submitted = FeatureType::from_geometry_name(&geometry.kind);
            if feature_type == FeatureType::None || submitted != feature_type {
                outcome.add(Issue::GeometryMismatch { feature_type });
            }
        } else if let Some(entity) = record.as_tracked_entity()
            && let Some(coordinates) = entity
                .coordinates
                .as_deref()
                .filter(|coordinates| !coordinates.trim().is_empty())
        {
            // Legacy coordinates use the record's own feature type, falling
            // back to the configured one; without either they are ignored.
            let coordinate_type = match entity.feature_type {
                FeatureType::None => feature_type,
                own => own,
            };
            if coordinate_type == FeatureType::None {
                return Ok(());
            }
            if let Err(error) = geometry_from_coordinates(coordinate_type, coordinates) {
                outcome.add(Issue::InvalidGeometry {
                    coordinates: coordinates.to_string(),
                    error: error.to_string(),
                });
            }
        }
        Ok(())
    }
}
