//! Built-in checks.

mod attributes;
mod data_value;
mod geometry;
mod org_unit;
mod program_stage;
mod repeatable_stage;
mod tracked_entity_type;

pub use attributes::{AttributeCheck, AttributeInput, AttributeRule, AttributeValidator};
pub use data_value::DataValueCheck;
pub use geometry::GeometryCheck;
pub use org_unit::OrgUnitCheck;
pub use program_stage::ProgramStageCheck;
pub use repeatable_stage::RepeatableStageCheck;
pub use tracked_entity_type::TrackedEntityTypeCheck;

/// A reference that is absent or blank.
fn is_blank(reference: Option<&str>) -> bool {
    reference.is_none_or(|value| value.trim().is_empty())
}
