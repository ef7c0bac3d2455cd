//! Tracked-entity attribute validation.
//!
//! Each attribute value passes through four sub-checks in a fixed order:
//! text pattern, value type, uniqueness and file assignment. The first
//! failure is reported and ends validation of that attribute; the remaining
//! attributes of the record are still validated. Uniqueness is the only
//! sub-check that queries persisted state, so it runs after the cheap ones.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};
use tracker_model::{
    AttributeDefinition, IdScheme, ImportRecord, Issue, OrganisationUnit, TrackedEntity,
    ValidationOutcome,
};

use crate::chain::Check;
use crate::context::WorkContext;
use crate::error::ValidateError;
use crate::logging::redact_value;
use crate::services::{ExistingValueLookup, TextPatternService, UniqueValueQuery, UniquenessQuery};
use crate::value_type::validate_attribute_value;

/// Attribute sub-checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeRule {
    Pattern,
    ValueType,
    Uniqueness,
    FileAssignment,
}

impl AttributeRule {
    pub const ORDER: [AttributeRule; 4] = [
        AttributeRule::Pattern,
        AttributeRule::ValueType,
        AttributeRule::Uniqueness,
        AttributeRule::FileAssignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeRule::Pattern => "pattern",
            AttributeRule::ValueType => "value_type",
            AttributeRule::Uniqueness => "uniqueness",
            AttributeRule::FileAssignment => "file_assignment",
        }
    }
}

impl fmt::Display for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute value together with what is known about its owner.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInput<'a> {
    pub definition: &'a AttributeDefinition,
    pub value: &'a str,
    /// Uid of the tracked entity the value belongs to.
    pub owner: &'a str,
    /// Persisted values of the owner keyed by attribute uid.
    pub existing: &'a HashMap<String, String>,
    /// File resource uids already attached to the owner.
    pub existing_files: &'a HashSet<String>,
    /// Organisation unit used to scope uniqueness.
    pub org_unit: Option<&'a OrganisationUnit>,
}

impl AttributeInput<'_> {
    fn stored_value(&self) -> Option<&str> {
        self.existing
            .get(&self.definition.uid)
            .map(String::as_str)
    }
}

/// Runs the ordered sub-checks for a single attribute value.
pub struct AttributeValidator {
    uniqueness: Arc<dyn UniquenessQuery>,
    text_patterns: Arc<dyn TextPatternService>,
}

impl AttributeValidator {
    pub fn new(
        uniqueness: Arc<dyn UniquenessQuery>,
        text_patterns: Arc<dyn TextPatternService>,
    ) -> Self {
        Self {
            uniqueness,
            text_patterns,
        }
    }

    /// The first failing sub-check's issue, if any.
    pub fn validate(
        &self,
        input: &AttributeInput<'_>,
        ctx: &WorkContext<'_>,
    ) -> Result<Option<Issue>, ValidateError> {
        for rule in AttributeRule::ORDER {
            let issue = match rule {
                AttributeRule::Pattern => self.check_pattern(input, ctx)?,
                AttributeRule::ValueType => Self::check_value_type(input),
                AttributeRule::Uniqueness => self.check_uniqueness(input)?,
                AttributeRule::FileAssignment => Self::check_file(input, ctx),
            };
            trace!(
                attribute = %input.definition.uid,
                rule = %rule,
                passed = issue.is_none(),
                "attribute sub-check"
            );
            if issue.is_some() {
                return Ok(issue);
            }
        }
        Ok(None)
    }

    fn check_pattern(
        &self,
        input: &AttributeInput<'_>,
        ctx: &WorkContext<'_>,
    ) -> Result<Option<Issue>, ValidateError> {
        let definition = input.definition;
        if ctx.options.skip_pattern_validation || !definition.generated {
            return Ok(None);
        }
        let Some(pattern) = definition.text_pattern.as_deref() else {
            return Ok(None);
        };

        // Resubmitting the stored value is a no-op even if the pattern changed.
        if input.stored_value() == Some(input.value)
            || self.text_patterns.validate_pattern(pattern, input.value)
        {
            return Ok(None);
        }
        let reserved = self
            .text_patterns
            .is_reserved(pattern, input.value)
            .map_err(|error| {
                warn!(attribute = %definition.uid, %error, "reservation lookup failed");
                ValidateError::service(AttributeRule::Pattern.as_str(), error)
            })?;
        if reserved {
            return Ok(None);
        }
        Ok(Some(Issue::PatternMismatch {
            attribute: definition.uid.clone(),
            value: input.value.to_string(),
        }))
    }

    fn check_value_type(input: &AttributeInput<'_>) -> Option<Issue> {
        validate_attribute_value(input.definition, input.value)
            .err()
            .map(|error| Issue::InvalidAttributeValue {
                attribute: input.definition.uid.clone(),
                error: error.to_string(),
            })
    }

    fn check_uniqueness(&self, input: &AttributeInput<'_>) -> Result<Option<Issue>, ValidateError> {
        let definition = input.definition;
        if !definition.unique {
            return Ok(None);
        }
        let query = UniqueValueQuery {
            attribute: definition,
            value: input.value,
            exclude: input.owner,
            scope: input.org_unit.filter(|_| definition.org_unit_scope),
        };
        let owner = self.uniqueness.find_owner(&query).map_err(|error| {
            warn!(attribute = %definition.uid, %error, "uniqueness query failed");
            ValidateError::service(AttributeRule::Uniqueness.as_str(), error)
        })?;
        Ok(owner.map(|owner| Issue::NonUniqueAttributeValue {
            attribute: definition.uid.clone(),
            value: input.value.to_string(),
            owner,
        }))
    }

    fn check_file(input: &AttributeInput<'_>, ctx: &WorkContext<'_>) -> Option<Issue> {
        if !input.definition.is_file() || input.existing_files.contains(input.value) {
            return None;
        }
        ctx.snapshot
            .file_resource(input.value)
            .filter(|file| file.assigned)
            .map(|file| Issue::FileAlreadyAssigned {
                attribute: input.definition.uid.clone(),
                file_resource: file.uid.clone(),
            })
    }
}

/// Validates every attribute of a tracked entity.
pub struct AttributeCheck {
    existing_values: Arc<dyn ExistingValueLookup>,
    validator: AttributeValidator,
}

impl AttributeCheck {
    pub fn new(
        existing_values: Arc<dyn ExistingValueLookup>,
        uniqueness: Arc<dyn UniquenessQuery>,
        text_patterns: Arc<dyn TextPatternService>,
    ) -> Self {
        Self {
            existing_values,
            validator: AttributeValidator::new(uniqueness, text_patterns),
        }
    }

    fn owner_org_unit<'a>(
        entity: &TrackedEntity,
        ctx: &WorkContext<'a>,
    ) -> Option<&'a OrganisationUnit> {
        if entity.strategy.is_create() {
            entity
                .org_unit
                .as_deref()
                .and_then(|reference| ctx.organisation_unit(reference))
        } else {
            ctx.snapshot
                .existing_tracked_entity(&entity.uid)
                .and_then(|existing| existing.org_unit.as_deref())
                .and_then(|uid| ctx.organisation_unit_by_uid(uid))
        }
    }
}

impl Check for AttributeCheck {
    fn name(&self) -> &'static str {
        "attributes"
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

        let existing = if entity.strategy.is_update() {
            self.existing_values
                .values_for(&entity.uid)
                .map_err(|error| {
                    warn!(uid = %entity.uid, %error, "existing value lookup failed");
                    ValidateError::service(self.name(), error)
                })?
        } else {
            HashMap::new()
        };
        let existing_files: HashSet<String> = existing
            .iter()
            .filter(|(attribute, _)| {
                ctx.snapshot
                    .attribute(IdScheme::Uid, attribute)
                    .is_some_and(AttributeDefinition::is_file)
            })
            .map(|(_, value)| value.clone())
            .collect();
        let org_unit = Self::owner_org_unit(entity, ctx);

        for attribute in &entity.attributes {
            let Some(value) = attribute.non_empty_value() else {
                continue;
            };
            let Some(definition) = ctx.attribute(&attribute.attribute) else {
                outcome.add(Issue::AttributeNotFound {
                    attribute: attribute.attribute.clone(),
                });
                continue;
            };
            trace!(
                attribute = %definition.uid,
                value = redact_value(value),
                "validating attribute"
            );

            let input = AttributeInput {
                definition,
                value,
                owner: &entity.uid,
                existing: &existing,
                existing_files: &existing_files,
                org_unit,
            };
            if let Some(issue) = self.validator.validate(&input, ctx)? {
                outcome.add(issue);
            }
        }
        Ok(())
    }
}
