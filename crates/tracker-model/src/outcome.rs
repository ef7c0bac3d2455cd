//! Per-record validation outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::issue::{Issue, ValidationConflict};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    #[default]
    Success,
    Error,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// Accumulated result of validating one record.
///
/// Created fresh for every record and owned by that record's validation; the
/// checks of a chain mutate it in order and the driver consumes it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "OutcomeReport")]
pub struct ValidationOutcome {
    reference: String,
    status: OutcomeStatus,
    issues: Vec<Issue>,
    ignored: u32,
    terminated_by: Option<String>,
}

impl ValidationOutcome {
    /// Start an empty, successful outcome for the record identified by `reference`.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }

    /// Record a conflict.
    ///
    /// Returns `false` when the identical issue was already reported for this
    /// record, in which case nothing changes.
    pub fn add(&mut self, issue: Issue) -> bool {
        if self.issues.contains(&issue) {
            return false;
        }
        self.issues.push(issue);
        self.status = OutcomeStatus::Error;
        true
    }

    /// Count the record as ignored by the import.
    pub fn increment_ignored(&mut self) {
        self.ignored += 1;
    }

    /// Mark that `check` failed terminally and later checks were skipped.
    pub fn terminate(&mut self, check: impl Into<String>) {
        self.status = OutcomeStatus::Error;
        self.terminated_by = Some(check.into());
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn conflict_count(&self) -> usize {
        self.issues.len()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn ignored(&self) -> u32 {
        self.ignored
    }

    /// Whether a terminal check cut validation short.
    pub fn is_terminated(&self) -> bool {
        self.terminated_by.is_some()
    }

    pub fn terminated_by(&self) -> Option<&str> {
        self.terminated_by.as_deref()
    }

    /// Ordered (subject, message) view of the reported issues.
    pub fn conflicts(&self) -> Vec<ValidationConflict> {
        self.issues.iter().map(ValidationConflict::from).collect()
    }
}

/// Serialized shape of a [`ValidationOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    pub reference: String,
    pub status: OutcomeStatus,
    pub conflicts: Vec<ValidationConflict>,
    pub ignored: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminated_by: Option<String>,
}

impl From<ValidationOutcome> for OutcomeReport {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            conflicts: outcome.conflicts(),
            reference: outcome.reference,
            status: outcome.status,
            ignored: outcome.ignored,
            terminated_by: outcome.terminated_by,
        }
    }
}
