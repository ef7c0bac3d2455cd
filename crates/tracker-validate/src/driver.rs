//! Batch import: validate every record, then persist the ones that passed.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use tracker_model::{AtomicMode, ImportRecord, ValidationOutcome};

use crate::chain::Validator;
use crate::context::WorkContext;
use crate::error::{ServiceError, ValidateError};
use crate::options::ImportOptions;
use crate::services::RecordSink;
use crate::snapshot::ReferenceSnapshot;

/// Overall result of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    /// Every record was imported.
    Ok,
    /// Some records were imported, others were rejected.
    Warning,
    /// Nothing was imported.
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub status: BatchStatus,
    pub total: usize,
    pub imported: usize,
    pub ignored: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    /// One outcome per record, in input order.
    pub outcomes: Vec<ValidationOutcome>,
}

impl ImportReport {
    /// Records whose validation reported at least one conflict.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .count()
    }

    pub fn conflict_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(ValidationOutcome::conflict_count)
            .sum()
    }
}

/// A sink that keeps persisted records in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub records: Vec<ImportRecord>,
}

impl RecordSink for CollectingSink {
    fn persist(&mut self, record: &ImportRecord) -> Result<(), ServiceError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Validates batches with a [`Validator`] and persists passing records.
#[derive(Debug)]
pub struct ImportDriver {
    validator: Validator,
    options: ImportOptions,
}

impl ImportDriver {
    pub fn new(validator: Validator, options: ImportOptions) -> Self {
        Self { validator, options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Validate `records` against `snapshot` and persist those that passed.
    ///
    /// Records are validated in parallel, each owning its outcome, and
    /// persisted in input order. With [`AtomicMode::All`] a single failed
    /// record rejects the whole batch.
    pub fn import(
        &self,
        snapshot: &dyn ReferenceSnapshot,
        records: &[ImportRecord],
        sink: &mut dyn RecordSink,
    ) -> Result<ImportReport, ValidateError> {
        let span = info_span!("import", records = records.len(), atomic_mode = ?self.options.atomic_mode);
        let _guard = span.enter();
        let started_at = Utc::now();
        let start = Instant::now();

        let outcomes = self.validate_all(snapshot, records)?;

        let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();
        let persist_any = match self.options.atomic_mode {
            AtomicMode::All => failed == 0,
            AtomicMode::Object => true,
        };
        if !persist_any {
            warn!(failed, "batch rejected: atomic mode requires every record to pass");
        }

        let mut imported = 0;
        if persist_any {
            for (record, outcome) in records.iter().zip(&outcomes) {
                if !outcome.is_success() {
                    continue;
                }
                sink.persist(record).map_err(|source| ValidateError::Persist {
                    uid: record.uid().to_string(),
                    source,
                })?;
                imported += 1;
            }
        }

        let total = records.len();
        let status = if imported == total {
            BatchStatus::Ok
        } else if imported > 0 {
            BatchStatus::Warning
        } else {
            BatchStatus::Error
        };
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(total, imported, failed, %elapsed_ms, "import finished");

        Ok(ImportReport {
            status,
            total,
            imported,
            ignored: total - imported,
            started_at,
            elapsed_ms,
            outcomes,
        })
    }

    fn validate_all(
        &self,
        snapshot: &dyn ReferenceSnapshot,
        records: &[ImportRecord],
    ) -> Result<Vec<ValidationOutcome>, ValidateError> {
        let ctx = WorkContext::new(snapshot, &self.options);
        let validate = || {
            records
                .par_iter()
                .map(|record| {
                    let _record = tracing::debug_span!("record", uid = record.uid()).entered();
                    self.validator.validate(record, &ctx)
                })
                .collect::<Result<Vec<_>, _>>()
        };

        match self.options.threads {
            Some(threads) => {
                debug!(threads, "validating on dedicated thread pool");
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|error| ValidateError::ThreadPool(error.to_string()))?;
                pool.install(validate)
            }
            None => validate(),
        }
    }
}
