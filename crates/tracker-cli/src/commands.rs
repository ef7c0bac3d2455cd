use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;
use tracing::{debug, info, info_span};
use tracker_model::{ErrorCode, ImportRecord};
use tracker_validate::{
    CollectingSink, IdSchemes, ImportDriver, ImportOptions, ImportReport, Preheat,
    RegexTextPatternService, Services, Validator,
};

use crate::cli::ValidateArgs;
use crate::summary::apply_table_style;

pub fn run_codes() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Description"]);
    apply_table_style(&mut table);
    for code in ErrorCode::ALL {
        table.add_row(vec![code.as_str(), code.description()]);
    }
    println!("{table}");
    Ok(())
}

/// Validate the batch in `args.records` and write the requested outputs.
pub fn run_validate(args: &ValidateArgs) -> Result<ImportReport> {
    let span = info_span!("validate", records = %args.records.display());
    let _guard = span.enter();

    let options = load_options(args)?;
    let preheat = Arc::new(load_snapshot(&args.snapshot)?);
    let records = load_records(&args.records)?;
    info!(
        records = records.len(),
        tracked_entities = preheat.tracked_entity_count(),
        events = preheat.event_count(),
        "loaded batch"
    );

    let services = Services::from_preheat(
        Arc::clone(&preheat),
        Arc::new(RegexTextPatternService::new()),
    );
    let driver = ImportDriver::new(Validator::with_services(&services), options);
    let mut sink = CollectingSink::default();
    let report = driver
        .import(preheat.as_ref(), &records, &mut sink)
        .context("import batch")?;

    if let Some(path) = &args.report {
        write_json(path, &report).context("write import report")?;
    }
    if let Some(path) = &args.accepted {
        write_json(path, &sink.records).context("write accepted records")?;
    }
    Ok(report)
}

fn load_options(args: &ValidateArgs) -> Result<ImportOptions> {
    let mut options = match &args.config {
        Some(path) => ImportOptions::from_toml_path(path).context("load import options")?,
        None => ImportOptions::default(),
    };
    if let Some(mode) = args.atomic_mode {
        options = options.with_atomic_mode(mode.into());
    }
    if let Some(scheme) = args.id_scheme {
        options = options.with_id_schemes(IdSchemes::uniform(scheme.into()));
    }
    if args.skip_pattern_validation {
        options.skip_pattern_validation = true;
    }
    if let Some(threads) = args.threads {
        options.threads = Some(usize::from(threads));
    }
    debug!(?options, "resolved import options");
    Ok(options)
}

pub fn load_snapshot(path: &Path) -> Result<Preheat> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("read reference snapshot {}", path.display()))?;
    Preheat::from_json_str(&source)
        .with_context(|| format!("parse reference snapshot {}", path.display()))
}

pub fn load_records(path: &Path) -> Result<Vec<ImportRecord>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("read records {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parse records {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
