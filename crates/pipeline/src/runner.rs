//! Read -> validate -> flag -> write, with structured logging along the way.

use anyhow::Context;
use chrono::NaiveDate;

use auditflow_core::{Clock, RawRecord, SystemClock};
use auditflow_domains::DomainProfile;
use auditflow_flagging::{FlaggedRecord, flag_all};
use auditflow_validation::{ValidationReport, validate_parallel};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::report::AuditReport;
use crate::{reader, writer};

/// Everything one audit produced.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub validation: ValidationReport,
    pub flagged: Vec<FlaggedRecord>,
}

/// Validate and flag in-memory rows for one dataset.
pub fn audit(
    profile: &DomainProfile,
    rows: Vec<RawRecord>,
    today: NaiveDate,
    workers: usize,
) -> Result<AuditOutcome, PipelineError> {
    let mut validation = validate_parallel(rows, &profile.schema, today, workers)?;
    tracing::info!(
        domain = %profile.domain,
        dataset = profile.dataset,
        accepted = validation.accepted.len(),
        rejected = validation.rejected.len(),
        "validation complete"
    );
    for r in &validation.rejected {
        tracing::warn!(
            row = r.row,
            key = profile.raw_key(&r.raw).as_deref().unwrap_or_default(),
            reasons = %r.summary(),
            "row rejected"
        );
    }

    let masked = profile.mask_keys(&mut validation.accepted);
    if masked > 0 {
        tracing::info!(masked, "pseudonymized identifying keys");
    }

    let flagged = flag_all(&validation.accepted, &profile.rules)?;
    tracing::info!(flagged = flagged.len(), rules = profile.rules.len(), "threshold flagging complete");
    for f in &flagged {
        tracing::debug!(
            row = f.row(),
            key = profile.record_key(&f.record).as_deref().unwrap_or_default(),
            rule_flag = %f.rule_flag(),
            "row flagged"
        );
    }

    let report = AuditReport::new(profile, today, &validation, &flagged);
    Ok(AuditOutcome {
        report,
        validation,
        flagged,
    })
}

/// Run one configured audit against files on disk.
///
/// `config.as_of` takes precedence over `clock`.
pub fn run(config: &PipelineConfig, clock: &dyn Clock) -> Result<AuditOutcome, PipelineError> {
    let profile = config.domain.dataset(config.dataset.as_deref())?;
    let delimiter = config.delimiter_byte()?;
    let today = config.as_of.unwrap_or_else(|| clock.today());

    let rows = reader::read_file(&config.input, delimiter)?;
    tracing::info!(
        input = %config.input.display(),
        rows = rows.len(),
        as_of = %today,
        "loaded input"
    );

    let outcome = audit(&profile, rows, today, config.workers)?;

    if let Some(path) = &config.flagged_output {
        writer::write_flagged(writer::create(path)?, &profile, &outcome.flagged, delimiter)?;
        tracing::info!(path = %path.display(), rows = outcome.flagged.len(), "wrote flagged rows");
    }
    if let Some(path) = &config.rejected_output {
        writer::write_rejected(
            writer::create(path)?,
            &profile,
            &outcome.validation.rejected,
            delimiter,
        )?;
        tracing::info!(
            path = %path.display(),
            rows = outcome.validation.rejected.len(),
            "wrote rejected rows"
        );
    }
    if let Some(path) = &config.report_output {
        let file = writer::create(path)?;
        serde_json::to_writer_pretty(file, &outcome.report)?;
        tracing::info!(path = %path.display(), "wrote audit report");
    }

    Ok(outcome)
}

/// Env-configured run against the system clock, for hosts that embed the
/// pipeline without wiring their own logging.
pub fn run_from_env() -> anyhow::Result<AuditReport> {
    auditflow_observability::init();

    let config = PipelineConfig::from_env().context("failed to read AUDITFLOW_* settings")?;
    let outcome = run(&config, &SystemClock)
        .with_context(|| format!("audit of {} failed", config.input.display()))?;
    tracing::info!(
        run_id = %outcome.report.run_id,
        total = outcome.report.total_rows,
        rejected = outcome.report.rejected,
        flagged = outcome.report.flagged,
        "audit finished"
    );
    Ok(outcome.report)
}
