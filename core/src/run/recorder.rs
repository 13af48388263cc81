//! Appends engine outcomes to the audit log. The engine returns outcome records; the
//! caller owns the log and decides when to record them.

use crate::adapters::interface::{CallStatus, OracleCallMeta};
use crate::audit::event::AuditEvent;
use crate::audit::log::AuditLog;
use crate::classify::engine::ClassificationOutcome;
use crate::error::CoreResult;
use crate::extract::{Extraction, SourceEvidence};
use crate::oracle::response::OracleFailure;
use crate::portfolio::builder::BuildOutcome;
use crate::report::generator::ReportOutcome;
use crate::taxonomy::category::Category;
use serde_json::json;
use std::collections::BTreeMap;

fn codes(categories: &[Category]) -> Vec<&'static str> {
    categories.iter().map(|c| c.code()).collect()
}

fn counts_by_code(counts: &BTreeMap<Category, usize>) -> BTreeMap<&'static str, usize> {
    counts.iter().map(|(c, n)| (c.code(), *n)).collect()
}

/// One event per oracle call: completed, rejected output, or failed transport.
pub fn record_call(
    log: &mut AuditLog,
    run_id: &str,
    call: &OracleCallMeta,
    failure: Option<&OracleFailure>,
) -> CoreResult<AuditEvent> {
    let event = match call.status {
        CallStatus::Completed => AuditEvent::system(
            run_id,
            "MODEL_CALL_COMPLETED",
            json!({
                "call_id": call.call_id,
                "mode": call.mode.as_str(),
                "model_id": call.model_id,
                "request_hash_sha256": call.request_hash,
                "response_hash_sha256": call.response_hash,
                "duration_ms": call.duration_ms,
            }),
        ),
        CallStatus::Rejected => AuditEvent::system(
            run_id,
            "ORACLE_OUTPUT_REJECTED",
            json!({
                "call_id": call.call_id,
                "mode": call.mode.as_str(),
                "reason": failure.map(|f| f.reason.as_str()).unwrap_or(""),
                "raw_preview": failure.map(|f| f.raw_preview.as_str()).unwrap_or(""),
            }),
        ),
        CallStatus::Failed => {
            let (category, code, message) = match &call.error {
                Some(env) => (env.category.as_str(), env.code.as_str(), env.message.as_str()),
                None => (
                    "RUNTIME_ERROR",
                    "ORACLE_ERROR",
                    failure.map(|f| f.reason.as_str()).unwrap_or(""),
                ),
            };
            AuditEvent::system(
                run_id,
                "MODEL_CALL_FAILED",
                json!({
                    "call_id": call.call_id,
                    "mode": call.mode.as_str(),
                    "error_category": category,
                    "error_code": code,
                    "error_message": message,
                }),
            )
        }
    };
    log.append(event)
}

pub fn record_classification(
    log: &mut AuditLog,
    run_id: &str,
    outcome: &ClassificationOutcome,
) -> CoreResult<Vec<AuditEvent>> {
    let mut events = vec![record_call(
        log,
        run_id,
        &outcome.call,
        outcome.result.failure.as_ref(),
    )?];
    if !outcome.overrides.is_noop() {
        events.push(log.append(AuditEvent::system(
            run_id,
            "HARDWARE_OVERRIDE_APPLIED",
            json!({
                "suggested_category": outcome.verdict.suggested_category.map(|c| c.code()),
                "cleared_categories": codes(&outcome.overrides.cleared),
                "injected_category": outcome.overrides.injected.map(|c| c.code()),
            }),
        ))?);
    }
    events.push(log.append(AuditEvent::system(
        run_id,
        "CLASSIFICATION_COMPLETED",
        json!({
            "is_hardware": outcome.verdict.is_hardware,
            "populated_categories": codes(&outcome.result.populated_categories()),
            "parse_failed": outcome.result.is_failed(),
        }),
    ))?);
    Ok(events)
}

pub fn record_extraction<T: SourceEvidence>(
    log: &mut AuditLog,
    run_id: &str,
    extraction: &Extraction<T>,
) -> CoreResult<Vec<AuditEvent>> {
    let call = record_call(log, run_id, &extraction.call, extraction.failure.as_ref())?;
    let done = log.append(AuditEvent::system(
        run_id,
        "EVIDENCE_EXTRACTED",
        json!({
            "source": T::SOURCE,
            "evidence_count": extraction.evidence.evidence_count(),
            "extraction_failed": extraction.is_failed(),
        }),
    ))?;
    Ok(vec![call, done])
}

pub fn record_portfolio_build(
    log: &mut AuditLog,
    run_id: &str,
    outcome: &BuildOutcome,
) -> CoreResult<Vec<AuditEvent>> {
    let doc = &outcome.document;
    let mut events = vec![record_call(log, run_id, &outcome.call, doc.failure.as_ref())?];
    events.push(log.append(AuditEvent::system(
        run_id,
        "PORTFOLIO_BUILD_COMPLETED",
        json!({
            "portfolio_id": doc.id,
            "status": doc.status,
            "source_counts": doc.source_counts,
            "evidence_counts": counts_by_code(&doc.evidence_counts()),
        }),
    ))?);
    if let Some(err) = &outcome.persist_error {
        events.push(log.append(AuditEvent::system(
            run_id,
            "PORTFOLIO_PERSIST_FAILED",
            json!({
                "portfolio_id": doc.id,
                "error_message": err,
            }),
        ))?);
    }
    Ok(events)
}

pub fn record_report(
    log: &mut AuditLog,
    run_id: &str,
    outcome: &ReportOutcome,
) -> CoreResult<Vec<AuditEvent>> {
    let report = &outcome.report;
    let call = record_call(log, run_id, &outcome.call, report.failure.as_ref())?;
    let scores: BTreeMap<&'static str, u8> =
        report.scores.iter().map(|(c, s)| (c.code(), *s)).collect();
    let done = log.append(AuditEvent::system(
        run_id,
        "APPRAISAL_REPORT_GENERATED",
        json!({
            "band": report.band.map(|b| b.label()),
            "scores": scores,
            "report_failed": report.is_failed(),
        }),
    ))?;
    Ok(vec![call, done])
}
