mod common;

use appraisal_core::audit::event::{
    canonical_event_bytes, finalize_event, AuditEvent, ZERO_HASH_64,
};
use appraisal_core::audit::log::AuditLog;
use appraisal_core::classify::engine::Classifier;
use appraisal_core::error::OracleError;
use appraisal_core::portfolio::builder::PortfolioBuilder;
use appraisal_core::portfolio::sources::EvidenceSources;
use appraisal_core::run::recorder::{record_classification, record_portfolio_build};
use appraisal_core::storage::portfolio_store::MemoryPortfolioStore;
use common::{config, ScriptedOracle};
use serde_json::json;
use std::io::Write;

fn event_types(log_path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(log_path)
        .unwrap()
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["event_type"].as_str().unwrap().to_string()
        })
        .collect()
}

fn persist_failed(details: serde_json::Value) -> AuditEvent {
    let mut ev = AuditEvent::system("r_1", "PORTFOLIO_PERSIST_FAILED", details);
    ev.ts_utc = "2026-02-10T00:00:00Z".to_string();
    ev
}

#[test]
fn canonical_bytes_ignore_detail_key_order() {
    let a = persist_failed(json!({"portfolio_id": "p_1", "error_message": "x", "extra": {"y": 2, "x": 3}}));
    let b = persist_failed(json!({"extra": {"x": 3, "y": 2}, "error_message": "x", "portfolio_id": "p_1"}));
    let bytes = canonical_event_bytes(&a).unwrap();
    assert_eq!(bytes, canonical_event_bytes(&b).unwrap());
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with(r#"{"actor":"system","details":{"error_message":"x","extra":{"x":3,"y":2}"#));
}

#[test]
fn float_details_cannot_be_hashed() {
    let ev = persist_failed(json!({"portfolio_id": "p_1", "error_message": "x", "ratio": [1, 0.5]}));
    let err = canonical_event_bytes(&ev).unwrap_err();
    assert!(err.to_string().contains("event.details.ratio[1]"));
    assert!(finalize_event(ev).is_err());
}

#[test]
fn event_hash_is_stable() {
    let mut ev = AuditEvent::system(
        "r_1",
        "PORTFOLIO_PERSIST_FAILED",
        json!({"portfolio_id": "p_1", "error_message": "disk full"}),
    );
    ev.ts_utc = "2026-02-10T00:00:00Z".to_string();
    let a = finalize_event(ev.clone()).unwrap().event_hash;
    let b = finalize_event(ev).unwrap().event_hash;
    assert_eq!(a, b);
    assert_ne!(a, ZERO_HASH_64);
}

#[test]
fn unknown_events_and_missing_details_are_rejected() {
    let unknown = AuditEvent::system("r_1", "RUN_CREATED", json!({}));
    assert!(finalize_event(unknown).is_err());
    let missing = AuditEvent::system("r_1", "PORTFOLIO_PERSIST_FAILED", json!({"portfolio_id": "p"}));
    assert!(finalize_event(missing).is_err());
}

#[test]
fn classification_and_build_are_recorded_and_chain_verifies() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("audit").join("audit_log.ndjson");
    let mut log = AuditLog::open_or_create(&path).unwrap();
    let cfg = config();

    let oracle = ScriptedOracle::new(vec![
        Ok(r#"{"GP6": {"subsections": ["GP6.1"], "justifications": {"GP6.1": "ICT"}}}"#.to_string()),
        Err(OracleError::Timeout(30)),
    ]);
    let outcome = Classifier::new(&oracle, &cfg).classify_detailed("Label the HDMI port.");
    let events = record_classification(&mut log, "r_1", &outcome).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].details["cleared_categories"], json!(["GP6"]));
    assert_eq!(events[1].details["injected_category"], json!("GP1"));

    let build = PortfolioBuilder::new(&oracle, &cfg).build_portfolio_with_store(
        &EvidenceSources::default(),
        None,
        &MemoryPortfolioStore::new(),
    );
    record_portfolio_build(&mut log, "r_2", &build).unwrap();

    assert_eq!(
        event_types(&path),
        vec![
            "MODEL_CALL_COMPLETED",
            "HARDWARE_OVERRIDE_APPLIED",
            "CLASSIFICATION_COMPLETED",
            "MODEL_CALL_FAILED",
            "PORTFOLIO_BUILD_COMPLETED",
        ]
    );
    let report = AuditLog::verify(&path).unwrap();
    assert!(report.is_intact());
    assert_eq!(report.events_checked, 5);

    // Reopening continues the chain from the last hash.
    let reopened = AuditLog::open_or_create(&path).unwrap();
    assert_eq!(reopened.last_hash(), log.last_hash());
}

#[test]
fn tampering_is_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("audit_log.ndjson");
    let mut log = AuditLog::open_or_create(&path).unwrap();
    for id in ["p_1", "p_2"] {
        log.append(AuditEvent::system(
            "r_1",
            "PORTFOLIO_PERSIST_FAILED",
            json!({"portfolio_id": id, "error_message": "disk full"}),
        ))
        .unwrap();
    }
    let text = std::fs::read_to_string(&path).unwrap().replace("p_2", "p_3");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(text.as_bytes()).unwrap();

    let report = AuditLog::verify(&path).unwrap();
    assert_eq!(report.events_checked, 1);
    assert_eq!(report.first_break.unwrap().line, 2);
}
