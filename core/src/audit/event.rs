use crate::determinism::ids::now_rfc3339_utc;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts_utc: String, // RFC3339 UTC string
    pub event_type: String,
    pub run_id: String,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub prev_event_hash: String, // hex 64
    pub event_hash: String,      // hex 64
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

impl AuditEvent {
    /// Unchained system event; `AuditLog::append` fills both hashes.
    pub fn system(run_id: &str, event_type: &str, details: serde_json::Value) -> Self {
        Self {
            ts_utc: now_rfc3339_utc(),
            event_type: event_type.to_string(),
            run_id: run_id.to_string(),
            actor: Actor::System,
            details,
            prev_event_hash: ZERO_HASH_64.to_string(),
            event_hash: ZERO_HASH_64.to_string(),
        }
    }
}

/// Bytes an event is hashed over: compact JSON, keys sorted at every depth.
///
/// `serde_json::Map` is key-ordered while `preserve_order` stays off, so sorting comes from
/// the value model itself. Floats are refused because their text form is not stable across
/// writers; durations and counts in details are integers.
pub fn canonical_event_bytes(event: &AuditEvent) -> CoreResult<Vec<u8>> {
    let value = serde_json::to_value(event)?;
    if let Some(at) = first_float(&value, "event") {
        return Err(CoreError::InvalidInput(format!(
            "{} carries a non-integer number at {}",
            event.event_type, at
        )));
    }
    Ok(serde_json::to_vec(&value)?)
}

fn first_float(v: &Value, at: &str) -> Option<String> {
    match v {
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => Some(at.to_string()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| first_float(item, &format!("{}[{}]", at, i))),
        Value::Object(map) => map
            .iter()
            .find_map(|(k, item)| first_float(item, &format!("{}.{}", at, k))),
        _ => None,
    }
}

// event_hash = SHA-256 of the canonical envelope with event_hash itself zeroed.
pub fn compute_event_hash(event: &AuditEvent) -> CoreResult<String> {
    let mut e = event.clone();
    e.event_hash = ZERO_HASH_64.to_string();
    let bytes = canonical_event_bytes(&e)?;
    let mut h = Sha256::new();
    h.update(bytes);
    Ok(hex::encode(h.finalize()))
}

pub fn finalize_event(mut event: AuditEvent) -> CoreResult<AuditEvent> {
    if !is_hex_64(&event.prev_event_hash) {
        return Err(CoreError::InvalidInput(
            "prev_event_hash must be 64 hex chars".to_string(),
        ));
    }
    validate_event_taxonomy(&event)?;
    let eh = compute_event_hash(&event)?;
    event.event_hash = eh;
    Ok(event)
}

pub(crate) fn is_hex_64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub const EVENT_TYPES: &[&str] = &[
    "MODEL_CALL_COMPLETED",
    "MODEL_CALL_FAILED",
    "ORACLE_OUTPUT_REJECTED",
    "HARDWARE_OVERRIDE_APPLIED",
    "CLASSIFICATION_COMPLETED",
    "EVIDENCE_EXTRACTED",
    "PORTFOLIO_BUILD_COMPLETED",
    "PORTFOLIO_PERSIST_FAILED",
    "APPRAISAL_REPORT_GENERATED",
];

pub fn validate_event_taxonomy(event: &AuditEvent) -> CoreResult<()> {
    if !EVENT_TYPES.contains(&event.event_type.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "unknown event_type {}",
            event.event_type
        )));
    }
    let required = required_detail_keys(&event.event_type);
    for k in required {
        if event.details.get(k).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "event {} missing details.{}",
                event.event_type, k
            )));
        }
    }
    Ok(())
}

fn required_detail_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "MODEL_CALL_COMPLETED" => &[
            "call_id",
            "mode",
            "model_id",
            "request_hash_sha256",
            "response_hash_sha256",
            "duration_ms",
        ],
        "MODEL_CALL_FAILED" => &[
            "call_id",
            "mode",
            "error_category",
            "error_code",
            "error_message",
        ],
        "ORACLE_OUTPUT_REJECTED" => &["call_id", "mode", "reason", "raw_preview"],
        "HARDWARE_OVERRIDE_APPLIED" => &[
            "suggested_category",
            "cleared_categories",
            "injected_category",
        ],
        "CLASSIFICATION_COMPLETED" => &["is_hardware", "populated_categories", "parse_failed"],
        "EVIDENCE_EXTRACTED" => &["source", "evidence_count", "extraction_failed"],
        "PORTFOLIO_BUILD_COMPLETED" => &[
            "portfolio_id",
            "status",
            "source_counts",
            "evidence_counts",
        ],
        "PORTFOLIO_PERSIST_FAILED" => &["portfolio_id", "error_message"],
        "APPRAISAL_REPORT_GENERATED" => &["band", "scores", "report_failed"],
        _ => &[],
    }
}
