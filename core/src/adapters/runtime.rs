use crate::adapters::interface::{
    classify_oracle_error, CallStatus, OracleCallMeta, OracleClient, OracleMode, OracleRequest,
};
use crate::determinism::ids::{new_call_id, sha256_hex};
use crate::oracle::response::{parse_json_object, OracleFailure};
use serde_json::{Map, Value};
use std::time::Instant;

/// Result of one oracle round-trip: the parsed object or the reason it is unusable.
#[derive(Debug, Clone)]
pub struct OracleExchange {
    pub parsed: Result<Map<String, Value>, OracleFailure>,
    pub call: OracleCallMeta,
}

/// Sends `request` once and parses the answer. Never retries and never fails: transport
/// errors and malformed output both come back as `parsed: Err(..)`.
pub fn exchange(
    client: &dyn OracleClient,
    mode: OracleMode,
    request: &OracleRequest,
    preview_chars: usize,
) -> OracleExchange {
    let call_id = new_call_id();
    let request_hash = sha256_hex(
        format!("{}\n{}\n{}", request.model, request.system, request.prompt).as_bytes(),
    );
    tracing::debug!(
        call_id = %call_id,
        mode = mode.as_str(),
        prompt_chars = request.prompt.chars().count(),
        "sending prompt to oracle"
    );

    let started = Instant::now();
    let answer = client.complete(request);
    let duration_ms = started.elapsed().as_millis() as u64;

    let mut call = OracleCallMeta {
        call_id,
        mode,
        model_id: request.model.clone(),
        request_hash,
        response_hash: None,
        duration_ms,
        status: CallStatus::Failed,
        error: None,
    };

    let parsed = match answer {
        Err(err) => {
            let envelope = classify_oracle_error(&err);
            tracing::warn!(
                call_id = %call.call_id,
                mode = mode.as_str(),
                category = %envelope.category,
                "oracle call failed: {}",
                envelope.message
            );
            let failure = OracleFailure::unavailable(envelope.message.clone(), &envelope.code);
            call.error = Some(envelope);
            Err(failure)
        }
        Ok(text) => {
            call.response_hash = Some(sha256_hex(text.as_bytes()));
            tracing::debug!(
                call_id = %call.call_id,
                response_chars = text.chars().count(),
                "oracle responded"
            );
            match parse_json_object(&text, preview_chars) {
                Ok(map) => {
                    call.status = CallStatus::Completed;
                    Ok(map)
                }
                Err(failure) => {
                    call.status = CallStatus::Rejected;
                    tracing::error!(
                        call_id = %call.call_id,
                        mode = mode.as_str(),
                        reason = %failure.reason,
                        raw_preview = %failure.raw_preview,
                        "oracle output rejected"
                    );
                    Err(failure)
                }
            }
        }
    };

    OracleExchange { parsed, call }
}
