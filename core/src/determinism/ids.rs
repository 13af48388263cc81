use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use ulid::Ulid;

pub fn run_id_ulid() -> String {
    format!("r_{}", Ulid::new())
}

pub fn new_portfolio_id() -> String {
    format!("p_{}", Ulid::new())
}

pub fn new_call_id() -> String {
    format!("c_{}", Ulid::new())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

pub fn now_rfc3339_utc() -> String {
    // Rfc3339 formatting only fails for years outside 0..=9999.
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Parses an RFC3339 timestamp; `None` for anything else.
pub fn parse_rfc3339(ts: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(ts, &Rfc3339).ok()
}
