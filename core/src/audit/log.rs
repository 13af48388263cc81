use crate::audit::event::{compute_event_hash, finalize_event, AuditEvent, ZERO_HASH_64};
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct AuditLog {
    path: PathBuf,
    last_hash: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChainBreak {
    /// 1-based line number in the NDJSON file.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerifyReport {
    pub events_checked: usize,
    pub first_break: Option<ChainBreak>,
}

impl VerifyReport {
    pub fn is_intact(&self) -> bool {
        self.first_break.is_none()
    }
}

impl AuditLog {
    pub fn open_or_create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(&path)?;
            return Ok(Self {
                path,
                last_hash: ZERO_HASH_64.to_string(),
            });
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut last_hash = ZERO_HASH_64.to_string();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(&line)?;
            let eh = v
                .get("event_hash")
                .and_then(|x| x.as_str())
                .ok_or_else(|| {
                    CoreError::InvalidInput("audit_log line missing event_hash".to_string())
                })?;
            last_hash = eh.to_string();
        }
        Ok(Self { path, last_hash })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    pub fn append(&mut self, mut event: AuditEvent) -> CoreResult<AuditEvent> {
        event.prev_event_hash = self.last_hash.clone();
        let event = finalize_event(event)?;
        let line = serde_json::to_string(&event)?;
        let mut f = OpenOptions::new().append(true).open(&self.path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        self.last_hash = event.event_hash.clone();
        Ok(event)
    }

    /// Recomputes every hash and link. I/O errors fail; a broken chain is reported.
    pub fn verify(path: impl AsRef<Path>) -> CoreResult<VerifyReport> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut prev = ZERO_HASH_64.to_string();
        let mut checked = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let broken = |reason: String| VerifyReport {
                events_checked: checked,
                first_break: Some(ChainBreak {
                    line: idx + 1,
                    reason,
                }),
            };
            let event: AuditEvent = match serde_json::from_str(&line) {
                Ok(e) => e,
                Err(e) => return Ok(broken(format!("unparseable event: {}", e))),
            };
            if event.prev_event_hash != prev {
                return Ok(broken(format!(
                    "prev_event_hash {} does not match preceding event {}",
                    event.prev_event_hash, prev
                )));
            }
            let expected = compute_event_hash(&event)?;
            if event.event_hash != expected {
                return Ok(broken(format!(
                    "event_hash {} does not match recomputed {}",
                    event.event_hash, expected
                )));
            }
            prev = event.event_hash;
            checked += 1;
        }
        Ok(VerifyReport {
            events_checked: checked,
            first_break: None,
        })
    }
}
