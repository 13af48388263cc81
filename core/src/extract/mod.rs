//! Per-source evidence extraction: one oracle call turns a source document into the
//! evidence shape the portfolio builder consumes.

pub mod assessment;
pub mod attendance;
pub mod journal;
pub mod lesson;
pub mod prompts;

use crate::adapters::interface::{OracleCallMeta, OracleClient, OracleMode};
use crate::adapters::runtime::exchange;
use crate::config::{EngineConfig, GenerationParams};
use crate::oracle::response::OracleFailure;
use crate::portfolio::sources::{
    AssessmentEvidence, AttendanceEvidence, JournalEvidence, LessonEvidence, RawEvidenceItem,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extracted evidence plus the call that produced it. On failure `evidence` is empty.
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub evidence: T,
    pub call: OracleCallMeta,
    pub failure: Option<OracleFailure>,
}

impl<T> Extraction<T> {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// An evidence shape that can be produced by extraction.
pub trait SourceEvidence {
    const SOURCE: &'static str;

    fn as_item(&self) -> RawEvidenceItem<'_>;

    fn evidence_count(&self) -> usize {
        self.as_item().normalize().values().map(Vec::len).sum()
    }
}

impl SourceEvidence for LessonEvidence {
    const SOURCE: &'static str = "lesson";
    fn as_item(&self) -> RawEvidenceItem<'_> {
        RawEvidenceItem::Lesson(self)
    }
}

impl SourceEvidence for JournalEvidence {
    const SOURCE: &'static str = "journal";
    fn as_item(&self) -> RawEvidenceItem<'_> {
        RawEvidenceItem::Journal(self)
    }
}

impl SourceEvidence for AttendanceEvidence {
    const SOURCE: &'static str = "attendance";
    fn as_item(&self) -> RawEvidenceItem<'_> {
        RawEvidenceItem::Attendance(self)
    }
}

impl SourceEvidence for AssessmentEvidence {
    const SOURCE: &'static str = "assessment";
    fn as_item(&self) -> RawEvidenceItem<'_> {
        RawEvidenceItem::Assessment(self)
    }
}

pub struct Extractor<'a> {
    client: &'a dyn OracleClient,
    config: &'a EngineConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(client: &'a dyn OracleClient, config: &'a EngineConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Sends `prompt` and deserializes the answer leniently into `T`.
    fn run<T>(&self, mode: OracleMode, params: GenerationParams, prompt: String) -> Extraction<T>
    where
        T: DeserializeOwned + Default + SourceEvidence,
    {
        let request = self.config.request(params, prompt);
        let exchange = exchange(self.client, mode, &request, self.config.raw_preview_chars);
        let (evidence, failure) = match exchange.parsed {
            Ok(obj) => (
                serde_json::from_value(Value::Object(obj)).unwrap_or_default(),
                None,
            ),
            Err(failure) => (T::default(), Some(failure)),
        };
        let extraction = Extraction {
            evidence,
            call: exchange.call,
            failure,
        };
        tracing::info!(
            source = T::SOURCE,
            evidence_items = extraction.evidence.evidence_count(),
            failed = extraction.is_failed(),
            "evidence extracted"
        );
        extraction
    }
}
