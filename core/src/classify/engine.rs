use crate::adapters::interface::{OracleCallMeta, OracleClient, OracleMode};
use crate::adapters::runtime::exchange;
use crate::classify::coerce::coerce_classification;
use crate::classify::enforcement::{enforce_taxonomy, OverrideReport};
use crate::classify::hardware::{detect_hardware, HardwareVerdict};
use crate::classify::result::ClassificationResult;
use crate::config::EngineConfig;
use crate::oracle::prompts::classification_prompt;

/// Everything one classification produced, for callers that audit the run.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    pub result: ClassificationResult,
    pub verdict: HardwareVerdict,
    pub overrides: OverrideReport,
    pub call: OracleCallMeta,
}

/// Detect, ask the oracle, coerce, enforce. Holds no state between calls.
pub struct Classifier<'a> {
    client: &'a dyn OracleClient,
    config: &'a EngineConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(client: &'a dyn OracleClient, config: &'a EngineConfig) -> Self {
        Self { client, config }
    }

    pub fn detect(&self, text: &str) -> HardwareVerdict {
        detect_hardware(text, &self.config.vocabulary)
    }

    /// Classifies one evidence item. Always returns a structurally complete result.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_detailed(text).result
    }

    pub fn classify_detailed(&self, text: &str) -> ClassificationOutcome {
        let verdict = self.detect(text);
        if verdict.is_hardware {
            tracing::info!(
                suggested = ?verdict.suggested_category,
                technical = ?verdict.technical_matches,
                teaching = ?verdict.teaching_matches,
                "hardware content detected"
            );
        }

        let request = self.config.request(
            self.config.generation.classification,
            classification_prompt(text, &verdict),
        );
        let exchange = exchange(
            self.client,
            OracleMode::Classification,
            &request,
            self.config.raw_preview_chars,
        );

        let mut result = match exchange.parsed {
            Ok(obj) => coerce_classification(&obj),
            Err(failure) => ClassificationResult::failed(failure),
        };
        // Runs on the failure fallback as well: hardware always lands in GP1 or GP2.
        let overrides = enforce_taxonomy(&mut result, &verdict);

        ClassificationOutcome {
            result,
            verdict,
            overrides,
            call: exchange.call,
        }
    }
}
