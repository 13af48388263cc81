use crate::adapters::interface::OracleMode;
use crate::extract::prompts::assessment_prompt;
use crate::extract::{Extraction, Extractor};
use crate::portfolio::sources::AssessmentEvidence;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentInput {
    pub description: String,
    /// Grade label to student count, e.g. `{"A": 5, "B": 10}`.
    pub grade_distribution: BTreeMap<String, Value>,
    pub diagnostic_results: Vec<Value>,
    pub total_students: Option<u64>,
    pub average_score: Option<f64>,
}

impl Extractor<'_> {
    pub fn extract_assessment_evidence(
        &self,
        input: &AssessmentInput,
    ) -> Extraction<AssessmentEvidence> {
        self.run(
            OracleMode::AssessmentExtraction,
            self.config.generation.assessment,
            assessment_prompt(input),
        )
    }
}
