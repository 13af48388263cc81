use crate::adapters::interface::OracleMode;
use crate::extract::prompts::attendance_prompt;
use crate::extract::{Extraction, Extractor};
use crate::portfolio::sources::AttendanceEvidence;
use serde::{Deserialize, Serialize};

/// Register summary for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceInput {
    pub date_range: String,
    pub attendance_percentage: Option<f64>,
    pub punctuality_percentage: Option<f64>,
    pub notes: Vec<String>,
    pub follow_ups: Vec<String>,
}

impl Extractor<'_> {
    pub fn extract_attendance_evidence(
        &self,
        input: &AttendanceInput,
    ) -> Extraction<AttendanceEvidence> {
        self.run(
            OracleMode::AttendanceExtraction,
            self.config.generation.attendance,
            attendance_prompt(input),
        )
    }
}
