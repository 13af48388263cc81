use crate::error::OracleError;
use serde::{Deserialize, Serialize};

/// One prompt sent to the classification oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub system: String,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Free-text oracle. Implementations return the raw model text; they make no promise
/// about its shape.
pub trait OracleClient: Send + Sync {
    /// Model the client targets by default.
    fn model_id(&self) -> &str;
    fn complete(&self, req: &OracleRequest) -> Result<String, OracleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleMode {
    Classification,
    Summarization,
    LessonExtraction,
    JournalExtraction,
    AttendanceExtraction,
    AssessmentExtraction,
    AppraisalReport,
}

impl OracleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OracleMode::Classification => "classification",
            OracleMode::Summarization => "summarization",
            OracleMode::LessonExtraction => "lesson_extraction",
            OracleMode::JournalExtraction => "journal_extraction",
            OracleMode::AttendanceExtraction => "attendance_extraction",
            OracleMode::AssessmentExtraction => "assessment_extraction",
            OracleMode::AppraisalReport => "appraisal_report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Completed,
    /// The oracle answered but the output was unusable.
    Rejected,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleCallMeta {
    pub call_id: String,
    pub mode: OracleMode,
    pub model_id: String,
    pub request_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,
    pub duration_ms: u64,
    pub status: CallStatus,
    /// Set when `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OracleErrorEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleErrorEnvelope {
    pub category: String, // TIMEOUT|UNAVAILABLE|RATE_LIMITED|MODEL_NOT_FOUND|CONFIG|RUNTIME_ERROR
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

pub fn classify_oracle_error(err: &OracleError) -> OracleErrorEnvelope {
    let (category, code, retryable) = match err {
        OracleError::Timeout(_) => ("TIMEOUT", "ORACLE_TIMEOUT", true),
        OracleError::Unavailable(_) => ("UNAVAILABLE", "ORACLE_UNAVAILABLE", true),
        OracleError::RateLimited(_) => ("RATE_LIMITED", "ORACLE_RATE_LIMITED", true),
        OracleError::ModelNotFound(_) => ("MODEL_NOT_FOUND", "MODEL_NOT_FOUND", false),
        OracleError::Config(_) => ("CONFIG", "ORACLE_CONFIG", false),
        OracleError::Http { status, .. } if *status >= 500 => {
            ("UNAVAILABLE", "ORACLE_SERVER_ERROR", true)
        }
        OracleError::Http { .. } => ("RUNTIME_ERROR", "ORACLE_HTTP_ERROR", false),
        OracleError::InvalidEnvelope(_) => ("RUNTIME_ERROR", "ORACLE_INVALID_ENVELOPE", false),
        OracleError::EmptyResponse => ("RUNTIME_ERROR", "ORACLE_EMPTY_RESPONSE", false),
    };
    OracleErrorEnvelope {
        category: category.to_string(),
        code: code.to_string(),
        message: err.to_string(),
        retryable,
    }
}
