use crate::adapters::interface::OracleRequest;
use crate::classify::hardware::HardwareVocabulary;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleSettings {
    pub endpoint: String,
    pub model: String,
    /// Model used once when the configured one is reported missing.
    pub fallback_model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub system_prompt: String,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            fallback_model: "gpt-4o".to_string(),
            api_key: None,
            timeout_secs: 30,
            system_prompt:
                "You are a helpful assistant for teacher appraisal and e-portfolio systems."
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub classification: GenerationParams,
    pub summarization: GenerationParams,
    pub lesson: GenerationParams,
    pub journal: GenerationParams,
    pub attendance: GenerationParams,
    pub assessment: GenerationParams,
    pub report: GenerationParams,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            classification: GenerationParams::new(0.1, 2500),
            summarization: GenerationParams::new(0.1, 4000),
            lesson: GenerationParams::new(0.3, 3000),
            journal: GenerationParams::new(0.3, 2000),
            attendance: GenerationParams::new(0.3, 2500),
            assessment: GenerationParams::new(0.3, 3000),
            report: GenerationParams::new(0.3, 4000),
        }
    }
}

impl GenerationSettings {
    fn all(&self) -> [(&'static str, GenerationParams); 7] {
        [
            ("classification", self.classification),
            ("summarization", self.summarization),
            ("lesson", self.lesson),
            ("journal", self.journal),
            ("attendance", self.attendance),
            ("assessment", self.assessment),
            ("report", self.report),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub oracle: OracleSettings,
    pub generation: GenerationSettings,
    /// Longest evidence string sent to the summarization prompt.
    pub evidence_truncate_chars: usize,
    /// Longest slice of rejected oracle output kept in a failure record.
    pub raw_preview_chars: usize,
    pub vocabulary: HardwareVocabulary,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            oracle: OracleSettings::default(),
            generation: GenerationSettings::default(),
            evidence_truncate_chars: 500,
            raw_preview_chars: 500,
            vocabulary: HardwareVocabulary::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let bytes = fs::read(path.as_ref())?;
        let cfg: EngineConfig = serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::Config(format!(
                "failed to parse {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(cfg)
    }

    /// File (when given) plus process environment, validated.
    pub fn resolve(path: Option<&Path>) -> CoreResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies environment overrides through `lookup` so callers can inject a fake env.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("APPRAISAL_ORACLE_ENDPOINT") {
            self.oracle.endpoint = v;
        }
        if let Some(v) = non_empty("APPRAISAL_ORACLE_MODEL") {
            self.oracle.model = v;
        }
        if let Some(v) =
            non_empty("APPRAISAL_ORACLE_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.oracle.api_key = Some(v);
        }
        if let Some(v) = non_empty("APPRAISAL_ORACLE_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) => self.oracle.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APPRAISAL_ORACLE_TIMEOUT_SECS"),
            }
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        let endpoint = url::Url::parse(&self.oracle.endpoint)
            .map_err(|_| CoreError::Config("oracle endpoint is not a valid URL".to_string()))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(CoreError::Config(
                "oracle endpoint must use http or https".to_string(),
            ));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(CoreError::Config("oracle model cannot be empty".to_string()));
        }
        if self.oracle.timeout_secs == 0 {
            return Err(CoreError::Config(
                "oracle timeout must be at least one second".to_string(),
            ));
        }
        for (name, params) in self.generation.all() {
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(CoreError::Config(format!(
                    "{} temperature must be within 0.0..=2.0",
                    name
                )));
            }
            if params.max_tokens == 0 {
                return Err(CoreError::Config(format!(
                    "{} max_tokens must be positive",
                    name
                )));
            }
        }
        if self.evidence_truncate_chars == 0 {
            return Err(CoreError::Config(
                "evidence_truncate_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request(&self, params: GenerationParams, prompt: String) -> OracleRequest {
        OracleRequest {
            system: self.oracle.system_prompt.clone(),
            prompt,
            model: self.oracle.model.clone(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}
