#![allow(dead_code)]

use appraisal_core::adapters::interface::{OracleClient, OracleRequest};
use appraisal_core::config::EngineConfig;
use appraisal_core::error::OracleError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Oracle that replays canned answers in order and records every request.
pub struct ScriptedOracle {
    answers: Mutex<VecDeque<Result<String, OracleError>>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new(answers: Vec<Result<String, OracleError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(err: OracleError) -> Self {
        Self::new(vec![Err(err)])
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.requests().last().map(|r| r.prompt.clone()).unwrap_or_default()
    }
}

impl OracleClient for ScriptedOracle {
    fn model_id(&self) -> &str {
        "scripted"
    }

    fn complete(&self, req: &OracleRequest) -> Result<String, OracleError> {
        self.requests.lock().unwrap().push(req.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse))
    }
}

pub fn config() -> EngineConfig {
    EngineConfig::default()
}
