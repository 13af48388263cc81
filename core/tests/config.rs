use appraisal_core::config::EngineConfig;
use appraisal_core::error::CoreError;
use std::collections::HashMap;

#[test]
fn defaults_match_the_documented_generation_parameters() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.oracle.timeout_secs, 30);
    assert_eq!(cfg.generation.summarization.max_tokens, 4000);
    assert_eq!(cfg.generation.journal.max_tokens, 2000);
    assert_eq!(cfg.evidence_truncate_chars, 500);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("engine.json");
    std::fs::write(
        &path,
        r#"{"oracle": {"model": "gpt-4o-mini"}, "vocabulary": {"generic": ["projector"]}}"#,
    )
    .unwrap();
    let cfg = EngineConfig::load(&path).unwrap();
    assert_eq!(cfg.oracle.model, "gpt-4o-mini");
    assert_eq!(cfg.oracle.endpoint, "https://api.openai.com/v1");
    assert_eq!(cfg.vocabulary.generic, vec!["projector".to_string()]);
    assert!(!cfg.vocabulary.technical.is_empty());
}

#[test]
fn unparseable_file_is_a_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("engine.json");
    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(EngineConfig::load(&path), Err(CoreError::Config(_))));
}

#[test]
fn env_overrides_apply_with_key_fallback() {
    let env: HashMap<&str, &str> = [
        ("APPRAISAL_ORACLE_ENDPOINT", "http://localhost:8080/v1"),
        ("APPRAISAL_ORACLE_TIMEOUT_SECS", "12"),
        ("APPRAISAL_ORACLE_API_KEY", " "),
        ("OPENAI_API_KEY", "sk-test"),
    ]
    .into_iter()
    .collect();
    let mut cfg = EngineConfig::default();
    cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.oracle.endpoint, "http://localhost:8080/v1");
    assert_eq!(cfg.oracle.timeout_secs, 12);
    assert_eq!(cfg.oracle.api_key.as_deref(), Some("sk-test"));
    assert!(cfg.validate().is_ok());
}

#[test]
fn api_key_is_never_serialized() {
    let mut cfg = EngineConfig::default();
    cfg.oracle.api_key = Some("sk-secret".to_string());
    let text = serde_json::to_string(&cfg).unwrap();
    assert!(!text.contains("sk-secret"));
}

#[test]
fn invalid_values_are_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.oracle.endpoint = "ftp://example.org".to_string();
    assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));

    let mut cfg = EngineConfig::default();
    cfg.oracle.timeout_secs = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.generation.lesson.temperature = 2.5;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.generation.assessment.max_tokens = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.evidence_truncate_chars = 0;
    assert!(cfg.validate().is_err());
}
