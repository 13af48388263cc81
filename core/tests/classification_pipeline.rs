mod common;

use appraisal_core::adapters::interface::{CallStatus, OracleMode};
use appraisal_core::classify::engine::Classifier;
use appraisal_core::error::OracleError;
use appraisal_core::oracle::response::FailureKind;
use appraisal_core::taxonomy::category::Category;
use common::{config, ScriptedOracle};

const PORTS: &str = "Identify the ports on this computer. USB port, HDMI, VGA ports are shown.";

#[test]
fn hardware_misclassified_as_gp6_lands_in_gp1() {
    let oracle = ScriptedOracle::replying(
        r#"```json
{
  "GP1": {"subsections": [], "justifications": {}},
  "GP6": {"subsections": ["GP6.1"], "justifications": {"GP6.1": "Uses ICT."}}
}
```"#,
    );
    let cfg = config();
    let outcome = Classifier::new(&oracle, &cfg).classify_detailed(PORTS);

    assert!(outcome.verdict.is_hardware);
    assert!(outcome.result.assignment(Category::Gp6).is_empty());
    let gp1 = outcome.result.assignment(Category::Gp1);
    assert_eq!(gp1.subsections, vec!["GP1.3".to_string()]);
    assert!(gp1.justifications.contains_key("GP1.3"));
    assert_eq!(outcome.overrides.cleared, vec![Category::Gp6]);
    assert_eq!(outcome.overrides.injected, Some(Category::Gp1));
    assert_eq!(outcome.call.status, CallStatus::Completed);
    assert_eq!(outcome.call.mode, OracleMode::Classification);
}

#[test]
fn plural_hardware_nouns_still_trigger_the_override() {
    let oracle = ScriptedOracle::replying(
        r#"{"GP6": {"subsections": ["GP6.1"], "justifications": {"GP6.1": "Uses ICT."}}}"#,
    );
    let cfg = config();
    let outcome = Classifier::new(&oracle, &cfg)
        .classify_detailed("Labelled diagram of motherboards and CPUs.");

    assert!(outcome.verdict.is_hardware);
    assert_eq!(outcome.result.populated_categories(), vec![Category::Gp1]);
    assert!(outcome.result.assignment(Category::Gp6).is_empty());
    assert_eq!(outcome.overrides.cleared, vec![Category::Gp6]);
}

#[test]
fn hardware_prompt_carries_the_rule_block() {
    let oracle = ScriptedOracle::replying("{}");
    let cfg = config();
    Classifier::new(&oracle, &cfg).classify(PORTS);
    let prompt = oracle.last_prompt();
    assert!(prompt.contains("HARDWARE CLASSIFICATION RULE"));
    assert!(prompt.contains("Suggested classification from keyword analysis: GP1"));

    let reqs = oracle.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].max_tokens, cfg.generation.classification.max_tokens);
    assert_eq!(reqs[0].model, cfg.oracle.model);
}

#[test]
fn non_json_answer_yields_empty_result_with_failure() {
    let oracle = ScriptedOracle::replying("not json at all");
    let cfg = config();
    let outcome = Classifier::new(&oracle, &cfg)
        .classify_detailed("Students wrote a reflective essay on poetry.");

    let result = &outcome.result;
    assert!(result.is_failed());
    assert_eq!(result.categories.len(), 6);
    assert!(result.populated_categories().is_empty());
    let failure = result.failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::MalformedOutput);
    assert_eq!(failure.raw_preview, "not json at all");
    assert_eq!(outcome.call.status, CallStatus::Rejected);
}

#[test]
fn oracle_timeout_still_enforces_hardware_default() {
    let oracle = ScriptedOracle::failing(OracleError::Timeout(30));
    let cfg = config();
    let outcome = Classifier::new(&oracle, &cfg).classify_detailed(
        "Students will use this image to identify computer ports in a lesson activity.",
    );

    let failure = outcome.result.failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::OracleUnavailable);
    assert_eq!(failure.error_code.as_deref(), Some("ORACLE_TIMEOUT"));
    assert_eq!(
        outcome.result.populated_categories(),
        vec![Category::Gp2]
    );
    assert_eq!(outcome.call.status, CallStatus::Failed);
    assert_eq!(outcome.call.error.as_ref().unwrap().category, "TIMEOUT");
}

#[test]
fn non_hardware_classification_is_passed_through() {
    let oracle = ScriptedOracle::replying(
        r#"Here you go: {"GP3": {"subsections": ["GP3.2"], "justifications": {"GP3.2": "Written feedback on drafts."}},
        "GP5": {"subsections": ["GP5.1"], "justifications": {"GP5.1": "Letters home."}}} Thanks!"#,
    );
    let cfg = config();
    let result = Classifier::new(&oracle, &cfg)
        .classify("Teacher sent letters home and gave written feedback on essay drafts.");

    assert!(!result.is_failed());
    assert_eq!(
        result.populated_categories(),
        vec![Category::Gp3, Category::Gp5]
    );
    assert_eq!(
        result.assignment(Category::Gp3).justifications["GP3.2"],
        "Written feedback on drafts."
    );
}

#[test]
fn oracle_gp2_choice_is_trusted_for_hardware() {
    let oracle = ScriptedOracle::replying(
        r#"{"GP2": {"subsections": ["GP2.4"], "justifications": {"GP2.4": "Tiered port labelling task."}},
            "GP3": {"subsections": ["GP3.1"], "justifications": {"GP3.1": "Quiz on ports."}}}"#,
    );
    let cfg = config();
    let outcome = Classifier::new(&oracle, &cfg).classify_detailed(PORTS);
    assert_eq!(outcome.result.populated_categories(), vec![Category::Gp2]);
    assert_eq!(
        outcome.result.assignment(Category::Gp2).subsections,
        vec!["GP2.4".to_string()]
    );
    assert_eq!(outcome.overrides.injected, None);
}
