mod common;

use appraisal_core::adapters::interface::OracleMode;
use appraisal_core::error::OracleError;
use appraisal_core::extract::assessment::AssessmentInput;
use appraisal_core::extract::attendance::AttendanceInput;
use appraisal_core::extract::{Extractor, SourceEvidence};
use common::{config, ScriptedOracle};
use serde_json::json;

#[test]
fn lesson_extraction_removes_hardware_from_forbidden_categories() {
    let oracle = ScriptedOracle::replying(
        r#"{"gp1": [], "gp2": [], "gp3": ["Quiz on USB ports", "Exit ticket on learning"],
            "gp6": ["Students photographed the motherboard"], "strengths": ["Clear aims"], "weaknesses": 4}"#,
    );
    let cfg = config();
    let x = Extractor::new(&oracle, &cfg)
        .extract_lesson_evidence("Students will identify computer ports on a motherboard diagram.");

    assert!(!x.is_failed());
    assert_eq!(x.evidence.gp3, vec!["Exit ticket on learning".to_string()]);
    assert!(x.evidence.gp6.is_empty());
    assert_eq!(x.evidence.gp2.len(), 1);
    assert!(x.evidence.gp2[0].contains("teaching activities"));
    assert!(x.evidence.gp1.is_empty());
    assert_eq!(x.evidence.strengths, vec!["Clear aims".to_string()]);
    assert!(x.evidence.weaknesses.is_empty());
    assert!(oracle.last_prompt().contains("HARDWARE CLASSIFICATION RULE"));
    assert_eq!(x.call.mode, OracleMode::LessonExtraction);
}

#[test]
fn lesson_filter_catches_plural_hardware_nouns() {
    let oracle = ScriptedOracle::replying(
        r#"{"gp1": ["Named each part correctly"], "gp4": ["Reflected on sockets and connectors", "Peer feedback round"],
            "gp5": ["Shared spare motherboards with parents"]}"#,
    );
    let cfg = config();
    let x = Extractor::new(&oracle, &cfg)
        .extract_lesson_evidence("Technical analysis of motherboards and CPUs.");

    assert_eq!(x.evidence.gp4, vec!["Peer feedback round".to_string()]);
    assert!(x.evidence.gp5.is_empty());
    assert_eq!(x.evidence.gp1, vec!["Named each part correctly".to_string()]);
    assert!(x.evidence.gp2.is_empty());
}

#[test]
fn lesson_without_hardware_is_untouched() {
    let oracle = ScriptedOracle::replying(r#"{"gp5": ["Invited parents to the reading fair"]}"#);
    let cfg = config();
    let x = Extractor::new(&oracle, &cfg).extract_lesson_evidence("Reading fair with parents.");
    assert_eq!(x.evidence.gp5.len(), 1);
    assert!(x.evidence.gp1.is_empty() && x.evidence.gp2.is_empty());
    assert!(!oracle.last_prompt().contains("HARDWARE CLASSIFICATION RULE"));
    assert_eq!(x.evidence.evidence_count(), 1);
}

#[test]
fn journal_extraction_keeps_only_gp3_gp4_gp6() {
    let oracle = ScriptedOracle::replying(
        r#"{"mappedGP": [{"gp": 3, "evidence": "Managed a disruptive student calmly"},
                          {"gp": 1, "evidence": "Knows content"},
                          {"gp": "6", "evidence": "Posted notes online"}],
            "summary": "A busy day."}"#,
    );
    let cfg = config();
    let x = Extractor::new(&oracle, &cfg).extract_journal_evidence("Log entry text");
    let cats: Vec<i64> = x.evidence.mapped.iter().map(|e| e.category).collect();
    assert_eq!(cats, vec![3, 6]);
    assert_eq!(x.evidence.summary, "A busy day.");
    assert_eq!(
        oracle.requests()[0].max_tokens,
        cfg.generation.journal.max_tokens
    );
}

#[test]
fn attendance_prompt_carries_register_figures() {
    let oracle = ScriptedOracle::replying(
        r#"{"gp3": ["Followed up absences"], "patternsDetected": ["Friday lateness"], "recommendedInterventions": "none"}"#,
    );
    let cfg = config();
    let input: AttendanceInput = serde_json::from_value(json!({
        "date_range": "Jan-Mar 2026",
        "attendance_percentage": 91.5,
        "notes": ["Flu outbreak"],
        "follow_ups": ["Called parents"]
    }))
    .unwrap();
    let x = Extractor::new(&oracle, &cfg).extract_attendance_evidence(&input);
    let prompt = oracle.last_prompt();
    assert!(prompt.contains("91.5%"));
    assert!(prompt.contains("Punctuality Percentage: N/A"));
    assert!(prompt.contains("Flu outbreak"));
    assert_eq!(x.evidence.patterns, vec!["Friday lateness".to_string()]);
    assert!(x.evidence.interventions.is_empty());
    assert_eq!(x.evidence.evidence_count(), 2);
}

#[test]
fn assessment_extraction_reads_performance_breakdown() {
    let oracle = ScriptedOracle::replying(
        r#"{"gp2": ["Tiered worksheet"], "gp3": [],
            "performanceBreakdown": {"strengths": ["Algebra"], "areasNeedingIntervention": ["Fractions"]},
            "recommendedActions": ["Small group tutoring"]}"#,
    );
    let cfg = config();
    let input = AssessmentInput {
        description: "Term test".to_string(),
        total_students: Some(32),
        ..Default::default()
    };
    let x = Extractor::new(&oracle, &cfg).extract_assessment_evidence(&input);
    assert_eq!(x.evidence.gp2, vec!["Tiered worksheet".to_string()]);
    assert_eq!(x.evidence.performance.areas_needing_intervention, vec!["Fractions".to_string()]);
    assert!(x.evidence.performance.recommended_groups.is_empty());
    assert_eq!(x.evidence.recommended_actions.len(), 1);
    assert!(oracle.last_prompt().contains("Total Students: 32"));
}

#[test]
fn extraction_failure_returns_empty_shape() {
    let oracle = ScriptedOracle::failing(OracleError::RateLimited("quota".into()));
    let cfg = config();
    let x = Extractor::new(&oracle, &cfg).extract_journal_evidence("entry");
    assert!(x.is_failed());
    assert!(x.evidence.mapped.is_empty());
    assert_eq!(
        x.failure.unwrap().error_code.as_deref(),
        Some("ORACLE_RATE_LIMITED")
    );
}
