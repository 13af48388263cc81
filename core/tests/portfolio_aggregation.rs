use appraisal_core::portfolio::aggregate::{collect_evidence, dedup_evidence};
use appraisal_core::portfolio::sources::EvidenceSources;
use appraisal_core::taxonomy::category::Category;
use proptest::prelude::*;
use serde_json::json;

fn sources(v: serde_json::Value) -> EvidenceSources {
    EvidenceSources::from_json_value(v)
}

#[test]
fn duplicates_collapse_to_first_occurrence() {
    let out = dedup_evidence(vec![
        "Did well".to_string(),
        "DID WELL ".to_string(),
        "Did well".to_string(),
    ]);
    assert_eq!(out, vec!["Did well".to_string()]);
}

#[test]
fn all_five_sources_are_normalized_into_buckets() {
    let s = sources(json!({
        "lesson_evidence": [
            {"gp1": ["Accurate content"], "gp2": ["Used 5E model"], "strengths": ["Pacing"]}
        ],
        "log_evidence": [
            {"mappedGP": [{"gp": 4, "evidence": "Attended workshop"}, {"gp": 6, "evidence": "Used LMS"}], "summary": "s"}
        ],
        "assessment_evidence": [
            {"gp2": ["Differentiated quiz"], "gp3": ["Item analysis done"]}
        ],
        "register_evidence": [
            {"gp3": ["Called parents of absentees"], "gp6": ["Digital register"],
             "patternsDetected": ["Monday absences"], "recommendedInterventions": ["Morning check-in"]}
        ],
        "external_uploads": [
            {"gp": 5, "evidence": "", "description": "Community fair photo", "filename": "fair.jpg"}
        ]
    }));
    let c = collect_evidence(&s);

    assert_eq!(c.bucket(Category::Gp1), ["Accurate content"]);
    assert_eq!(c.bucket(Category::Gp2), ["Used 5E model", "Differentiated quiz"]);
    assert_eq!(
        c.bucket(Category::Gp3),
        [
            "Item analysis done",
            "Called parents of absentees",
            "Monday absences",
            "Morning check-in"
        ]
    );
    assert_eq!(c.bucket(Category::Gp4), ["Attended workshop"]);
    assert_eq!(c.bucket(Category::Gp5), ["Community fair photo"]);
    assert_eq!(c.bucket(Category::Gp6), ["Used LMS", "Digital register"]);
    assert_eq!(c.source_counts.lesson, 1);
    assert_eq!(c.source_counts.external_upload, 1);
    assert_eq!(c.total(), 11);
}

#[test]
fn malformed_caller_input_becomes_empty() {
    let s = sources(json!({
        "lesson_evidence": "oops",
        "journal_evidence": [42, {"mappedGP": "nope"}, {"mappedGP": [{"gp": "GP3", "evidence": "Calm class"}, {"gp": 9, "evidence": "x"}, {"evidence": "no gp"}]}],
        "assessment_evidence": [{"gp2": "not a list", "gp3": [null, " ", 7], "performanceBreakdown": []}],
        "external_uploads": [{"gp": "seven", "evidence": "lost"}, {"gp": 2.0, "evidence": "Seating plan"}]
    }));
    let c = collect_evidence(&s);
    assert!(s.lesson_evidence.is_empty());
    assert_eq!(s.journal_evidence.len(), 2);
    assert_eq!(c.bucket(Category::Gp3), ["Calm class", "7"]);
    assert_eq!(c.bucket(Category::Gp2), ["Seating plan"]);
    assert!(c.bucket(Category::Gp1).is_empty());

    assert_eq!(sources(json!([1, 2, 3])), EvidenceSources::default());
    assert_eq!(sources(json!(null)), EvidenceSources::default());
}

#[test]
fn dedup_spans_sources() {
    let s = sources(json!({
        "lesson_evidence": [{"gp3": ["Peer review used"]}],
        "assessment_evidence": [{"gp3": ["  peer review USED"]}]
    }));
    assert_eq!(collect_evidence(&s).bucket(Category::Gp3), ["Peer review used"]);
}

#[test]
fn prompt_payload_truncates_without_touching_collected_text() {
    let long = "a".repeat(700);
    let s = sources(json!({"lesson_evidence": [{"gp1": [long.clone()]}]}));
    let c = collect_evidence(&s);
    let payload = c.prompt_payload(500);
    assert_eq!(payload["gp1"][0].as_str().unwrap().len(), 500);
    assert_eq!(payload["gp6"], json!([]));
    assert_eq!(c.bucket(Category::Gp1)[0], long);
}

proptest! {
    #[test]
    fn dedup_keeps_first_occurrence_of_each_key(items in proptest::collection::vec("[a-cA-C ]{0,4}", 0..30)) {
        let items: Vec<String> = items;
        let out = dedup_evidence(items.clone());
        let mut seen = std::collections::HashSet::new();
        let expected: Vec<String> = items
            .iter()
            .filter(|s| seen.insert(s.trim().to_lowercase()))
            .cloned()
            .collect();
        prop_assert_eq!(out, expected);
    }
}
