//! The five evidence shapes supplied to the portfolio builder.
//!
//! Field names follow the wire format callers already produce (`mappedGP`,
//! `patternsDetected`, ...). Every field is lenient: missing or wrong-typed input
//! deserializes to an empty value instead of an error.

use crate::portfolio::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEvidence {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp1: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp2: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp3: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp4: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp5: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp6: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(rename = "gp")]
    pub category: i64,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEvidence {
    #[serde(
        rename = "mappedGP",
        alias = "mapped",
        default,
        deserialize_with = "lenient::journal_entries"
    )]
    pub mapped: Vec<JournalEntry>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvidence {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp3: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp6: Vec<String>,
    #[serde(
        rename = "patternsDetected",
        alias = "patterns",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub patterns: Vec<String>,
    #[serde(
        rename = "recommendedInterventions",
        alias = "interventions",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub interventions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceBreakdown {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(
        rename = "areasNeedingIntervention",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub areas_needing_intervention: Vec<String>,
    #[serde(
        rename = "recommendedStudentGroups",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub recommended_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentEvidence {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp2: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp3: Vec<String>,
    #[serde(
        rename = "performanceBreakdown",
        default,
        deserialize_with = "lenient::object_or_default"
    )]
    pub performance: PerformanceBreakdown,
    #[serde(
        rename = "recommendedActions",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub recommended_actions: Vec<String>,
}

/// Evidence uploaded from outside the structured sources (photo library, documents).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUpload {
    #[serde(rename = "gp", default, deserialize_with = "lenient::category_number")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub evidence: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSources {
    #[serde(default, deserialize_with = "lenient::items")]
    pub lesson_evidence: Vec<LessonEvidence>,
    #[serde(alias = "log_evidence", default, deserialize_with = "lenient::items")]
    pub journal_evidence: Vec<JournalEvidence>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub assessment_evidence: Vec<AssessmentEvidence>,
    #[serde(alias = "register_evidence", default, deserialize_with = "lenient::items")]
    pub attendance_evidence: Vec<AttendanceEvidence>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub external_uploads: Vec<ExternalUpload>,
}

impl EvidenceSources {
    /// Parses caller JSON; anything that is not an object yields empty sources.
    pub fn from_json_value(v: Value) -> Self {
        if !v.is_object() {
            return Self::default();
        }
        serde_json::from_value(v).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.lesson_evidence.is_empty()
            && self.journal_evidence.is_empty()
            && self.assessment_evidence.is_empty()
            && self.attendance_evidence.is_empty()
            && self.external_uploads.is_empty()
    }

    pub fn counts(&self) -> SourceCounts {
        SourceCounts {
            lesson: self.lesson_evidence.len(),
            journal: self.journal_evidence.len(),
            assessment: self.assessment_evidence.len(),
            attendance: self.attendance_evidence.len(),
            external_upload: self.external_uploads.len(),
        }
    }

    /// All items as one tagged sequence, in source order.
    pub fn items(&self) -> Vec<RawEvidenceItem<'_>> {
        let mut out = Vec::new();
        out.extend(self.lesson_evidence.iter().map(RawEvidenceItem::Lesson));
        out.extend(self.journal_evidence.iter().map(RawEvidenceItem::Journal));
        out.extend(self.assessment_evidence.iter().map(RawEvidenceItem::Assessment));
        out.extend(self.attendance_evidence.iter().map(RawEvidenceItem::Attendance));
        out.extend(self.external_uploads.iter().map(RawEvidenceItem::ExternalUpload));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvidenceItem<'a> {
    Lesson(&'a LessonEvidence),
    Journal(&'a JournalEvidence),
    Assessment(&'a AssessmentEvidence),
    Attendance(&'a AttendanceEvidence),
    ExternalUpload(&'a ExternalUpload),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub lesson: usize,
    pub journal: usize,
    pub assessment: usize,
    pub attendance: usize,
    pub external_upload: usize,
}
