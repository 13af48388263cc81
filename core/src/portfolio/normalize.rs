//! One normalization function per evidence shape, each producing the same
//! category -> evidence list intermediate.

use crate::portfolio::sources::{
    AssessmentEvidence, AttendanceEvidence, ExternalUpload, JournalEvidence, LessonEvidence,
    RawEvidenceItem,
};
use crate::taxonomy::category::Category;
use std::collections::BTreeMap;

pub type CategoryEvidence = BTreeMap<Category, Vec<String>>;

fn push_all(out: &mut CategoryEvidence, category: Category, items: &[String]) {
    for item in items {
        push(out, category, item);
    }
}

fn push(out: &mut CategoryEvidence, category: Category, item: &str) {
    if item.trim().is_empty() {
        return;
    }
    out.entry(category).or_default().push(item.to_string());
}

pub fn normalize_lesson(lesson: &LessonEvidence) -> CategoryEvidence {
    let mut out = CategoryEvidence::new();
    push_all(&mut out, Category::Gp1, &lesson.gp1);
    push_all(&mut out, Category::Gp2, &lesson.gp2);
    push_all(&mut out, Category::Gp3, &lesson.gp3);
    push_all(&mut out, Category::Gp4, &lesson.gp4);
    push_all(&mut out, Category::Gp5, &lesson.gp5);
    push_all(&mut out, Category::Gp6, &lesson.gp6);
    out
}

pub fn normalize_journal(journal: &JournalEvidence) -> CategoryEvidence {
    let mut out = CategoryEvidence::new();
    for entry in &journal.mapped {
        if let Some(category) = Category::from_number(entry.category) {
            push(&mut out, category, &entry.evidence);
        }
    }
    out
}

pub fn normalize_assessment(assessment: &AssessmentEvidence) -> CategoryEvidence {
    let mut out = CategoryEvidence::new();
    push_all(&mut out, Category::Gp2, &assessment.gp2);
    push_all(&mut out, Category::Gp3, &assessment.gp3);
    out
}

pub fn normalize_attendance(attendance: &AttendanceEvidence) -> CategoryEvidence {
    let mut out = CategoryEvidence::new();
    push_all(&mut out, Category::Gp3, &attendance.gp3);
    push_all(&mut out, Category::Gp3, &attendance.patterns);
    push_all(&mut out, Category::Gp3, &attendance.interventions);
    push_all(&mut out, Category::Gp6, &attendance.gp6);
    out
}

pub fn normalize_upload(upload: &ExternalUpload) -> CategoryEvidence {
    let mut out = CategoryEvidence::new();
    let Some(category) = upload.category.and_then(Category::from_number) else {
        return out;
    };
    let text = if upload.evidence.trim().is_empty() {
        &upload.description
    } else {
        &upload.evidence
    };
    push(&mut out, category, text);
    out
}

impl RawEvidenceItem<'_> {
    pub fn source_name(&self) -> &'static str {
        match self {
            RawEvidenceItem::Lesson(_) => "lesson",
            RawEvidenceItem::Journal(_) => "journal",
            RawEvidenceItem::Assessment(_) => "assessment",
            RawEvidenceItem::Attendance(_) => "attendance",
            RawEvidenceItem::ExternalUpload(_) => "external_upload",
        }
    }

    pub fn normalize(&self) -> CategoryEvidence {
        match self {
            RawEvidenceItem::Lesson(v) => normalize_lesson(v),
            RawEvidenceItem::Journal(v) => normalize_journal(v),
            RawEvidenceItem::Assessment(v) => normalize_assessment(v),
            RawEvidenceItem::Attendance(v) => normalize_attendance(v),
            RawEvidenceItem::ExternalUpload(v) => normalize_upload(v),
        }
    }
}
