use crate::adapters::interface::OracleMode;
use crate::classify::hardware::{detect_hardware, HardwareVerdict, HardwareVocabulary};
use crate::extract::prompts::lesson_prompt;
use crate::extract::{Extraction, Extractor};
use crate::portfolio::sources::LessonEvidence;
use crate::taxonomy::category::Category;
use crate::taxonomy::subsections::hardware_default;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonHardwareReport {
    pub removed: Vec<(Category, usize)>,
    pub injected: Option<Category>,
}

fn list_mut(evidence: &mut LessonEvidence, category: Category) -> &mut Vec<String> {
    match category {
        Category::Gp1 => &mut evidence.gp1,
        Category::Gp2 => &mut evidence.gp2,
        Category::Gp3 => &mut evidence.gp3,
        Category::Gp4 => &mut evidence.gp4,
        Category::Gp5 => &mut evidence.gp5,
        Category::Gp6 => &mut evidence.gp6,
    }
}

/// Drops GP3-GP6 items that mention a hardware noun and, when GP1 and GP2 are both
/// empty afterwards, adds the canonical statement for the suggested category.
/// Does nothing for non-hardware lessons.
pub fn enforce_lesson_hardware(
    evidence: &mut LessonEvidence,
    verdict: &HardwareVerdict,
    vocabulary: &HardwareVocabulary,
) -> LessonHardwareReport {
    let mut report = LessonHardwareReport::default();
    if !verdict.is_hardware {
        return report;
    }
    for category in Category::HARDWARE_FORBIDDEN {
        let items = list_mut(evidence, category);
        let before = items.len();
        items.retain(|item| !vocabulary.mentions_hardware_noun(item));
        let removed = before - items.len();
        if removed > 0 {
            tracing::warn!(
                category = %category,
                removed,
                "removed hardware evidence from lesson category"
            );
            report.removed.push((category, removed));
        }
    }
    if evidence.gp1.is_empty() && evidence.gp2.is_empty() {
        let target = verdict.fallback_category();
        if let Some(default) = hardware_default(target) {
            list_mut(evidence, target).push(default.statement.to_string());
            tracing::info!(category = %target, "assigned hardware lesson evidence");
            report.injected = Some(target);
        }
    }
    report
}

impl Extractor<'_> {
    pub fn extract_lesson_evidence(&self, lesson_text: &str) -> Extraction<LessonEvidence> {
        let vocabulary = &self.config.vocabulary;
        let verdict = detect_hardware(lesson_text, vocabulary);
        let mut extraction = self.run::<LessonEvidence>(
            OracleMode::LessonExtraction,
            self.config.generation.lesson,
            lesson_prompt(lesson_text, &verdict),
        );
        enforce_lesson_hardware(&mut extraction.evidence, &verdict, vocabulary);
        extraction
    }
}
