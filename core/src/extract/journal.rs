use crate::adapters::interface::OracleMode;
use crate::extract::prompts::journal_prompt;
use crate::extract::{Extraction, Extractor};
use crate::portfolio::sources::JournalEvidence;

/// Journal entries only ever map to GP3, GP4 or GP6.
pub const JOURNAL_CATEGORIES: [i64; 3] = [3, 4, 6];

impl Extractor<'_> {
    pub fn extract_journal_evidence(&self, entry_text: &str) -> Extraction<JournalEvidence> {
        let mut extraction = self.run::<JournalEvidence>(
            OracleMode::JournalExtraction,
            self.config.generation.journal,
            journal_prompt(entry_text),
        );
        extraction
            .evidence
            .mapped
            .retain(|entry| JOURNAL_CATEGORIES.contains(&entry.category));
        extraction
    }
}
