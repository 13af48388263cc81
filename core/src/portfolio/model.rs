use crate::oracle::response::OracleFailure;
use crate::portfolio::sources::SourceCounts;
use crate::taxonomy::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceBucket {
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortfolioStatus {
    Organized,
    /// The summarization call failed; buckets are empty and the overall summary says why.
    Fallback,
}

/// One built portfolio. Immutable once stored; a rebuild produces a new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioDocument {
    pub id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub buckets: BTreeMap<Category, EvidenceBucket>,
    pub overall_summary: String,
    pub status: PortfolioStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OracleFailure>,
    #[serde(default)]
    pub source_counts: SourceCounts,
}

pub fn empty_buckets() -> BTreeMap<Category, EvidenceBucket> {
    Category::ALL
        .iter()
        .map(|c| (*c, EvidenceBucket::default()))
        .collect()
}

pub fn fallback_summary(reason: &str) -> String {
    format!("Portfolio could not be organized: {}", reason)
}

impl PortfolioDocument {
    pub fn bucket(&self, category: Category) -> Option<&EvidenceBucket> {
        self.buckets.get(&category)
    }

    pub fn is_fallback(&self) -> bool {
        self.status == PortfolioStatus::Fallback
    }

    pub fn evidence_counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.bucket(*c).map(|b| b.evidence.len()).unwrap_or(0)))
            .collect()
    }
}
