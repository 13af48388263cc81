use crate::oracle::response::truncate_chars;
use crate::portfolio::normalize::CategoryEvidence;
use crate::portfolio::sources::{EvidenceSources, SourceCounts};
use crate::taxonomy::category::Category;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Deduplicated evidence per category, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedEvidence {
    pub buckets: BTreeMap<Category, Vec<String>>,
    pub source_counts: SourceCounts,
}

impl CollectedEvidence {
    pub fn bucket(&self, category: Category) -> &[String] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn evidence_counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.bucket(*c).len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Summarization input: `{"gp1": [...], ..., "gp6": [...]}` with every item cut to
    /// `max_chars`. The collected text itself is untouched.
    pub fn prompt_payload(&self, max_chars: usize) -> Value {
        let mut map = Map::new();
        for category in Category::ALL {
            let items: Vec<Value> = self
                .bucket(category)
                .iter()
                .map(|s| Value::String(truncate_chars(s, max_chars)))
                .collect();
            map.insert(category.key().to_string(), Value::Array(items));
        }
        Value::Object(map)
    }

    /// Maps the dedup key of each truncated item back to its full text.
    pub fn truncation_index(&self, max_chars: usize) -> HashMap<(Category, String), &str> {
        let mut index = HashMap::new();
        for (category, items) in &self.buckets {
            for item in items {
                let cut = truncate_chars(item, max_chars);
                if cut.len() != item.len() {
                    index
                        .entry((*category, dedup_key(&cut)))
                        .or_insert(item.as_str());
                }
            }
        }
        index
    }
}

pub fn dedup_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Keeps the first occurrence of each trimmed, case-insensitive value.
pub fn dedup_evidence<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item)))
        .collect()
}

pub fn collect_evidence(sources: &EvidenceSources) -> CollectedEvidence {
    let mut merged = CategoryEvidence::new();
    for item in sources.items() {
        for (category, items) in item.normalize() {
            merged.entry(category).or_default().extend(items);
        }
    }
    let buckets = merged
        .into_iter()
        .map(|(category, items)| (category, dedup_evidence(items)))
        .collect();
    CollectedEvidence {
        buckets,
        source_counts: sources.counts(),
    }
}
