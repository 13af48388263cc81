use crate::oracle::response::OracleFailure;
use crate::taxonomy::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    /// Subsection codes in the order the oracle gave them.
    pub subsections: Vec<String>,
    /// One-sentence justification per subsection code.
    pub justifications: BTreeMap<String, String>,
}

impl CategoryAssignment {
    pub fn single(subsection: &str, justification: &str) -> Self {
        let mut justifications = BTreeMap::new();
        justifications.insert(subsection.to_string(), justification.to_string());
        Self {
            subsections: vec![subsection.to_string()],
            justifications,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subsections.is_empty() && self.justifications.is_empty()
    }

    pub fn clear(&mut self) {
        self.subsections.clear();
        self.justifications.clear();
    }
}

static EMPTY_ASSIGNMENT: CategoryAssignment = CategoryAssignment {
    subsections: Vec::new(),
    justifications: BTreeMap::new(),
};

/// Classification of one evidence item across GP1..GP6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub categories: BTreeMap<Category, CategoryAssignment>,
    /// Set when the oracle could not be reached or its output was unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OracleFailure>,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl ClassificationResult {
    pub fn empty() -> Self {
        Self {
            categories: Category::ALL
                .iter()
                .map(|c| (*c, CategoryAssignment::default()))
                .collect(),
            failure: None,
        }
    }

    pub fn failed(failure: OracleFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::empty()
        }
    }

    pub fn assignment(&self, category: Category) -> &CategoryAssignment {
        self.categories.get(&category).unwrap_or(&EMPTY_ASSIGNMENT)
    }

    pub fn assignment_mut(&mut self, category: Category) -> &mut CategoryAssignment {
        self.categories.entry(category).or_default()
    }

    pub fn populated_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| !self.assignment(*c).is_empty())
            .collect()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}
