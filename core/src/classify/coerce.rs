use crate::classify::result::{CategoryAssignment, ClassificationResult};
use crate::oracle::response::{coerce_object, coerce_string, coerce_string_list, lookup};
use crate::taxonomy::category::Category;
use crate::taxonomy::subsections::{find_subsection, normalize_subsection};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds a reconciled classification from a parsed oracle object.
///
/// Every category is present afterwards. Within a category the subsection list and the
/// justification keys name exactly the same canonical codes of that category.
pub fn coerce_classification(obj: &Map<String, Value>) -> ClassificationResult {
    let mut result = ClassificationResult::empty();
    for category in Category::ALL {
        let raw = coerce_object(lookup(obj, &[category.code(), category.key()]));
        *result.assignment_mut(category) = coerce_assignment(category, &raw);
    }
    result
}

fn coerce_assignment(category: Category, raw: &Map<String, Value>) -> CategoryAssignment {
    let mut subsections: Vec<String> = Vec::new();
    for code in coerce_string_list(raw.get("subsections")) {
        match normalize_subsection(category, &code) {
            Some(canonical) => {
                if !subsections.iter().any(|s| s == canonical) {
                    subsections.push(canonical.to_string());
                }
            }
            None => tracing::debug!(
                category = category.code(),
                code = %code,
                "dropping subsection outside the category"
            ),
        }
    }

    let mut justifications: BTreeMap<String, String> = BTreeMap::new();
    for (code, text) in coerce_object(raw.get("justifications")) {
        let Some(canonical) = normalize_subsection(category, &code) else {
            continue;
        };
        let Some(text) = coerce_string(&text) else {
            continue;
        };
        justifications
            .entry(canonical.to_string())
            .or_insert_with(|| text.trim().to_string());
    }

    // A justification without a listed code still claims the subsection.
    for code in justifications.keys() {
        if !subsections.iter().any(|s| s == code) {
            subsections.push(code.clone());
        }
    }
    for code in &subsections {
        if !justifications.contains_key(code) {
            let title = find_subsection(code).map(|s| s.title).unwrap_or("");
            justifications.insert(
                code.clone(),
                format!("Evidence was matched to {} ({}).", code, title),
            );
        }
    }

    CategoryAssignment {
        subsections,
        justifications,
    }
}
