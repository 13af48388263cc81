use crate::classify::hardware::HardwareVerdict;
use crate::classify::result::{CategoryAssignment, ClassificationResult};
use crate::taxonomy::category::Category;
use crate::taxonomy::subsections::hardware_default;
use serde::{Deserialize, Serialize};

/// What the hardware override changed in one result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideReport {
    /// Forbidden categories that held content before being cleared.
    pub cleared: Vec<Category>,
    /// Category that received the canonical default assignment.
    pub injected: Option<Category>,
}

impl OverrideReport {
    pub fn is_noop(&self) -> bool {
        self.cleared.is_empty() && self.injected.is_none()
    }
}

/// Applies the hardware override in place.
///
/// Non-hardware verdicts leave `result` untouched. For hardware, GP3-GP6 are cleared
/// unconditionally and, when neither GP1 nor GP2 holds anything, the verdict's category
/// receives its canonical default. Applying it to its own output changes nothing.
pub fn enforce_taxonomy(
    result: &mut ClassificationResult,
    verdict: &HardwareVerdict,
) -> OverrideReport {
    let mut report = OverrideReport::default();
    if !verdict.is_hardware {
        return report;
    }

    for category in Category::HARDWARE_FORBIDDEN {
        let assignment = result.assignment_mut(category);
        if !assignment.is_empty() {
            tracing::warn!(
                category = category.code(),
                subsections = ?assignment.subsections,
                "removing hardware classification from forbidden category"
            );
            report.cleared.push(category);
        }
        assignment.clear();
    }

    let has_allowed = Category::HARDWARE_ALLOWED
        .iter()
        .any(|c| !result.assignment(*c).is_empty());
    if !has_allowed {
        let target = verdict.fallback_category();
        if let Some(default) = hardware_default(target) {
            *result.assignment_mut(target) =
                CategoryAssignment::single(default.subsection, default.justification);
            tracing::info!(
                category = target.code(),
                subsection = default.subsection,
                "assigned hardware content to default subsection"
            );
            report.injected = Some(target);
        }
    }

    report
}

/// By-value form of [`enforce_taxonomy`] for callers that only want the corrected result.
pub fn enforced(
    mut result: ClassificationResult,
    verdict: &HardwareVerdict,
) -> ClassificationResult {
    enforce_taxonomy(&mut result, verdict);
    result
}
