use crate::adapters::interface::{OracleCallMeta, OracleClient, OracleMode};
use crate::adapters::runtime::exchange;
use crate::config::EngineConfig;
use crate::oracle::response::{coerce_string, coerce_string_list, coerce_text, lookup};
use crate::portfolio::lenient::number_of;
use crate::report::model::{ActionItem, AppraisalInput, AppraisalReport, Priority, RatingBand};
use crate::report::prompt::appraisal_report_prompt;
use crate::taxonomy::category::Category;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: AppraisalReport,
    pub call: OracleCallMeta,
}

pub struct ReportGenerator<'a> {
    client: &'a dyn OracleClient,
    config: &'a EngineConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(client: &'a dyn OracleClient, config: &'a EngineConfig) -> Self {
        Self { client, config }
    }

    /// Always returns a report; an unusable answer yields [`AppraisalReport::failed`].
    pub fn generate_report(&self, input: &AppraisalInput) -> AppraisalReport {
        self.generate_report_detailed(input).report
    }

    pub fn generate_report_detailed(&self, input: &AppraisalInput) -> ReportOutcome {
        let request = self
            .config
            .request(self.config.generation.report, appraisal_report_prompt(input));
        let exchange = exchange(
            self.client,
            OracleMode::AppraisalReport,
            &request,
            self.config.raw_preview_chars,
        );
        let report = match exchange.parsed {
            Ok(obj) => coerce_report(&obj),
            Err(failure) => {
                tracing::warn!(
                    reason = %failure.reason,
                    "appraisal report fell back to an empty report"
                );
                AppraisalReport::failed(failure)
            }
        };
        tracing::info!(
            band = report.band.map(RatingBand::label).unwrap_or("none"),
            average = report.average_score(),
            failed = report.is_failed(),
            "appraisal report generated"
        );
        ReportOutcome {
            report,
            call: exchange.call,
        }
    }
}

// Whole points, clamped to 0..=100; missing or non-numeric scores count as 0.
fn score_of(v: Option<&Value>) -> u8 {
    v.and_then(number_of)
        .map(|f| f.clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

fn action_item(v: &Value) -> Option<ActionItem> {
    let obj = match v {
        Value::Object(obj) => obj,
        Value::String(_) => {
            return coerce_string(v).map(|action| ActionItem {
                priority: Priority::default(),
                action,
                timeline: String::new(),
            })
        }
        _ => return None,
    };
    let action = lookup(obj, &["action", "description"]).and_then(coerce_string)?;
    let priority = lookup(obj, &["priority"])
        .and_then(coerce_string)
        .and_then(|p| Priority::parse(&p))
        .unwrap_or_default();
    Some(ActionItem {
        priority,
        action,
        timeline: coerce_text(lookup(obj, &["timeline"])),
    })
}

/// Coerces a report answer into an [`AppraisalReport`].
///
/// The oracle's band is kept when it names a known band; otherwise the band is derived
/// from the average of the coerced scores.
pub fn coerce_report(obj: &Map<String, Value>) -> AppraisalReport {
    let scores_obj = match lookup(obj, &["scores"]) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let mut report = AppraisalReport::empty();
    for category in Category::ALL {
        let score = score_of(lookup(&scores_obj, &[category.key(), category.code()]));
        report.scores.insert(category, score);
    }

    let claimed = lookup(obj, &["category", "band", "overall_category"])
        .and_then(coerce_string)
        .and_then(|raw| RatingBand::parse(&raw));
    report.band = Some(claimed.unwrap_or_else(|| RatingBand::from_average(report.average_score())));

    report.strengths = coerce_string_list(lookup(obj, &["strengths"]));
    report.weaknesses = coerce_string_list(lookup(obj, &["weaknesses"]));
    report.recommendations = coerce_string_list(lookup(obj, &["recommendations"]));
    report.action_plan = match lookup(obj, &["actionPlan", "action_plan"]) {
        Some(Value::Array(items)) => items.iter().filter_map(action_item).collect(),
        _ => Vec::new(),
    };
    report
}
