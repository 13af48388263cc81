use crate::report::model::AppraisalReport;
use crate::taxonomy::category::Category;

fn push_list(out: &mut Vec<String>, heading: &str, items: &[String]) {
    out.push(format!("## {}", heading));
    out.push("".to_string());
    if items.is_empty() {
        out.push("- _None recorded._".to_string());
    }
    for item in items {
        out.push(format!("- {}", item.trim()));
    }
    out.push("".to_string());
}

pub fn render_report_markdown(report: &AppraisalReport) -> String {
    let mut out = Vec::new();
    out.push("# Appraisal Report".to_string());
    out.push("".to_string());

    if let Some(failure) = &report.failure {
        out.push(format!(
            "> Report could not be generated ({:?}): {}",
            failure.kind, failure.reason
        ));
        out.push("".to_string());
    }

    let band = report.band.map(|b| b.label()).unwrap_or("Not rated");
    out.push(format!("- Overall: {}", band));
    out.push(format!("- Average score: {:.1}", report.average_score()));
    out.push("".to_string());

    out.push("| Principle | Score |".to_string());
    out.push("|---|---|".to_string());
    for category in Category::ALL {
        out.push(format!(
            "| {}: {} | {} |",
            category.code(),
            category.title(),
            report.score(category)
        ));
    }
    out.push("".to_string());

    push_list(&mut out, "Strengths", &report.strengths);
    push_list(&mut out, "Areas for Improvement", &report.weaknesses);
    push_list(&mut out, "Recommendations", &report.recommendations);

    out.push("## Action Plan".to_string());
    out.push("".to_string());
    if report.action_plan.is_empty() {
        out.push("- _No actions planned._".to_string());
    }
    for item in &report.action_plan {
        let priority = format!("{:?}", item.priority).to_uppercase();
        if item.timeline.trim().is_empty() {
            out.push(format!("- [{}] {}", priority, item.action.trim()));
        } else {
            out.push(format!(
                "- [{}] {} ({})",
                priority,
                item.action.trim(),
                item.timeline.trim()
            ));
        }
    }
    out.push("".to_string());
    out.join("\n")
}
