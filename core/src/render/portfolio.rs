use crate::error::CoreResult;
use crate::portfolio::model::PortfolioDocument;
use crate::taxonomy::category::Category;

pub fn render_portfolio_markdown(doc: &PortfolioDocument) -> String {
    let mut out = Vec::new();
    out.push("# Appraisal Portfolio".to_string());
    out.push("".to_string());
    out.push(format!("- Portfolio ID: {}", doc.id));
    out.push(format!("- Created: {}", doc.created_at));
    if let Some(owner) = &doc.owner {
        out.push(format!("- Owner: {}", owner));
    }
    out.push("".to_string());

    if let Some(failure) = &doc.failure {
        out.push(format!(
            "> Evidence could not be organized ({:?}): {}",
            failure.kind, failure.reason
        ));
        out.push("".to_string());
    }

    out.push("## Overall Summary".to_string());
    out.push("".to_string());
    if doc.overall_summary.trim().is_empty() {
        out.push("_No summary._".to_string());
    } else {
        out.push(doc.overall_summary.trim().to_string());
    }
    out.push("".to_string());

    for category in Category::ALL {
        out.push(format!("## {}: {}", category.code(), category.title()));
        out.push("".to_string());
        let bucket = doc.bucket(category);
        let summary = bucket.map(|b| b.summary.trim()).unwrap_or("");
        if !summary.is_empty() {
            out.push(summary.to_string());
            out.push("".to_string());
        }
        match bucket.filter(|b| !b.evidence.is_empty()) {
            Some(b) => {
                for item in &b.evidence {
                    out.push(format!("- {}", item.trim()));
                }
            }
            None => out.push("- _No evidence recorded._".to_string()),
        }
        out.push("".to_string());
    }
    out.join("\n")
}

/// One row per evidence item: `category,position,evidence` with 1-based positions.
pub fn render_evidence_index_csv(doc: &PortfolioDocument) -> CoreResult<String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(["category", "position", "evidence"])?;
    for category in Category::ALL {
        let Some(bucket) = doc.bucket(category) else {
            continue;
        };
        for (i, item) in bucket.evidence.iter().enumerate() {
            let position = (i + 1).to_string();
            wtr.write_record([category.code(), position.as_str(), item.as_str()])?;
        }
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}
