use crate::classify::hardware::HardwareVerdict;
use crate::taxonomy::category::Category;
use crate::taxonomy::subsections::render_reference;

const JSON_ONLY_PREAMBLE: &str = "You are an AI that must ONLY output strict JSON.\n\nNever include explanations, markdown, or additional text.";

const JSON_ONLY_FOOTER: &str =
    "IMPORTANT: Return ONLY the JSON object. No markdown, no prose, no code fences.";

/// Rule block appended to prompts when the hardware detector fired.
///
/// `subject` names what is being analyzed ("text", "lesson plan").
pub fn hardware_rule_block(verdict: &HardwareVerdict, subject: &str) -> String {
    if !verdict.is_hardware {
        return String::new();
    }
    let suggested = verdict
        .suggested_category
        .map(|c| c.code().to_string())
        .unwrap_or_else(|| "None".to_string());
    let forbidden = Category::HARDWARE_FORBIDDEN
        .iter()
        .map(|c| format!("{} ({})", c.code(), c.title()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"

HARDWARE CLASSIFICATION RULE (MANDATORY):
The {subject} contains computer hardware content (ports, components, cables, motherboards and similar).
- It is FORBIDDEN to classify this content under {forbidden}.
- It may ONLY be classified under GP1 ({gp1}) or GP2 ({gp2}).

Guidelines:
- Technical identification of hardware, explanation of components or technical analysis -> GP1
- A lesson activity, student task or teaching strategy that uses the hardware -> GP2
- When both technical and teaching elements are present -> prefer GP2

Suggested classification from keyword analysis: {suggested}
"#,
        gp1 = Category::Gp1.title(),
        gp2 = Category::Gp2.title(),
    )
}

fn classification_schema() -> String {
    let body = Category::ALL
        .iter()
        .map(|c| {
            format!(
                "  \"{}\": {{\n    \"subsections\": [],\n    \"justifications\": {{}}\n  }}",
                c.code()
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{}\n}}", body)
}

/// Per-item classification prompt covering the full taxonomy with subsections.
pub fn classification_prompt(text: &str, verdict: &HardwareVerdict) -> String {
    format!(
        r#"{preamble}

Required JSON structure:
{schema}

Analyze the following text taken from teacher evidence (a lesson plan, a photographed classroom artifact, a certificate, student work or similar).

Text:
{text}
{hardware}

GP Subsection Reference:
{reference}

Instructions:
1. Match the evidence to GP categories (GP1-GP6) and to their subsections (for example GP2.1, GP3.4).
2. For every matching subsection:
   - add its code to that category's "subsections" array;
   - add a one-sentence justification under the same code in "justifications".
3. Only include subsections the text clearly supports.
4. Leave "subsections" empty and "justifications" empty for any GP without evidence.
5. Hardware content may only ever appear under GP1 or GP2.

{footer}"#,
        preamble = JSON_ONLY_PREAMBLE,
        schema = classification_schema(),
        hardware = hardware_rule_block(verdict, "text"),
        reference = render_reference(),
        footer = JSON_ONLY_FOOTER,
    )
}

fn summarization_schema() -> String {
    let mut lines: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("  \"{}\": {{ \"evidence\": [], \"summary\": \"\" }},", c.key()))
        .collect();
    lines.push("  \"overall_summary\": \"\"".to_string());
    format!("{{\n{}\n}}", lines.join("\n"))
}

/// Portfolio summarization prompt; `evidence_json` holds the pre-bucketed evidence.
pub fn summarization_prompt(evidence_json: &str) -> String {
    format!(
        r#"{preamble}

Required JSON structure:
{schema}

Organize the teacher evidence below into the JSON structure above.
For each GP keep the evidence statements that belong to it and write a short narrative "summary".
Write an "overall_summary" describing the portfolio as a whole.
If a GP has no evidence, return an empty array and an empty summary for it.

Evidence data:
{evidence_json}

{footer}"#,
        preamble = JSON_ONLY_PREAMBLE,
        schema = summarization_schema(),
        footer = JSON_ONLY_FOOTER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::hardware::HardwareVerdict;

    #[test]
    fn rule_block_is_empty_for_non_hardware() {
        assert!(hardware_rule_block(&HardwareVerdict::not_hardware(), "text").is_empty());
    }

    #[test]
    fn classification_schema_lists_every_category() {
        let schema = classification_schema();
        for c in Category::ALL {
            assert!(schema.contains(&format!("\"{}\"", c.code())));
        }
    }
}
