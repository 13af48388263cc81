use crate::classify::hardware::HardwareVerdict;
use crate::extract::assessment::AssessmentInput;
use crate::extract::attendance::AttendanceInput;
use crate::oracle::prompts::hardware_rule_block;
use crate::taxonomy::category::Category;

const JSON_FOOTER: &str =
    "Return ONLY the JSON object. No markdown, no prose, no code fences.";

fn focus_line(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| format!("{} ({})", c.code(), c.title()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_not_provided(s: &str) -> &str {
    if s.trim().is_empty() {
        "Not provided"
    } else {
        s
    }
}

pub fn lesson_prompt(lesson_text: &str, verdict: &HardwareVerdict) -> String {
    format!(
        r#"Analyze the following lesson plan and extract evidence for the teacher appraisal Guiding Principles GP1-GP6.

Lesson Plan:
{lesson_text}
{hardware}

Instructions:
1. Extract only meaningful, specific evidence that demonstrates each GP.
2. Write clear, professional evidence items (1-3 sentences each).
3. Look for:
   - GP1 ({gp1}): content accuracy, curriculum alignment, subject expertise
   - GP2 ({gp2}): teaching methods, instructional strategies, differentiation
   - GP3 ({gp3}): assessment strategies, formative and summative assessment, feedback
   - GP4 ({gp4}): reflection, professional growth, continuous learning
   - GP5 ({gp5}): parent involvement, community connections, collaboration
   - GP6 ({gp6}): ICT use, digital tools, technology-enhanced learning
4. Also identify strengths and areas for improvement.
5. Hardware content may only ever be classified under GP1 or GP2.

Return a JSON object with this exact structure:
{{
  "gp1": [], "gp2": [], "gp3": [], "gp4": [], "gp5": [], "gp6": [],
  "strengths": [],
  "weaknesses": []
}}

If no evidence is found for a GP, return an empty array for that key.
{footer}"#,
        hardware = hardware_rule_block(verdict, "lesson plan"),
        gp1 = Category::Gp1.title(),
        gp2 = Category::Gp2.title(),
        gp3 = Category::Gp3.title(),
        gp4 = Category::Gp4.title(),
        gp5 = Category::Gp5.title(),
        gp6 = Category::Gp6.title(),
        footer = JSON_FOOTER,
    )
}

pub fn journal_prompt(entry_text: &str) -> String {
    format!(
        r#"Analyze the following log book entry and extract evidence for {focus}.

Log Book Entry:
{entry_text}

Instructions:
1. Identify evidence of student behaviour and diversity (GP3), teacher reflection, professional growth, ethical conduct, punctuality and leadership (GP4), and technology integration (GP6).
2. Convert the entry into formal, professional evidence statements (1-3 sentences each).
3. Provide a brief 2-3 sentence summary of the entry.

Return a JSON object with this exact structure:
{{
  "mappedGP": [
    {{"gp": 3, "evidence": "evidence statement"}}
  ],
  "summary": "2-3 sentence overview of the entry"
}}

Only use GP numbers 3, 4 or 6, and only where meaningful evidence exists.
{footer}"#,
        focus = focus_line(&[Category::Gp3, Category::Gp4, Category::Gp6]),
        footer = JSON_FOOTER,
    )
}

pub fn attendance_prompt(input: &AttendanceInput) -> String {
    let pct = |v: Option<f64>| v.map(|p| format!("{}%", p)).unwrap_or_else(|| "N/A".to_string());
    format!(
        r#"Analyze the following attendance register data and extract evidence for {focus}.

Attendance Data:
- Attendance Percentage: {attendance}
- Punctuality Percentage: {punctuality}
- Date Range: {date_range}
- Notes on Absences: {notes}
- Follow-ups Done: {follow_ups}

Instructions:
1. Identify follow-ups with absent students, punctuality patterns and interventions, class behaviour trends and welfare concerns addressed (GP3).
2. Identify use of technology for attendance tracking and parent communication (GP6).
3. Detect patterns in attendance, punctuality and behaviour, and recommend interventions.
4. Write clear, professional evidence statements (1-3 sentences each).

Return a JSON object with this exact structure:
{{
  "gp3": [],
  "gp6": [],
  "patternsDetected": [],
  "recommendedInterventions": []
}}

{footer}"#,
        focus = focus_line(&[Category::Gp3, Category::Gp6]),
        attendance = pct(input.attendance_percentage),
        punctuality = pct(input.punctuality_percentage),
        date_range = or_not_provided(&input.date_range),
        notes = input.notes.join("; "),
        follow_ups = input.follow_ups.join("; "),
        footer = JSON_FOOTER,
    )
}

pub fn assessment_prompt(input: &AssessmentInput) -> String {
    let grades = if input.grade_distribution.is_empty() {
        "Not provided".to_string()
    } else {
        serde_json::to_string_pretty(&input.grade_distribution)
            .unwrap_or_else(|_| "Not provided".to_string())
    };
    let diagnostics = if input.diagnostic_results.is_empty() {
        "Not provided".to_string()
    } else {
        serde_json::to_string_pretty(&input.diagnostic_results)
            .unwrap_or_else(|_| "Not provided".to_string())
    };
    format!(
        r#"Analyze the following assessment data and extract evidence for {focus}.

Assessment Description:
{description}

Grade Distribution:
{grades}

Total Students: {total}
Average Score: {average}

Diagnostic Results:
{diagnostics}

Instructions:
1. Identify differentiation strategies and assessment design and alignment (GP2).
2. Identify learning gaps, feedback mechanisms and student performance analysis (GP3).
3. Identify strengths, areas needing intervention and student groups needing extra support.
4. Write clear, professional evidence statements (1-3 sentences each).

Return a JSON object with this exact structure:
{{
  "gp2": [],
  "gp3": [],
  "performanceBreakdown": {{
    "strengths": [],
    "areasNeedingIntervention": [],
    "recommendedStudentGroups": []
  }},
  "recommendedActions": []
}}

{footer}"#,
        focus = focus_line(&[Category::Gp2, Category::Gp3]),
        description = or_not_provided(&input.description),
        total = input
            .total_students
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        average = input
            .average_score
            .map(|s| format!("{}%", s))
            .unwrap_or_else(|| "N/A".to_string()),
        footer = JSON_FOOTER,
    )
}
