use crate::oracle::response::truncate_chars;
use crate::report::model::AppraisalInput;
use crate::taxonomy::category::Category;

const SAMPLE_ITEMS: usize = 3;
const SAMPLE_CHARS: usize = 100;

fn pct(v: Option<f64>) -> String {
    v.map(|p| format!("{}%", p)).unwrap_or_else(|| "N/A".to_string())
}

fn evidence_section(input: &AppraisalInput) -> String {
    let mut out = String::from("GP EVIDENCE:\n");
    for category in Category::ALL {
        let items = input.gp_evidence.get(category);
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("{}: {} evidence items\n", category.code(), items.len()));
        for item in items.iter().take(SAMPLE_ITEMS) {
            out.push_str(&format!("  - {}...\n", truncate_chars(item, SAMPLE_CHARS)));
        }
    }
    out
}

pub fn appraisal_report_prompt(input: &AppraisalInput) -> String {
    let attendance = &input.attendance_patterns;
    let lessons = &input.lesson_plan_quality;
    let trends = &input.class_performance_trends;
    let recent_pd = input
        .professional_development
        .iter()
        .take(SAMPLE_ITEMS)
        .map(|pd| {
            if pd.title.trim().is_empty() {
                "N/A".to_string()
            } else {
                truncate_chars(&pd.title, 50)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let lesson_average = lessons
        .average_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let trend = if trends.trend.trim().is_empty() {
        "N/A"
    } else {
        trends.trend.as_str()
    };

    format!(
        r#"You are generating a comprehensive teacher appraisal report against the six Guiding Principles.

{evidence}
ATTENDANCE PATTERNS:
- Overall Attendance: {overall}
- Punctuality: {punctuality}
- Follow-ups Conducted: {follow_ups}

PROFESSIONAL DEVELOPMENT:
- Activities: {pd_count} recorded
- Recent PD: {recent_pd}

LESSON PLAN QUALITY:
- Total Lessons: {total_lessons}
- Average Quality Score: {lesson_average}
- Evidence Items: {lesson_evidence}

CLASS PERFORMANCE TRENDS:
- Average Assessment Score: {class_average}
- Improvement Trend: {trend}
- Students Meeting Standards: {meeting}

Instructions:
1. Score each GP (GP1-GP6) on a 0-100 scale based on the quantity and quality of evidence, alignment with the GP criteria, impact on student learning, professional growth demonstrated, and consistency of practice.
2. Determine the overall category from the average score:
   - Exemplary: 90-100 average
   - Area of Strength: 75-89 average
   - Area for Improvement: 60-74 average
   - Unsatisfactory: below 60 average
3. Identify key strengths across all GPs.
4. Identify areas needing improvement.
5. Provide specific, actionable recommendations.
6. Create a future action plan with prioritized steps.

Return a JSON object with this exact structure:
{{
  "scores": {{"gp1": 0, "gp2": 0, "gp3": 0, "gp4": 0, "gp5": 0, "gp6": 0}},
  "category": "Area of Strength",
  "strengths": [],
  "weaknesses": [],
  "recommendations": [],
  "actionPlan": [
    {{"priority": "high", "action": "action description", "timeline": "timeline description"}}
  ]
}}

Return ONLY the JSON object. No markdown, no prose, no code fences."#,
        evidence = evidence_section(input),
        overall = pct(attendance.overall_attendance),
        punctuality = pct(attendance.punctuality),
        follow_ups = attendance.follow_ups_count,
        pd_count = input.professional_development.len(),
        recent_pd = if recent_pd.is_empty() { "None" } else { recent_pd.as_str() },
        total_lessons = lessons.total_lessons,
        lesson_average = lesson_average,
        lesson_evidence = lessons.evidence_count,
        class_average = pct(trends.average_score),
        trend = trend,
        meeting = pct(trends.meeting_standards),
    )
}
