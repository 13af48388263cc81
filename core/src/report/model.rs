use crate::oracle::response::OracleFailure;
use crate::portfolio::lenient;
use crate::portfolio::model::PortfolioDocument;
use crate::taxonomy::category::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Evidence lists per category, keyed `gp1`..`gp6` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpEvidence {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp1: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp2: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp3: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp4: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp5: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gp6: Vec<String>,
}

impl GpEvidence {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Gp1 => &self.gp1,
            Category::Gp2 => &self.gp2,
            Category::Gp3 => &self.gp3,
            Category::Gp4 => &self.gp4,
            Category::Gp5 => &self.gp5,
            Category::Gp6 => &self.gp6,
        }
    }

    /// Takes the organized evidence of a stored portfolio.
    pub fn from_portfolio(doc: &PortfolioDocument) -> Self {
        let take = |c: Category| doc.bucket(c).map(|b| b.evidence.clone()).unwrap_or_default();
        Self {
            gp1: take(Category::Gp1),
            gp2: take(Category::Gp2),
            gp3: take(Category::Gp3),
            gp4: take(Category::Gp4),
            gp5: take(Category::Gp5),
            gp6: take(Category::Gp6),
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendancePatterns {
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_attendance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub punctuality: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub follow_ups_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentActivity {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonPlanQuality {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_lessons: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub average_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub evidence_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrends {
    #[serde(default, deserialize_with = "lenient::number")]
    pub average_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub trend: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meeting_standards: Option<f64>,
}

/// Everything the report prompt summarizes. Wrong-typed fields become empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppraisalInput {
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub gp_evidence: GpEvidence,
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub attendance_patterns: AttendancePatterns,
    #[serde(default, deserialize_with = "lenient::items")]
    pub professional_development: Vec<DevelopmentActivity>,
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub lesson_plan_quality: LessonPlanQuality,
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub class_performance_trends: PerformanceTrends,
}

impl AppraisalInput {
    pub fn from_json_value(v: Value) -> Self {
        serde_json::from_value(v).unwrap_or_default()
    }
}

/// Overall rating, banded on the average category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingBand {
    #[serde(rename = "Exemplary")]
    Exemplary,
    #[serde(rename = "Area of Strength")]
    AreaOfStrength,
    #[serde(rename = "Area for Improvement")]
    AreaForImprovement,
    #[serde(rename = "Unsatisfactory")]
    Unsatisfactory,
}

impl RatingBand {
    pub const ALL: [RatingBand; 4] = [
        RatingBand::Exemplary,
        RatingBand::AreaOfStrength,
        RatingBand::AreaForImprovement,
        RatingBand::Unsatisfactory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatingBand::Exemplary => "Exemplary",
            RatingBand::AreaOfStrength => "Area of Strength",
            RatingBand::AreaForImprovement => "Area for Improvement",
            RatingBand::Unsatisfactory => "Unsatisfactory",
        }
    }

    /// 90+ exemplary, 75-89 strength, 60-74 improvement, below 60 unsatisfactory.
    pub fn from_average(average: f64) -> Self {
        if average >= 90.0 {
            RatingBand::Exemplary
        } else if average >= 75.0 {
            RatingBand::AreaOfStrength
        } else if average >= 60.0 {
            RatingBand::AreaForImprovement
        } else {
            RatingBand::Unsatisfactory
        }
    }

    /// Matches a label ignoring case, spacing and underscores.
    pub fn parse(raw: &str) -> Option<Self> {
        let squash = |s: &str| -> String {
            s.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = squash(raw);
        RatingBand::ALL
            .into_iter()
            .find(|band| squash(band.label()) == wanted)
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub action: String,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalReport {
    /// 0..=100 per category; all six are always present.
    pub scores: BTreeMap<Category, u8>,
    /// `None` only on the fallback report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<RatingBand>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub action_plan: Vec<ActionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OracleFailure>,
}

impl AppraisalReport {
    /// Zero scores, no band, no findings.
    pub fn empty() -> Self {
        Self {
            scores: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            band: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recommendations: Vec::new(),
            action_plan: Vec::new(),
            failure: None,
        }
    }

    pub fn failed(failure: OracleFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::empty()
        }
    }

    pub fn score(&self, category: Category) -> u8 {
        self.scores.get(&category).copied().unwrap_or(0)
    }

    pub fn average_score(&self) -> f64 {
        let total: u32 = Category::ALL.iter().map(|c| u32::from(self.score(*c))).sum();
        f64::from(total) / Category::ALL.len() as f64
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}
