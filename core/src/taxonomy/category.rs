use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six Guiding Principles evidence is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GP1")]
    Gp1,
    #[serde(rename = "GP2")]
    Gp2,
    #[serde(rename = "GP3")]
    Gp3,
    #[serde(rename = "GP4")]
    Gp4,
    #[serde(rename = "GP5")]
    Gp5,
    #[serde(rename = "GP6")]
    Gp6,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Gp1,
        Category::Gp2,
        Category::Gp3,
        Category::Gp4,
        Category::Gp5,
        Category::Gp6,
    ];

    /// Categories hardware-related evidence may land in.
    pub const HARDWARE_ALLOWED: [Category; 2] = [Category::Gp1, Category::Gp2];

    /// Categories hardware-related evidence is never assigned to.
    pub const HARDWARE_FORBIDDEN: [Category; 4] =
        [Category::Gp3, Category::Gp4, Category::Gp5, Category::Gp6];

    pub fn number(self) -> u8 {
        match self {
            Category::Gp1 => 1,
            Category::Gp2 => 2,
            Category::Gp3 => 3,
            Category::Gp4 => 4,
            Category::Gp5 => 5,
            Category::Gp6 => 6,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Category::Gp1 => "GP1",
            Category::Gp2 => "GP2",
            Category::Gp3 => "GP3",
            Category::Gp4 => "GP4",
            Category::Gp5 => "GP5",
            Category::Gp6 => "GP6",
        }
    }

    /// Lower-case key used by the portfolio wire format ("gp1".."gp6").
    pub fn key(self) -> &'static str {
        match self {
            Category::Gp1 => "gp1",
            Category::Gp2 => "gp2",
            Category::Gp3 => "gp3",
            Category::Gp4 => "gp4",
            Category::Gp5 => "gp5",
            Category::Gp6 => "gp6",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Gp1 => "Subject Content Knowledge",
            Category::Gp2 => "Pedagogy & Teaching Strategies",
            Category::Gp3 => "Student Assessment & Feedback",
            Category::Gp4 => "Professional Development",
            Category::Gp5 => "Community Engagement",
            Category::Gp6 => "Technology Integration",
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Category::Gp1),
            2 => Some(Category::Gp2),
            3 => Some(Category::Gp3),
            4 => Some(Category::Gp4),
            5 => Some(Category::Gp5),
            6 => Some(Category::Gp6),
            _ => None,
        }
    }

    /// Accepts "GP3", "gp3", "Gp 3" or a bare "3".
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let digits = compact.strip_prefix("GP").unwrap_or(&compact);
        digits.parse::<i64>().ok().and_then(Category::from_number)
    }

    pub fn allows_hardware(self) -> bool {
        Category::HARDWARE_ALLOWED.contains(&self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn parse_accepts_codes_keys_and_numbers() {
        assert_eq!(Category::parse("GP3"), Some(Category::Gp3));
        assert_eq!(Category::parse(" gp6 "), Some(Category::Gp6));
        assert_eq!(Category::parse("Gp 2"), Some(Category::Gp2));
        assert_eq!(Category::parse("4"), Some(Category::Gp4));
        assert_eq!(Category::parse("GP7"), None);
        assert_eq!(Category::parse("technology"), None);
    }
}
