use super::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subsection {
    pub category: Category,
    pub code: &'static str,
    pub title: &'static str,
}

const fn sub(category: Category, code: &'static str, title: &'static str) -> Subsection {
    Subsection {
        category,
        code,
        title,
    }
}

static SUBSECTIONS: &[Subsection] = &[
    sub(Category::Gp1, "GP1.1", "Content Accuracy and Depth"),
    sub(Category::Gp1, "GP1.2", "Curriculum Alignment"),
    sub(Category::Gp1, "GP1.3", "Subject Expertise Demonstration"),
    sub(Category::Gp1, "GP1.4", "Content Organization and Structure"),
    sub(Category::Gp2, "GP2.1", "Curriculum Alignment and Planning"),
    sub(Category::Gp2, "GP2.2", "Teaching Strategies and Methods"),
    sub(Category::Gp2, "GP2.3", "Use of Assessment in Teaching"),
    sub(Category::Gp2, "GP2.4", "Differentiation and Individualization"),
    sub(Category::Gp2, "GP2.5", "Learning Environment Management"),
    sub(Category::Gp3, "GP3.1", "Assessment Design and Implementation"),
    sub(Category::Gp3, "GP3.2", "Feedback to Students"),
    sub(Category::Gp3, "GP3.3", "Use of Assessment Data"),
    sub(Category::Gp3, "GP3.4", "Student Progress Monitoring"),
    sub(Category::Gp4, "GP4.1", "Reflective Practice"),
    sub(Category::Gp4, "GP4.2", "Professional Growth Activities"),
    sub(Category::Gp4, "GP4.3", "Collaboration with Colleagues"),
    sub(Category::Gp4, "GP4.4", "Ethical Conduct and Professionalism"),
    sub(Category::Gp5, "GP5.1", "Parent/Guardian Communication"),
    sub(Category::Gp5, "GP5.2", "Community Involvement"),
    sub(Category::Gp5, "GP5.3", "School-Community Partnerships"),
    sub(Category::Gp5, "GP5.4", "Student Welfare and Support"),
    sub(Category::Gp6, "GP6.1", "Use of ICT in Teaching"),
    sub(Category::Gp6, "GP6.2", "Digital Tools and Resources"),
    sub(Category::Gp6, "GP6.3", "Technology-Enhanced Learning"),
    sub(Category::Gp6, "GP6.4", "Digital Literacy Development"),
];

/// Canonical assignment used when hardware evidence has no usable GP1/GP2 content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareDefault {
    pub subsection: &'static str,
    pub justification: &'static str,
    pub statement: &'static str,
}

pub fn subsections_for(category: Category) -> impl Iterator<Item = &'static Subsection> {
    SUBSECTIONS.iter().filter(move |s| s.category == category)
}

pub fn find_subsection(code: &str) -> Option<&'static Subsection> {
    SUBSECTIONS.iter().find(|s| s.code == code)
}

/// Maps an oracle-supplied code onto the canonical code of a subsection of `category`.
///
/// Tolerates case, surrounding whitespace, a space after "GP" and a trailing title
/// ("gp2.1: Curriculum Alignment"). Codes from another category yield `None`.
pub fn normalize_subsection(category: Category, raw: &str) -> Option<&'static str> {
    let upper = raw.trim().to_ascii_uppercase();
    let rest = upper.strip_prefix("GP")?.trim_start();
    let numeric: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let candidate = format!("GP{}", numeric.trim_end_matches('.'));
    find_subsection(&candidate)
        .filter(|s| s.category == category)
        .map(|s| s.code)
}

pub fn hardware_default(category: Category) -> Option<HardwareDefault> {
    match category {
        Category::Gp1 => Some(HardwareDefault {
            subsection: "GP1.3",
            justification: "Evidence demonstrates technical knowledge of computer hardware components.",
            statement: "Evidence demonstrates technical knowledge of computer hardware components and their functions.",
        }),
        Category::Gp2 => Some(HardwareDefault {
            subsection: "GP2.2",
            justification: "Evidence shows use of computer hardware in teaching activities.",
            statement: "Evidence shows use of hardware images or components in teaching activities and lesson strategies.",
        }),
        _ => None,
    }
}

/// Subsection reference block embedded in the classification prompt.
pub fn render_reference() -> String {
    let mut out = Vec::new();
    for category in Category::ALL {
        out.push(format!("{} - {}:", category.code(), category.title()));
        for s in subsections_for(category) {
            out.push(format!("  {}: {}", s.code, s.title));
        }
        out.push(String::new());
    }
    out.join("\n").trim_end().to_string()
}
