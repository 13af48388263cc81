use appraisal_core::taxonomy::category::Category;
use appraisal_core::taxonomy::subsections::{
    find_subsection, hardware_default, normalize_subsection, render_reference, subsections_for,
};

#[test]
fn every_category_has_its_subsections() {
    let counts: Vec<usize> = Category::ALL
        .iter()
        .map(|c| subsections_for(*c).count())
        .collect();
    assert_eq!(counts, vec![4, 5, 4, 4, 4, 4]);
    for c in Category::ALL {
        for s in subsections_for(c) {
            assert!(s.code.starts_with(&format!("{}.", c.code())));
        }
    }
}

#[test]
fn subsection_codes_normalize_within_their_category() {
    assert_eq!(normalize_subsection(Category::Gp2, " gp2.3 "), Some("GP2.3"));
    assert_eq!(normalize_subsection(Category::Gp2, "GP 2.5"), Some("GP2.5"));
    assert_eq!(
        normalize_subsection(Category::Gp1, "GP1.2: Curriculum Alignment"),
        Some("GP1.2")
    );
    assert_eq!(normalize_subsection(Category::Gp2, "GP3.1"), None);
    assert_eq!(normalize_subsection(Category::Gp2, "GP2.9"), None);
    assert_eq!(normalize_subsection(Category::Gp2, "2.1"), None);
}

#[test]
fn hardware_defaults_only_exist_for_allowed_categories() {
    let gp1 = hardware_default(Category::Gp1).unwrap();
    let gp2 = hardware_default(Category::Gp2).unwrap();
    assert_eq!(gp1.subsection, "GP1.3");
    assert_eq!(gp2.subsection, "GP2.2");
    assert!(find_subsection(gp1.subsection).is_some());
    for c in Category::HARDWARE_FORBIDDEN {
        assert!(hardware_default(c).is_none());
        assert!(!c.allows_hardware());
    }
}

#[test]
fn category_parsing_and_wire_names() {
    assert_eq!(Category::parse("gp4"), Some(Category::Gp4));
    assert_eq!(Category::parse("6"), Some(Category::Gp6));
    assert_eq!(Category::parse("GP7"), None);
    assert_eq!(Category::from_number(0), None);
    assert_eq!(serde_json::to_string(&Category::Gp3).unwrap(), "\"GP3\"");
    assert_eq!(Category::Gp5.key(), "gp5");
}

#[test]
fn reference_block_names_every_subsection() {
    let text = render_reference();
    assert!(text.contains("GP2.5"));
    assert!(text.contains("GP6.4"));
}
