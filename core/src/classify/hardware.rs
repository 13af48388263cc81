use crate::taxonomy::category::Category;
use serde::{Deserialize, Serialize};

/// Keyword sets driving hardware detection.
///
/// The vocabulary is configuration; the mechanism (two category-signalling sets, one
/// generic set, teaching context winning ties) is fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HardwareVocabulary {
    /// Technical identification phrases, signalling GP1.
    pub technical: Vec<String>,
    /// Teaching-activity phrases, signalling GP2.
    pub teaching: Vec<String>,
    /// Hardware nouns that mark content as hardware without preferring a category.
    pub generic: Vec<String>,
}

impl Default for HardwareVocabulary {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            technical: owned(&[
                "identify the ports",
                "computer ports",
                "computer port",
                "usb port",
                "hdmi",
                "vga",
                "hardware components",
                "motherboard",
                "technical analysis",
                "explain how this component works",
                "internal components",
                "cables",
                "component identification",
                "technical explanation",
                "hardware analysis",
                "port identification",
                "computer hardware",
                "hardware diagram",
                "component diagram",
            ]),
            teaching: owned(&[
                "lesson",
                "lesson activity",
                "students",
                "students will",
                "activity",
                "assignment",
                "teach",
                "teaching",
                "classwork",
                "practice exercise",
                "group work",
                "use this image to teach",
                "teaching strategy",
                "ict",
                "demonstration",
                "student task",
            ]),
            generic: owned(&[
                "port",
                "ports",
                "usb",
                "hdmi",
                "vga",
                "dvi",
                "ethernet",
                "motherboard",
                "cpu",
                "ram",
                "hardware",
                "component",
                "components",
                "cable",
                "cables",
                "connector",
                "connectors",
                "socket",
                "sockets",
            ]),
        }
    }
}

impl HardwareVocabulary {
    /// True when `text` mentions any generic hardware noun.
    pub fn mentions_hardware_noun(&self, text: &str) -> bool {
        let haystack = token_padded(text);
        self.generic.iter().any(|kw| contains_phrase(&haystack, kw))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HardwareVerdict {
    pub is_hardware: bool,
    pub suggested_category: Option<Category>,
    pub technical_matches: Vec<String>,
    pub teaching_matches: Vec<String>,
}

impl HardwareVerdict {
    pub fn not_hardware() -> Self {
        Self::default()
    }

    /// Category the hardware override falls back to; GP1 when nothing better is known.
    pub fn fallback_category(&self) -> Category {
        self.suggested_category
            .filter(|c| c.allows_hardware())
            .unwrap_or(Category::Gp1)
    }
}

/// Decides whether `text` is about computer hardware and which permitted category it leans to.
///
/// Matching is a case-insensitive substring search anchored at the start of a word, so
/// "motherboard" matches "Motherboards" and "cpu" matches "CPUs" while "port" never fires
/// inside "supports". Teaching phrases only pick the category; on their own they never
/// mark text as hardware.
pub fn detect_hardware(text: &str, vocabulary: &HardwareVocabulary) -> HardwareVerdict {
    let haystack = token_padded(text);
    let technical_matches = matches_in(&haystack, &vocabulary.technical);
    let teaching_matches = matches_in(&haystack, &vocabulary.teaching);
    let generic_hit = vocabulary
        .generic
        .iter()
        .any(|kw| contains_phrase(&haystack, kw));

    let is_hardware = !technical_matches.is_empty() || generic_hit;
    let suggested_category = if !is_hardware {
        None
    } else if !teaching_matches.is_empty() {
        Some(Category::Gp2)
    } else {
        Some(Category::Gp1)
    };

    HardwareVerdict {
        is_hardware,
        suggested_category,
        technical_matches,
        teaching_matches,
    }
}

fn matches_in(haystack: &str, keywords: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for kw in keywords {
        if contains_phrase(haystack, kw) && !found.iter().any(|f| f == kw) {
            found.push(kw.clone());
        }
    }
    found
}

fn contains_phrase(haystack: &str, keyword: &str) -> bool {
    let needle = keyword_needle(keyword);
    if needle.trim().is_empty() {
        return false;
    }
    haystack.contains(&needle)
}

// Padded only in front: the keyword must start a word but may run on into an
// inflection ("cable" in "cables", "socket" in "sockets").
fn keyword_needle(keyword: &str) -> String {
    let mut needle = token_padded(keyword);
    if needle.len() > 1 {
        needle.pop();
    }
    needle
}

// Lower-cases, collapses every run of non-alphanumerics into one space and pads both ends,
// so a phrase lookup becomes a plain substring search on token boundaries.
fn token_padded(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut at_gap = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            at_gap = false;
        } else if !at_gap {
            out.push(' ');
            at_gap = true;
        }
    }
    if !at_gap {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{contains_phrase, keyword_needle, token_padded};

    #[test]
    fn token_padding_collapses_punctuation() {
        assert_eq!(token_padded("USB-port, HDMI!"), " usb port hdmi ");
        assert_eq!(token_padded(""), " ");
        assert_eq!(token_padded("  ...  "), " ");
    }

    #[test]
    fn needle_is_anchored_at_word_start_only() {
        assert_eq!(keyword_needle("USB port"), " usb port");
        assert_eq!(keyword_needle("  "), " ");
        let haystack = token_padded("Two USB-ports and the motherboards.");
        assert!(contains_phrase(&haystack, "usb port"));
        assert!(contains_phrase(&haystack, "motherboard"));
        assert!(!contains_phrase(&haystack, "board"));
    }
}
