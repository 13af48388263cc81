//! Appraisal report: one oracle call scores every category from the gathered evidence
//! and the supporting summaries (attendance, development, lesson quality, results).

pub mod generator;
pub mod model;
pub mod prompt;
