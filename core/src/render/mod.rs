pub mod portfolio;
pub mod report;
