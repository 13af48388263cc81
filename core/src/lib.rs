pub mod adapters;
pub mod audit;
pub mod classify;
pub mod config;
pub mod determinism;
pub mod extract;
pub mod oracle;
pub mod portfolio;
pub mod render;
pub mod report;
pub mod run;
pub mod storage;
pub mod taxonomy;

pub mod error;
