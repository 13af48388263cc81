pub mod category;
pub mod subsections;
