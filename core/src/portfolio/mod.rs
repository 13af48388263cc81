pub mod aggregate;
pub mod builder;
pub mod lenient;
pub mod model;
pub mod normalize;
pub mod sources;
