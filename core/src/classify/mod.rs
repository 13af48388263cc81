pub mod coerce;
pub mod engine;
pub mod enforcement;
pub mod hardware;
pub mod result;
