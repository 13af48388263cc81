#[cfg(feature = "http-oracle")]
pub mod http;
pub mod interface;
pub mod runtime;
