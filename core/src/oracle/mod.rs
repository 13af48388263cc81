pub mod prompts;
pub mod response;
