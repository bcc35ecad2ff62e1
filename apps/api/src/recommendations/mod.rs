// Recommendation pipeline: context → prompt → LLM → parse → persist.

pub mod context;
pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompt;
pub mod prompts;
pub mod tone;
