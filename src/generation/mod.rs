//! Answer generation: prompts, query classification, and composition

mod composer;
mod prompt;

pub use composer::{is_casual_query, AnswerComposer, LlmErrorKind};
pub use prompt::PromptBuilder;
