//! External evaluation service integration

pub mod evaluator;
pub mod prompts;
