//! Text processing and analysis module

pub mod analyzer;
pub mod keywords;
pub mod mistakes;
pub mod similarity;
pub mod text_processor;
