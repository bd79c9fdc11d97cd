//! Report rendering: console, JSON and Markdown

pub mod formatter;
pub mod labels;
