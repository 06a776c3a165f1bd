//! crashnotes-core: generation orchestration, parsing, caching and quizzes.
//!
//! This crate holds everything that has real behaviour: the model fallback
//! client, the tolerant response parser, the bounded recent-topics cache and
//! the headless state machines behind the course page and the quiz.

pub mod course;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod quiz;
pub mod recent;
pub mod store;
pub mod traits;
