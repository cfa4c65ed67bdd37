//! Domain models for the course service.

pub mod course;

pub use course::{CourseBrief, InvalidWordCount, WordCount};
