//! What a caller asks for when generating a course, and the prompt built from it.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Target length of the generated course, in words. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCount(u32);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("number_of_words must be a positive integer or a string of digits")]
pub struct InvalidWordCount;

impl WordCount {
    pub fn new(words: u32) -> Result<Self, InvalidWordCount> {
        if words == 0 {
            return Err(InvalidWordCount);
        }
        Ok(Self(words))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Accepts a JSON integer, or a string of ASCII digits (surrounding
    /// whitespace ignored). Everything else is rejected: floats, negatives,
    /// zero, booleans, signs, empty strings.
    pub fn from_json(value: &Value) -> Result<Self, InvalidWordCount> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(InvalidWordCount)
                .and_then(Self::new),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(InvalidWordCount);
                }
                s.parse::<u32>()
                    .map_err(|_| InvalidWordCount)
                    .and_then(Self::new)
            }
            _ => Err(InvalidWordCount),
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseBrief {
    pub description: String,
    pub word_count: WordCount,
    pub learner_type: String,
}

impl CourseBrief {
    /// The instruction sent to the provider as the user message.
    pub fn prompt(&self) -> String {
        format!(
            "{} in {} words write the course for {}.",
            self.description, self.word_count, self.learner_type
        )
    }
}
