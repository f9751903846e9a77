use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between question text and correct answer when
/// building a uniqueness key. Not expected to occur in question text.
pub const KEY_SEPARATOR: char = '|';

// ------------------------------------------------------------
// Question kind
// ------------------------------------------------------------
//
// Serialized under the `type` key, matching the remote payload.
//
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Four answers, one correct
    Multiple,

    /// True / False
    Boolean,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Multiple => "multiple",
            QuestionKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------------------------------------
// Difficulty
// ------------------------------------------------------------
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Report order for per-difficulty sections.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------------------------------------
// Question record
// ------------------------------------------------------------
//
// One trivia question exactly as delivered by the remote API.
//
// The source provides no identifier. Identity is derived from
// the (question, correct_answer) pair, see `QuestionRecord::key`.
//
// Text fields are kept verbatim (the API HTML-encodes them), so
// keys stay stable across runs.
//
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    pub difficulty: Difficulty,

    /// Free-text category label (e.g. "Science: Computers")
    pub category: String,

    pub question: String,

    pub correct_answer: String,

    /// Order is preserved as received
    pub incorrect_answers: Vec<String>,
}

impl QuestionRecord {
    /// Uniqueness key: `question|correct_answer`.
    pub fn key(&self) -> String {
        let mut key =
            String::with_capacity(self.question.len() + self.correct_answer.len() + 1);
        key.push_str(&self.question);
        key.push(KEY_SEPARATOR);
        key.push_str(&self.correct_answer);
        key
    }
}

// ------------------------------------------------------------
// Remote response envelope
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone)]
pub struct ApiResponse {
    pub response_code: u32,

    #[serde(default)]
    pub results: Vec<QuestionRecord>,
}

/// Meaning of the remote `response_code` field.
///
/// Only `Success` yields records. Everything else is treated as
/// "no records this time" by the fetch client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimited,
    Unknown(u32),
}

impl From<u32> for ResponseCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimited,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Success => f.write_str("0 (success)"),
            ResponseCode::NoResults => f.write_str("1 (not enough questions for query)"),
            ResponseCode::InvalidParameter => f.write_str("2 (invalid parameter)"),
            ResponseCode::TokenNotFound => f.write_str("3 (session token not found)"),
            ResponseCode::TokenEmpty => f.write_str("4 (session token exhausted)"),
            ResponseCode::RateLimited => f.write_str("5 (rate limited)"),
            ResponseCode::Unknown(code) => write!(f, "{code} (unknown)"),
        }
    }
}

// ------------------------------------------------------------
// Persisted collection
// ------------------------------------------------------------
//
// On-disk layout shared by the collector (read + write) and the
// analyzer (read only).
//
// `total_unique` is written from the index length at save time
// and never tracked on its own.
//
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizCollection {
    pub total_unique: usize,

    /// ISO-8601 UTC timestamp of the last successful save
    pub last_updated: String,

    pub quizzes: Vec<QuestionRecord>,
}
