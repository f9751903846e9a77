//! Question sources
//!
//! The polling loop talks to the network only through the
//! `QuizSource` trait. `OpenTdbSource` is the production adapter;
//! tests plug in scripted sources.

pub mod opentdb;

use reqwest::StatusCode;
use thiserror::Error;

use crate::schema::{QuestionRecord, ResponseCode};

pub use opentdb::OpenTdbSource;

/// Why a single fetch produced no records.
///
/// Never leaves a source: `fetch_batch` collapses it into an empty
/// batch plus a log line.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error, status {0}")]
    Status(StatusCode),
    #[error("API error, response_code {0}")]
    Api(ResponseCode),
}

/// A remote that hands out batches of trivia questions.
///
/// CONTRACT:
/// - One call performs at most one request
/// - Returns zero or more records, never an error
/// - An empty result means "nothing usable this time" (failure,
///   quota, exhaustion); the caller decides whether to retry
///
/// THREAD SAFETY:
/// - Must be Send + Sync, the instance is shared via `Arc`
///
#[async_trait::async_trait]
pub trait QuizSource: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &str;

    async fn fetch_batch(&self) -> Vec<QuestionRecord>;
}
