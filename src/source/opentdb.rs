use std::time::Duration;

use reqwest::Client;

use crate::{
    config::ApiConfig,
    schema::{ApiResponse, QuestionRecord, ResponseCode},
};

use super::{FetchError, QuizSource};

/// Open Trivia Database adapter.
///
/// Issues `GET {url}?amount={batch_size}` and returns the `results`
/// array when `response_code` is 0.
///
/// ERROR HANDLING:
/// - Transport failures, non-2xx statuses, undecodable bodies and
///   nonzero response codes all yield an empty batch
/// - Each failure is logged once at warn level
pub struct OpenTdbSource {
    client: Client,
    endpoint: String,
}

impl OpenTdbSource {
    pub fn new(cfg: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, cfg))
    }

    /// Use a preconfigured client. `cfg.timeout_secs` is ignored.
    pub fn with_client(client: Client, cfg: &ApiConfig) -> Self {
        Self {
            client,
            endpoint: endpoint_url(&cfg.url, cfg.batch_size),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_fetch(&self) -> Result<Vec<QuestionRecord>, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: ApiResponse = response.json().await?;
        match ResponseCode::from(body.response_code) {
            ResponseCode::Success => Ok(body.results),
            code => Err(FetchError::Api(code)),
        }
    }
}

#[async_trait::async_trait]
impl QuizSource for OpenTdbSource {
    fn name(&self) -> &str {
        "opentdb"
    }

    async fn fetch_batch(&self) -> Vec<QuestionRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("[{}] fetch failed: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Append the batch size as the `amount` query parameter.
fn endpoint_url(base: &str, batch_size: u32) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}amount={batch_size}")
}
