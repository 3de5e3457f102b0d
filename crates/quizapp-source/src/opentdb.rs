//! Open Trivia DB question source.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use quizapp_core::error::FetchError;
use quizapp_core::model::{
    Question, OPENTDB_CATEGORY, OPENTDB_DIFFICULTY, OPENTDB_TYPE, QUESTION_COUNT,
};
use quizapp_core::traits::QuestionSource;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Query parameters for one batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    pub amount: u32,
    pub category: u32,
    pub difficulty: String,
    pub kind: String,
}

impl Default for BatchQuery {
    fn default() -> Self {
        Self {
            amount: QUESTION_COUNT,
            category: OPENTDB_CATEGORY,
            difficulty: OPENTDB_DIFFICULTY.to_string(),
            kind: OPENTDB_TYPE.to_string(),
        }
    }
}

/// Fetches one fixed batch of questions from the Open Trivia DB API.
pub struct OpenTdbSource {
    base_url: String,
    query: BatchQuery,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenTdbSource {
    pub fn new(base_url: &str, query: BatchQuery, timeout_secs: u64) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            query,
            timeout_secs,
            client,
        })
    }

    /// The full request URL for one batch.
    pub fn request_url(&self) -> String {
        format!(
            "{}/api.php?amount={}&category={}&difficulty={}&type={}",
            self.base_url,
            self.query.amount,
            self.query.category,
            self.query.difficulty,
            self.query.kind
        )
    }
}

#[derive(Deserialize)]
struct OpenTdbResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<Question>,
}

fn response_code_message(code: u8) -> &'static str {
    match code {
        1 => "no results for the requested query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited",
        _ => "unknown response code",
    }
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    fn name(&self) -> &str {
        "opentdb"
    }

    #[instrument(skip(self), fields(amount = self.query.amount, category = self.query.category))]
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        let url = self.request_url();
        tracing::debug!(%url, "requesting question batch");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                message: body,
            });
        }

        let body: OpenTdbResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Malformed(e.to_string())
            }
        })?;

        if body.response_code != 0 {
            return Err(FetchError::Api {
                code: body.response_code,
                message: response_code_message(body.response_code).to_string(),
            });
        }
        if body.results.is_empty() {
            return Err(FetchError::Empty);
        }
        if let Some(pos) = body
            .results
            .iter()
            .position(|q| q.incorrect_answers.is_empty())
        {
            return Err(FetchError::Malformed(format!(
                "question {} has no incorrect answers",
                pos + 1
            )));
        }

        tracing::debug!(count = body.results.len(), "question batch received");
        Ok(body.results)
    }
}
