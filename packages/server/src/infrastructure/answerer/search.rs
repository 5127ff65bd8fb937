//! Search-service answerer.
//!
//! Posts `{index, query, k}` to `<base_url>/repositories/<repository>/search` and answers with
//! the text of the top hit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AnswerContext, AnswerError, Answerer, ClassId};

pub const DEFAULT_REPOSITORY: &str = "default";
pub const DEFAULT_TOP_K: usize = 1;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    index: &'a str,
    query: &'a str,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl SearchResponse {
    fn top_text(self) -> Option<String> {
        self.results
            .into_iter()
            .filter_map(|hit| hit.text)
            .find(|text| !text.trim().is_empty())
    }
}

/// Search service client
#[derive(Clone)]
pub struct SearchAnswerer {
    client: reqwest::Client,
    base_url: String,
    repository: String,
    top_k: usize,
}

impl SearchAnswerer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            repository: DEFAULT_REPOSITORY.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    fn search_url(&self) -> String {
        format!(
            "{}/repositories/{}/search",
            self.base_url.trim_end_matches('/'),
            self.repository
        )
    }
}

#[async_trait]
impl Answerer for SearchAnswerer {
    async fn answer(
        &self,
        class_id: &ClassId,
        context: &AnswerContext,
        question: &str,
    ) -> Result<String, AnswerError> {
        let request = SearchRequest {
            index: &context.index,
            query: question,
            k: self.top_k,
        };
        tracing::debug!(class_id = %class_id, index = %context.index, "Querying search service");

        let response = self
            .client
            .post(self.search_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AnswerError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnswerError::Unavailable(format!(
                "search service error {}: {}",
                status, body
            )));
        }

        let response: SearchResponse = response
            .json()
            .await
            .map_err(|e| AnswerError::Unavailable(e.to_string()))?;
        response.top_text().ok_or(AnswerError::NoResult)
    }
}
