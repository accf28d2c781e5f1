use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use super::SessionBackend;
use crate::dto::submission_dto::{CleanupRequest, NewSubmission, SubmissionPatch};
use crate::error::{Error, Result};
use crate::models::{
    question::Question,
    submission::{Submission, SubmissionFilter},
    test::Test,
};

/// Talks to a running assessment server over its JSON API.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Transient(format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    tracing::debug!(%status, %message, "Assessment API returned an error");
    Err(match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::CONFLICT => Error::Conflict(message),
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::UNPROCESSABLE_ENTITY => Error::TestConfiguration(message),
        _ => Error::Transient(format!("HTTP error {}: {}", status, message)),
    })
}

async fn json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    send(request)
        .await?
        .json::<T>()
        .await
        .map_err(|e| Error::Transient(format!("Invalid response body: {}", e)))
}

#[async_trait]
impl SessionBackend for HttpBackend {
    async fn fetch_test(&self, test_id: &str) -> Result<Test> {
        json(self.client.get(self.url(&format!("/api/tests/{}", test_id)))).await
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>> {
        json(self.client.get(self.url("/api/questions"))).await
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        json(self.client.get(self.url("/api/submissions")).query(filter)).await
    }

    async fn create_submission(&self, draft: NewSubmission) -> Result<Submission> {
        json(self.client.post(self.url("/api/submissions")).json(&draft)).await
    }

    async fn patch_submission(&self, id: &str, patch: SubmissionPatch) -> Result<Submission> {
        json(
            self.client
                .patch(self.url(&format!("/api/submissions/{}", id)))
                .json(&patch),
        )
        .await
    }

    async fn cleanup_incomplete_submissions(
        &self,
        candidate_id: &str,
        test_id: &str,
        keep_id: &str,
    ) -> Result<()> {
        let body = CleanupRequest {
            candidate_id: candidate_id.to_string(),
            test_id: test_id.to_string(),
            keep_submission_id: keep_id.to_string(),
        };
        send(self.client.post(self.url("/api/submissions/cleanup")).json(&body)).await?;
        Ok(())
    }
}
