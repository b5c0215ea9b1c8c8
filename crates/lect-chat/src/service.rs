//! Answering-service client
//!
//! The session controller talks to the service through the [`AnswerService`]
//! trait; [`HttpAnswerService`] is the real implementation against the
//! backend's JSON API.

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    types::{AskRequest, AskResponse, CourseStatus},
};

/// The external question-answering dependency
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Submit one question and wait for the answer
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse>;
}

/// HTTP client for the answering service
pub struct HttpAnswerService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerService {
    /// Create a client against the given base URL (e.g. `http://localhost:8000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The base URL this client was constructed with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check service liveness via `GET /health`
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }
        Ok(())
    }

    /// Fetch processing status for a course via `GET /status/{course_id}`
    pub async fn course_status(&self, course_id: &str) -> Result<CourseStatus> {
        let url = format!("{}/status/{}", self.base_url, course_id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let url = format!("{}/api/chat/ask", self.base_url);
        tracing::debug!(
            conversation_id = %request.conversation_id,
            course_id = %request.course_id,
            "asking answering service"
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let svc = HttpAnswerService::new("http://localhost:8000/");
        assert_eq!(svc.base_url(), "http://localhost:8000");
    }
}
