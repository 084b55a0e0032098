use async_trait::async_trait;

use crate::processor::SubmitResponse;
use crate::BriefmailError;

/// Carries a posted field set to the Submission Processor.
///
/// Any failure to get a readable JSON answer is a transport error; a
/// `{success: false}` body is a normal response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, fields: &[(String, String)]) -> crate::Result<SubmitResponse>;
}

/// Posts urlencoded fields over HTTP with reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> BriefmailError {
        BriefmailError::Transport {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, fields: &[(String, String)]) -> crate::Result<SubmitResponse> {
        // The body is read whatever the status: 405 answers carry JSON too.
        let response = self
            .client
            .post(&self.endpoint)
            .form(fields)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        tracing::debug!(status = %response.status(), endpoint = %self.endpoint, "form posted");
        response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| self.transport_error(e))
    }
}
