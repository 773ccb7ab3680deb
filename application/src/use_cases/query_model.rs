//! Query Model use case
//!
//! Asks one model one question, retrying with backoff, and never fails:
//! exhausted retries come back as a [`RawResponse`] carrying the last error.

use crate::config::{QueryParams, RetryPolicy};
use crate::ports::provider_gateway::{GatewayError, ProviderGateway, ProviderRequest};
use answer_quorum_domain::core::string::clip_chars;
use answer_quorum_domain::{ModelIdentity, Question, RawResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters of a failure reason kept in the attempt log
const MAX_REASON_CHARS: usize = 80;

/// Queries a single model with retries
pub struct ModelQueryRunner<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
    params: QueryParams,
    retry: RetryPolicy,
}

// Manual impl: `G` itself need not be `Clone`.
impl<G: ProviderGateway + 'static> Clone for ModelQueryRunner<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            params: self.params.clone(),
            retry: self.retry.clone(),
        }
    }
}

impl<G: ProviderGateway + 'static> ModelQueryRunner<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: QueryParams::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Ask `identity` the question.
    ///
    /// The first successful attempt short-circuits. Every failed attempt adds
    /// one line to [`RawResponse::attempt_errors`].
    pub async fn query(&self, identity: &ModelIdentity, question: &Question) -> RawResponse {
        let request = self.params.request_for(question);
        let attempts = self.retry.attempts();
        let mut attempt_errors = Vec::new();
        let mut last_error = GatewayError::EmptyResponse;

        for attempt in 1..=attempts {
            match self.attempt(identity, &request).await {
                Ok(text) => {
                    debug!("{} answered on attempt {}", identity, attempt);
                    return RawResponse::success(identity.clone(), text, attempt)
                        .with_attempt_errors(attempt_errors);
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!("{} attempt {} failed: {}", identity, attempt, reason);
                    attempt_errors.push(format!(
                        "{} attempt {}: {}",
                        identity,
                        attempt,
                        clip_chars(&reason, MAX_REASON_CHARS)
                    ));
                    last_error = e;

                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    }
                }
            }
        }

        RawResponse::failure(identity.clone(), last_error.to_string(), attempts)
            .with_attempt_errors(attempt_errors)
    }

    async fn attempt(
        &self,
        identity: &ModelIdentity,
        request: &ProviderRequest,
    ) -> Result<String, GatewayError> {
        let text = tokio::time::timeout(request.timeout, self.gateway.submit(identity, request))
            .await
            .map_err(|_| GatewayError::Timeout)??;

        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}
