//! Discover Models use case
//!
//! Lists candidate models for every reachable provider, probes each with a
//! trivial request and keeps the ones that answer. At most
//! `max_concurrency` probes are in flight so a long listing does not trip
//! the provider's rate limit.

use crate::config::DiscoveryParams;
use crate::ports::provider_gateway::{GatewayError, ProviderGateway, ProviderRequest};
use answer_quorum_domain::{ModelIdentity, dedup_identities};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("No providers configured (set an API key)")]
    NoProviders,

    #[error("Only {found} working model(s), need at least {required}")]
    NotEnoughModels { found: usize, required: usize },
}

/// A candidate that did not answer the probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedProbe {
    pub identity: ModelIdentity,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryReport {
    /// Responders, in provider then candidate order
    pub working: Vec<ModelIdentity>,
    pub failed: Vec<FailedProbe>,
}

impl DiscoveryReport {
    pub fn candidates(&self) -> usize {
        self.working.len() + self.failed.len()
    }
}

/// Use case for finding the models worth polling
pub struct DiscoverModelsUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
    params: DiscoveryParams,
}

impl<G: ProviderGateway + 'static> DiscoverModelsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: DiscoveryParams::default(),
        }
    }

    pub fn with_params(mut self, params: DiscoveryParams) -> Self {
        self.params = params;
        self
    }

    pub async fn execute(&self) -> Result<DiscoveryReport, DiscoveryError> {
        let providers = self.gateway.providers();
        if providers.is_empty() {
            return Err(DiscoveryError::NoProviders);
        }

        let mut candidates = Vec::new();
        for provider in providers {
            match self.gateway.candidate_models(provider).await {
                Ok(models) => {
                    debug!("{} candidates: {:?}", provider, models);
                    candidates.extend(models.into_iter().map(|m| ModelIdentity::new(provider, m)));
                }
                Err(e) => warn!("Could not list {} models: {}", provider, e),
            }
        }

        let candidates = dedup_identities(candidates);
        info!("Probing {} candidate models", candidates.len());
        let request = self.probe_request();
        let results: Vec<_> = stream::iter(&candidates)
            .map(|identity| self.probe(identity, &request))
            .buffered(self.params.max_concurrency.max(1))
            .collect()
            .await;

        let mut report = DiscoveryReport::default();
        for (identity, result) in candidates.into_iter().zip(results) {
            match result {
                Ok(()) => report.working.push(identity),
                Err(e) => {
                    debug!("{} failed probe: {}", identity, e);
                    report.failed.push(FailedProbe {
                        identity,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "{} of {} models working",
            report.working.len(),
            report.candidates()
        );

        let required = self.params.min_working_models;
        if report.working.len() < required {
            return Err(DiscoveryError::NotEnoughModels {
                found: report.working.len(),
                required,
            });
        }
        Ok(report)
    }

    fn probe_request(&self) -> ProviderRequest {
        ProviderRequest::new(self.params.probe_content.clone())
            .with_temperature(self.params.temperature)
            .with_max_output_tokens(self.params.max_output_tokens)
            .with_timeout(self.params.timeout)
    }

    async fn probe(
        &self,
        identity: &ModelIdentity,
        request: &ProviderRequest,
    ) -> Result<(), GatewayError> {
        tokio::time::timeout(request.timeout, self.gateway.submit(identity, request))
            .await
            .map_err(|_| GatewayError::Timeout)??;
        Ok(())
    }
}
