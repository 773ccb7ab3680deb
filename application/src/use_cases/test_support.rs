//! Scripted gateway shared by the use case tests.

use crate::ports::provider_gateway::{GatewayError, ProviderGateway, ProviderRequest};
use answer_quorum_domain::{ModelIdentity, Provider};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
pub(crate) struct Step {
    delay: Duration,
    result: Result<String, GatewayError>,
    panics: bool,
}

impl Step {
    pub fn ok(text: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(text.to_string()),
            panics: false,
        }
    }

    pub fn err(error: GatewayError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
            panics: false,
        }
    }

    /// A reply that panics inside the gateway
    pub fn panics() -> Self {
        Self {
            panics: true,
            ..Self::ok("")
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Gateway replying from per-model scripts.
///
/// Steps are consumed in order; the last step repeats. Unscripted models
/// answer with `ModelNotAvailable`.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: Mutex<HashMap<ModelIdentity, VecDeque<Step>>>,
    candidates: HashMap<Provider, Vec<String>>,
    calls: Mutex<Vec<(ModelIdentity, ProviderRequest)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, identity: &str, steps: Vec<Step>) -> Self {
        let identity: ModelIdentity = identity.parse().unwrap();
        self.scripts
            .lock()
            .unwrap()
            .insert(identity, steps.into_iter().collect());
        self
    }

    pub fn answer(self, identity: &str, text: &str) -> Self {
        self.script(identity, vec![Step::ok(text)])
    }

    pub fn candidates(mut self, provider: Provider, models: &[&str]) -> Self {
        self.candidates
            .insert(provider, models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<(ModelIdentity, ProviderRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, identity: &str) -> usize {
        let identity: ModelIdentity = identity.parse().unwrap();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == identity)
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_step(&self, identity: &ModelIdentity) -> Option<Step> {
        let mut scripts = self.scripts.lock().unwrap();
        let steps = scripts.get_mut(identity)?;
        if steps.len() > 1 {
            steps.pop_front()
        } else {
            steps.front().cloned()
        }
    }
}

#[async_trait]
impl ProviderGateway for ScriptedGateway {
    async fn submit(
        &self,
        identity: &ModelIdentity,
        request: &ProviderRequest,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((identity.clone(), request.clone()));

        let Some(step) = self.next_step(identity) else {
            return Err(GatewayError::ModelNotAvailable(identity.to_string()));
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(step.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if step.panics {
            panic!("scripted gateway bug for {identity}");
        }
        step.result
    }

    async fn candidate_models(&self, provider: Provider) -> Result<Vec<String>, GatewayError> {
        self.candidates
            .get(&provider)
            .cloned()
            .ok_or(GatewayError::ProviderNotConfigured(provider))
    }

    fn providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.candidates.contains_key(p))
            .collect()
    }
}

pub(crate) fn ids(specs: &[&str]) -> Vec<ModelIdentity> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}
