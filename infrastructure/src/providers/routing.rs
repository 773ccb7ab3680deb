use super::ProviderAdapter;
use answer_quorum_application::ports::provider_gateway::{
    GatewayError, ProviderGateway, ProviderRequest,
};
use answer_quorum_domain::{ModelIdentity, Provider};
use async_trait::async_trait;
use std::sync::Arc;

/// Dispatches each model identity to the adapter for its provider.
///
/// Adapters are kept in registration order, which is also the order
/// [`providers`](ProviderGateway::providers) reports them in. Registering a
/// second adapter for the same provider replaces the first.
pub struct RoutingGateway {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let mut gateway = Self {
            adapters: Vec::with_capacity(adapters.len()),
        };
        for adapter in adapters {
            gateway.register(adapter);
        }
        gateway
    }

    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        match self
            .adapters
            .iter()
            .position(|a| a.provider() == adapter.provider())
        {
            Some(idx) => self.adapters[idx] = adapter,
            None => self.adapters.push(adapter),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    fn resolve(&self, provider: Provider) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.adapters
            .iter()
            .find(|a| a.provider() == provider)
            .map(|a| a.as_ref())
            .ok_or(GatewayError::ProviderNotConfigured(provider))
    }
}

#[async_trait]
impl ProviderGateway for RoutingGateway {
    async fn submit(
        &self,
        identity: &ModelIdentity,
        request: &ProviderRequest,
    ) -> Result<String, GatewayError> {
        self.resolve(identity.provider())?
            .complete(identity.model(), request)
            .await
    }

    async fn candidate_models(&self, provider: Provider) -> Result<Vec<String>, GatewayError> {
        self.resolve(provider)?.list_models().await
    }

    fn providers(&self) -> Vec<Provider> {
        self.adapters.iter().map(|a| a.provider()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockAdapter {
        provider: Provider,
        reply: &'static str,
    }

    impl MockAdapter {
        fn new(provider: Provider, reply: &'static str) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self { provider, reply })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn complete(
            &self,
            model: &str,
            _request: &ProviderRequest,
        ) -> Result<String, GatewayError> {
            Ok(format!("{} from {}", self.reply, model))
        }

        async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
            Ok(vec![format!("{}-model", self.provider)])
        }
    }

    fn id(s: &str) -> ModelIdentity {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_routes_by_provider() {
        let gateway = RoutingGateway::new(vec![
            MockAdapter::new(Provider::Perplexity, "pplx"),
            MockAdapter::new(Provider::Groq, "groq"),
        ]);
        let request = ProviderRequest::new("hi");

        assert_eq!(
            gateway.submit(&id("groq:llama"), &request).await.unwrap(),
            "groq from llama"
        );
        assert_eq!(
            gateway.submit(&id("perplexity:sonar"), &request).await.unwrap(),
            "pplx from sonar"
        );
        assert_eq!(
            gateway.candidate_models(Provider::Groq).await.unwrap(),
            vec!["groq-model"]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let gateway = RoutingGateway::new(vec![MockAdapter::new(Provider::Groq, "groq")]);

        let err = gateway
            .submit(&id("perplexity:sonar"), &ProviderRequest::new("hi"))
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::ProviderNotConfigured(Provider::Perplexity));

        let err = gateway
            .candidate_models(Provider::Perplexity)
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::ProviderNotConfigured(Provider::Perplexity));
    }

    #[tokio::test]
    async fn test_register_replaces_same_provider() {
        let mut gateway = RoutingGateway::new(vec![
            MockAdapter::new(Provider::Groq, "old"),
            MockAdapter::new(Provider::Perplexity, "pplx"),
        ]);
        gateway.register(MockAdapter::new(Provider::Groq, "new"));

        assert_eq!(gateway.providers(), vec![Provider::Groq, Provider::Perplexity]);
        assert_eq!(
            gateway
                .submit(&id("groq:llama"), &ProviderRequest::new("hi"))
                .await
                .unwrap(),
            "new from llama"
        );
    }

    #[test]
    fn test_empty_gateway() {
        let gateway = RoutingGateway::new(Vec::new());
        assert!(gateway.is_empty());
        assert!(gateway.providers().is_empty());
    }
}
