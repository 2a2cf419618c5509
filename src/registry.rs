use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    BackendAdapter, LegacyASearchAdapter, LegacyBGraphqlAdapter, LegacyCCalcAdapter,
};
use crate::canonical::{CanonicalRequest, CanonicalResponse};
use crate::client::BackendClient;
use crate::error::{GatewayError, GatewayResult};

/// Adapter key for the legacy A keyword search backend.
pub const RETRIEVER_A: &str = "retriever_A";
/// Adapter key for the legacy B graph-query search backend.
pub const RETRIEVER_B: &str = "retriever_B";
/// Adapter key for the legacy C calculator backend.
pub const TOOL_C: &str = "tool_C";

/// The single dispatch point callers use.
///
/// Populated at startup and read-only afterwards; shared freely across
/// tasks with no interior synchronization. There is no fallback adapter:
/// an unknown key is an error the caller can branch on.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn BackendAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry preloaded with the three legacy adapters, all sharing one
    /// transport client.
    pub fn with_default_adapters(client: Arc<BackendClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LegacyASearchAdapter::new(client.clone())));
        registry.register(Arc::new(LegacyBGraphqlAdapter::new(client.clone())));
        registry.register(Arc::new(LegacyCCalcAdapter::new(client)));
        registry
    }

    /// Extension point for future backends; keyed by `adapter.name()`.
    pub fn register(&mut self, adapter: Arc<dyn BackendAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn BackendAdapter>> {
        self.adapters.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Resolves `key` and invokes the adapter on `req`.
    pub async fn dispatch(
        &self,
        key: &str,
        req: &CanonicalRequest,
    ) -> GatewayResult<CanonicalResponse> {
        req.validate()?;
        let adapter = self
            .adapters
            .get(key)
            .ok_or_else(|| GatewayError::UnknownAdapter {
                key: key.to_string(),
            })?;
        debug!(
            key,
            agent_kind = %req.agent_kind,
            adapter_kind = adapter.kind(),
            "dispatching to adapter"
        );
        adapter.invoke(req).await
    }
}
