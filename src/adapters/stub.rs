use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::BackendAdapter;
use crate::canonical::{CanonicalRequest, CanonicalResponse};
use crate::error::GatewayResult;

/// Deterministic in-process adapter with no outbound call. Used to exercise
/// registry dispatch and the `register` extension point without a backend.
pub struct StubAdapter {
    name: String,
    kind: String,
    outputs: HashMap<String, Value>,
}

impl StubAdapter {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        outputs: HashMap<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            outputs,
        }
    }

    pub fn shared(
        name: impl Into<String>,
        kind: impl Into<String>,
        outputs: HashMap<String, Value>,
    ) -> Arc<Self> {
        Arc::new(Self::new(name, kind, outputs))
    }
}

#[async_trait]
impl BackendAdapter for StubAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    async fn invoke(&self, _req: &CanonicalRequest) -> GatewayResult<CanonicalResponse> {
        Ok(CanonicalResponse::ok(self.kind.clone(), self.outputs.clone()))
    }
}
