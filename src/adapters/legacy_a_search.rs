use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapters::BackendAdapter;
use crate::canonical::{CanonicalRequest, CanonicalResponse, KIND_RETRIEVER};
use crate::client::BackendClient;
use crate::error::GatewayResult;
use crate::registry;

const DEFAULT_TOP_K: u64 = 3;
const DEFAULT_LOCALE: &str = "ja";

/// Legacy A keyword search: POST /legacyA/search
/// `{q, lang, limit}` -> `{hits: [{text, score}]}`
pub struct LegacyASearchAdapter {
    client: Arc<BackendClient>,
}

impl LegacyASearchAdapter {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    fn build_search_payload(req: &CanonicalRequest) -> Value {
        let query = req.input_str("query").unwrap_or("");
        let top_k = req.input_u64("top_k").unwrap_or(DEFAULT_TOP_K);
        let locale = req.context_str("locale").unwrap_or(DEFAULT_LOCALE);
        json!({
            "q": query,
            "lang": locale,
            "limit": top_k,
        })
    }

    /// Collects each hit's `text` in backend order; a hit without `text`
    /// contributes an empty string.
    fn extract_snippets(data: &Value) -> Vec<Value> {
        data.get("hits")
            .and_then(Value::as_array)
            .map(|hits| {
                hits.iter()
                    .map(|h| {
                        let text = h.get("text").and_then(Value::as_str).unwrap_or("");
                        Value::String(text.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl BackendAdapter for LegacyASearchAdapter {
    fn name(&self) -> &str {
        registry::RETRIEVER_A
    }

    fn kind(&self) -> &str {
        KIND_RETRIEVER
    }

    async fn invoke(&self, req: &CanonicalRequest) -> GatewayResult<CanonicalResponse> {
        let payload = Self::build_search_payload(req);
        let data = self.client.call("/legacyA/search", &payload).await?;
        let snippets = Self::extract_snippets(&data);

        let mut outputs = HashMap::new();
        outputs.insert("snippets".to_string(), Value::Array(snippets));
        Ok(CanonicalResponse::ok(KIND_RETRIEVER, outputs))
    }
}
