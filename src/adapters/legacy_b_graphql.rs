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

/// Legacy B graph-style search: POST /legacyB/graphql
/// `{query: <expression>}` -> `{data: {search: [{passage, score}]}}`
pub struct LegacyBGraphqlAdapter {
    client: Arc<BackendClient>,
}

/// Interpolates `query` and `top_k` as literal parameters of the legacy
/// search expression.
///
/// Quote characters in `query` are NOT escaped: a quote-bearing query yields
/// a malformed expression. The legacy wire contract behaves this way, so any
/// escaping change belongs in this function and nowhere else.
fn build_search_expression(query: &str, top_k: u64) -> String {
    format!(
        "{{ search(text:\"{}\", topK: {}){{ passage, score }} }}",
        query, top_k
    )
}

impl LegacyBGraphqlAdapter {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    fn extract_snippets(data: &Value) -> Vec<Value> {
        data.get("data")
            .and_then(|d| d.get("search"))
            .and_then(Value::as_array)
            .map(|hits| {
                hits.iter()
                    .map(|h| {
                        let passage = h.get("passage").and_then(Value::as_str).unwrap_or("");
                        Value::String(passage.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl BackendAdapter for LegacyBGraphqlAdapter {
    fn name(&self) -> &str {
        registry::RETRIEVER_B
    }

    fn kind(&self) -> &str {
        KIND_RETRIEVER
    }

    async fn invoke(&self, req: &CanonicalRequest) -> GatewayResult<CanonicalResponse> {
        let query = req.input_str("query").unwrap_or("");
        let top_k = req.input_u64("top_k").unwrap_or(DEFAULT_TOP_K);
        let expression = build_search_expression(query, top_k);

        let data = self
            .client
            .call("/legacyB/graphql", &json!({ "query": expression }))
            .await?;
        let snippets = Self::extract_snippets(&data);

        let mut outputs = HashMap::new();
        outputs.insert("snippets".to_string(), Value::Array(snippets));
        Ok(CanonicalResponse::ok(KIND_RETRIEVER, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use tokio::net::TcpListener;

    #[test]
    fn test_expression_embeds_literal_parameters() {
        assert_eq!(
            build_search_expression("サービス 概要", 3),
            "{ search(text:\"サービス 概要\", topK: 3){ passage, score } }"
        );
    }

    #[test]
    fn test_expression_does_not_escape_quotes() {
        // known limitation: embedded quotes terminate the text literal early
        // and the remainder leaks into the expression
        let expr = build_search_expression("say \"hi\"", 3);
        assert_eq!(
            expr,
            "{ search(text:\"say \"hi\"\", topK: 3){ passage, score } }"
        );
    }

    #[test]
    fn test_extract_snippets_preserves_order_and_fills_missing_passage() {
        let data = json!({
            "data": {
                "search": [
                    {"passage": "月末締め運用ルール", "score": 0.88},
                    {"score": 0.75},
                    {"passage": "パンフB要約（3章）", "score": 0.70},
                ]
            }
        });
        let snippets = LegacyBGraphqlAdapter::extract_snippets(&data);
        assert_eq!(
            snippets,
            vec![json!("月末締め運用ルール"), json!(""), json!("パンフB要約（3章）")]
        );
    }

    #[tokio::test]
    async fn test_invoke_sends_expression_and_maps_passages() {
        // the mock echoes the expression it received as the only passage, so
        // the test can assert the exact wire format end to end
        let app = Router::new().route(
            "/legacyB/graphql",
            post(|Json(body): Json<Value>| async move {
                let expression = body["query"].as_str().unwrap_or("").to_string();
                Json(json!({
                    "data": {"search": [{"passage": expression, "score": 0.8}]}
                }))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Arc::new(BackendClient::new(format!("http://{}", addr)));
        let adapter = LegacyBGraphqlAdapter::new(client);
        let req = CanonicalRequest::new(KIND_RETRIEVER)
            .with_input("query", "サービス 概要")
            .with_input("top_k", 2);
        let resp = adapter.invoke(&req).await.unwrap();

        assert_eq!(
            resp.outputs["snippets"],
            json!(["{ search(text:\"サービス 概要\", topK: 2){ passage, score } }"])
        );
    }
}
