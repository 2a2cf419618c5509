use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{GatewayError, GatewayResult};

/// Agent category for search-style backends.
pub const KIND_RETRIEVER: &str = "retriever";
/// Agent category for tool-style backends.
pub const KIND_TOOL: &str = "tool";

/// Backend-agnostic request shape all adapters translate from.
///
/// `agent_kind` is an open set of category tags ("retriever", "tool",
/// "writer", ...) used for classification only; dispatch is always by
/// adapter key, never by kind. The four maps are always present so adapters
/// can probe fields without existence checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub agent_kind: String,
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
    #[serde(default)]
    pub context: HashMap<String, Value>,
    #[serde(default)]
    pub policy: HashMap<String, Value>,
    #[serde(default)]
    pub telemetry: HashMap<String, Value>,
}

impl CanonicalRequest {
    pub fn new(agent_kind: impl Into<String>) -> Self {
        Self {
            agent_kind: agent_kind.into(),
            inputs: HashMap::new(),
            context: HashMap::new(),
            policy: HashMap::new(),
            telemetry: HashMap::new(),
        }
    }

    /// Builds a validated request from an untyped JSON value.
    ///
    /// Wrong-shaped fields (e.g. `inputs` not a map) and a missing or empty
    /// `agent_kind` are rejected here, at construction, never inside an
    /// adapter.
    pub fn from_value(value: Value) -> GatewayResult<Self> {
        let req: Self =
            serde_json::from_value(value).map_err(|e| GatewayError::SchemaValidation {
                message: e.to_string(),
            })?;
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if self.agent_kind.trim().is_empty() {
            return Err(GatewayError::SchemaValidation {
                message: "agent_kind must be a non-empty string".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_policy(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.policy.insert(key.into(), value.into());
        self
    }

    pub fn with_telemetry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.telemetry.insert(key.into(), value.into());
        self
    }

    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).and_then(Value::as_str)
    }

    pub fn input_u64(&self, key: &str) -> Option<u64> {
        self.inputs.get(key).and_then(Value::as_u64)
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }
}

/// Backend-agnostic response shape all adapters translate into.
///
/// `outputs` keys are stable per adapter kind: retriever adapters always
/// return `snippets`, the tool adapter always returns `result`. An empty
/// `errors` sequence means success; it is never absent on a successful
/// adapter return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalResponse {
    pub agent_kind: String,
    pub outputs: HashMap<String, Value>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CanonicalResponse {
    pub fn ok(agent_kind: impl Into<String>, outputs: HashMap<String, Value>) -> Self {
        Self {
            agent_kind: agent_kind.into(),
            outputs,
            errors: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
