//! Canonical gateway over heterogeneous legacy agent backends.
//!
//! Callers build a [`CanonicalRequest`], dispatch it by adapter key through
//! an [`AdapterRegistry`], and receive a [`CanonicalResponse`] without ever
//! seeing a backend's wire format. Each legacy backend gets one adapter that
//! owns the translation in both directions; transport is one shared
//! [`BackendClient`] with a bounded per-call timeout.
//!
//! ```no_run
//! use std::sync::Arc;
//! use bridgelet::{AdapterRegistry, BackendClient, CanonicalRequest};
//! use bridgelet::canonical::KIND_RETRIEVER;
//! use bridgelet::registry::RETRIEVER_A;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = Arc::new(BackendClient::new("http://localhost:8000"));
//! let registry = AdapterRegistry::with_default_adapters(client);
//!
//! let req = CanonicalRequest::new(KIND_RETRIEVER)
//!     .with_input("query", "請求レポート 手順")
//!     .with_input("top_k", 2)
//!     .with_context("locale", "ja-JP")
//!     .with_telemetry("trace_id", "demo-001");
//!
//! let resp = registry.dispatch(RETRIEVER_A, &req).await?;
//! println!("{:?}", resp.outputs["snippets"]);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod canonical;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;

// Re-export commonly used types
pub use adapters::BackendAdapter;
pub use canonical::{CanonicalRequest, CanonicalResponse};
pub use client::BackendClient;
pub use config::{BackendConfig, GatewayConfig, LoggingConfig};
pub use error::{GatewayError, GatewayResult};
pub use registry::AdapterRegistry;
