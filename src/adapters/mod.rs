pub mod legacy_a_search;
pub mod legacy_b_graphql;
pub mod legacy_c_calc;
pub mod stub;

use async_trait::async_trait;

use crate::canonical::{CanonicalRequest, CanonicalResponse};
use crate::error::GatewayResult;

pub use legacy_a_search::LegacyASearchAdapter;
pub use legacy_b_graphql::LegacyBGraphqlAdapter;
pub use legacy_c_calc::LegacyCCalcAdapter;
pub use stub::StubAdapter;

/// Translation unit between the canonical shape and one backend's wire
/// format. Adapters are stateless, built once at startup and shared behind
/// `Arc`; invoking one performs exactly one outbound call.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Registry key this adapter is dispatched under.
    fn name(&self) -> &str;

    /// Agent category echoed in every response this adapter produces.
    fn kind(&self) -> &str;

    async fn invoke(&self, req: &CanonicalRequest) -> GatewayResult<CanonicalResponse>;
}
