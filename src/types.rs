use alloy_primitives::Address;

use crate::error::Error;

/// Deployment addresses for one adapter instance, as JSON (camelCase keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdapterConfig {
    /// The only caller allowed to execute actions.
    pub integration_manager: Address,
    /// Address the adapter itself holds balances under.
    pub adapter: Address,
    /// Price feed used to resolve receipt assets to their underlying.
    pub price_feed: Address,
    /// Wrapped form of the chain's native asset (e.g. WETH).
    pub wrapped_native_asset: Address,
    /// Rewards registry of the lending protocol.
    pub comptroller: Address,
}

impl AdapterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}
