use alloy_primitives::Address;

use crate::dispatch::AuthorizedCall;
use crate::dispatch::adapters::{AdapterBase, IntegrationAdapter};
use crate::dispatch::host::{Host, ReceiptAssetOracle};
use crate::error::Error;
use crate::manifest::{AssetData, ResourceManifest};
use crate::protocols::ClaimRewardsArgs;
use crate::protocols::lending::LendingAdapter;
use crate::types::AdapterConfig;

/// Compound-style adapter bound to one price feed, wrapped native asset and comptroller.
#[derive(Debug)]
pub struct CompoundAdapter {
    lending: LendingAdapter,
    comptroller: Address,
}

impl CompoundAdapter {
    pub fn new(
        integration_manager: Address,
        adapter: Address,
        price_feed: Address,
        wrapped_native_asset: Address,
        comptroller: Address,
    ) -> Self {
        Self {
            lending: LendingAdapter::new(
                integration_manager,
                adapter,
                price_feed,
                wrapped_native_asset,
            ),
            comptroller,
        }
    }

    pub fn from_config(config: &AdapterConfig) -> Self {
        Self::new(
            config.integration_manager,
            config.adapter,
            config.price_feed,
            config.wrapped_native_asset,
            config.comptroller,
        )
    }

    pub fn integration_manager(&self) -> Address {
        self.lending.base().integration_manager()
    }

    pub fn address(&self) -> Address {
        self.lending.base().address()
    }

    pub fn price_feed(&self) -> Address {
        self.lending.price_feed()
    }

    pub fn wrapped_native_asset(&self) -> Address {
        self.lending.wrapped_native_asset()
    }

    pub fn comptroller(&self) -> Address {
        self.comptroller
    }
}

impl IntegrationAdapter for CompoundAdapter {
    fn base(&self) -> &AdapterBase {
        self.lending.base()
    }

    fn parse_lend<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        self.lending.parse_lend(oracle, action_args)
    }

    fn parse_redeem<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        self.lending.parse_redeem(oracle, action_args)
    }

    fn parse_claim_rewards(&self, action_args: &[u8]) -> Result<ResourceManifest, Error> {
        self.lending.parse_claim_rewards(action_args)
    }

    fn lend<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        _action_args: &[u8],
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        self.lending.lend(host, call.vault(), asset_data)
    }

    fn redeem<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        _action_args: &[u8],
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        self.lending.redeem(host, call.vault(), asset_data)
    }

    fn claim_rewards<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        action_args: &[u8],
        _asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let ClaimRewardsArgs {
            receipt_assets,
            registry,
        } = ClaimRewardsArgs::decode(action_args)?;
        if registry != self.comptroller {
            return Err(Error::UnsupportedRegistry {
                expected: self.comptroller,
                actual: registry,
            });
        }
        self.lending
            .claim_rewards_from(host, call.vault(), registry, &receipt_assets)
    }
}
