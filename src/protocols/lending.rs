use alloy_primitives::{Address, U256};

use crate::dispatch::adapters::AdapterBase;
use crate::dispatch::host::{Host, ReceiptAssetOracle, approve_max_as_needed};
use crate::error::Error;
use crate::manifest::{AssetData, ResourceManifest, SpendAssetsHandleType};
use crate::protocols::{ClaimRewardsArgs, ReceiptAssetArgs};

/// Lend/redeem/claim handlers for a receipt-token lending market.
///
/// Receipt assets are resolved to their underlying through the price feed on every parse,
/// so a standalone `describe` never trusts an earlier validation.
#[derive(Debug)]
pub struct LendingAdapter {
    base: AdapterBase,
    price_feed: Address,
    wrapped_native_asset: Address,
}

impl LendingAdapter {
    pub fn new(
        integration_manager: Address,
        adapter: Address,
        price_feed: Address,
        wrapped_native_asset: Address,
    ) -> Self {
        Self {
            base: AdapterBase::new(integration_manager, adapter),
            price_feed,
            wrapped_native_asset,
        }
    }

    pub fn base(&self) -> &AdapterBase {
        &self.base
    }

    pub fn price_feed(&self) -> Address {
        self.price_feed
    }

    pub fn wrapped_native_asset(&self) -> Address {
        self.wrapped_native_asset
    }

    pub fn resolve_underlying<O>(&self, oracle: &O, receipt_asset: Address) -> Result<Address, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        oracle
            .underlying_of(self.price_feed, receipt_asset)
            .ok_or(Error::UnsupportedAsset {
                asset: receipt_asset,
            })
    }

    /// Spend `amount` underlying, receive at least `min` receipt tokens.
    pub fn parse_lend<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        let args = ReceiptAssetArgs::decode(action_args)?;
        let underlying = self.resolve_underlying(oracle, args.receipt_asset)?;
        Ok(ResourceManifest::single(
            SpendAssetsHandleType::Transfer,
            underlying,
            args.outgoing_amount,
            args.receipt_asset,
            args.min_incoming_amount,
        ))
    }

    /// Spend `amount` receipt tokens, receive at least `min` underlying.
    pub fn parse_redeem<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        let args = ReceiptAssetArgs::decode(action_args)?;
        let underlying = self.resolve_underlying(oracle, args.receipt_asset)?;
        Ok(ResourceManifest::single(
            SpendAssetsHandleType::Transfer,
            args.receipt_asset,
            args.outgoing_amount,
            underlying,
            args.min_incoming_amount,
        ))
    }

    /// Rewards land in the vault directly, so nothing passes through the adapter.
    pub fn parse_claim_rewards(&self, action_args: &[u8]) -> Result<ResourceManifest, Error> {
        ClaimRewardsArgs::decode(action_args)?;
        Ok(ResourceManifest::empty())
    }

    pub(crate) fn lend<H>(
        &self,
        host: &mut H,
        vault: Address,
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let (asset, amount) = asset_data.sole_spend()?;
        let receipt_asset = asset_data.first_incoming()?;

        self.base.with_spend_sweep(host, vault, asset_data, |host| {
            self.base
                .with_incoming_sweep(host, vault, asset_data, |host| {
                    self.supply(host, asset, amount, receipt_asset)
                })
        })
    }

    pub(crate) fn redeem<H>(
        &self,
        host: &mut H,
        vault: Address,
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let (receipt_asset, amount) = asset_data.sole_spend()?;
        let incoming_asset = asset_data.first_incoming()?;

        self.base.with_spend_sweep(host, vault, asset_data, |host| {
            self.base
                .with_incoming_sweep(host, vault, asset_data, |host| {
                    self.withdraw(host, receipt_asset, amount, incoming_asset)
                })
        })
    }

    /// Claims on `vault`'s behalf; the registry pays the vault, not the adapter.
    pub(crate) fn claim_rewards_from<H>(
        &self,
        host: &mut H,
        vault: Address,
        registry: Address,
        receipt_assets: &[Address],
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        tracing::debug!(%registry, %vault, markets = receipt_assets.len(), "claiming rewards");
        host.claim_rewards(registry, vault, receipt_assets)
    }

    fn supply<H>(
        &self,
        host: &mut H,
        asset: Address,
        amount: U256,
        receipt_asset: Address,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let adapter = self.base.address();
        if asset == self.wrapped_native_asset {
            host.unwrap_native(self.wrapped_native_asset, adapter, amount)?;
            host.mint_native(receipt_asset, adapter, amount)
        } else {
            approve_max_as_needed(host, asset, adapter, receipt_asset, amount)?;
            host.mint(receipt_asset, adapter, amount)
        }
    }

    fn withdraw<H>(
        &self,
        host: &mut H,
        receipt_asset: Address,
        amount: U256,
        incoming_asset: Address,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let adapter = self.base.address();
        host.redeem(receipt_asset, adapter, amount)?;
        if incoming_asset == self.wrapped_native_asset {
            let native = host.native_balance(adapter);
            if !native.is_zero() {
                host.wrap_native(self.wrapped_native_asset, adapter, native)?;
            }
        }
        Ok(())
    }
}
