use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::error::Error;

/// ERC-20 balances and allowances as seen by the adapter.
///
/// `transfer` and `approve` act on behalf of `from`/`owner`; the adapter only ever passes
/// its own address there.
pub trait TokenLedger {
    fn balance_of(&self, asset: Address, holder: Address) -> U256;

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Error>;

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256;

    fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), Error>;
}

/// The chain's native value and its wrapped ERC-20 form.
pub trait WrappedNativeAsset {
    fn native_balance(&self, holder: Address) -> U256;

    /// Deposits `amount` of `holder`'s native value into `wrapped`.
    fn wrap_native(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<(), Error>;

    /// Burns `amount` of `wrapped` held by `holder`, returning native value.
    fn unwrap_native(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<(), Error>;
}

/// Calls into the lending protocol. Each either fully succeeds or fails the whole call.
pub trait LendingMarket {
    /// Supplies `amount` of the market's underlying token from `minter`.
    fn mint(&mut self, receipt_asset: Address, minter: Address, amount: U256)
    -> Result<(), Error>;

    /// Supplies `amount` of native value from `minter`.
    fn mint_native(
        &mut self,
        receipt_asset: Address,
        minter: Address,
        amount: U256,
    ) -> Result<(), Error>;

    /// Burns `amount` receipt tokens held by `redeemer` for underlying.
    fn redeem(
        &mut self,
        receipt_asset: Address,
        redeemer: Address,
        amount: U256,
    ) -> Result<(), Error>;

    /// Claims accrued rewards for `holder` across `receipt_assets`.
    fn claim_rewards(
        &mut self,
        registry: Address,
        holder: Address,
        receipt_assets: &[Address],
    ) -> Result<(), Error>;
}

/// Resolves a receipt asset to the token it is a claim on.
pub trait ReceiptAssetOracle {
    fn underlying_of(&self, price_feed: Address, receipt_asset: Address) -> Option<Address>;
}

/// Everything the execute path touches.
pub trait Host: TokenLedger + WrappedNativeAsset + LendingMarket + ReceiptAssetOracle {}

impl<T> Host for T where T: TokenLedger + WrappedNativeAsset + LendingMarket + ReceiptAssetOracle {}

/// Oracle backed by a fixed receipt → underlying table.
///
/// Ignores the price feed address; used for off-chain simulation of `describe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct StaticReceiptOracle {
    underlyings: HashMap<Address, Address>,
}

impl StaticReceiptOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, receipt_asset: Address, underlying: Address) -> Self {
        self.underlyings.insert(receipt_asset, underlying);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ReceiptAssetOracle for StaticReceiptOracle {
    fn underlying_of(&self, _price_feed: Address, receipt_asset: Address) -> Option<Address> {
        self.underlyings.get(&receipt_asset).copied()
    }
}

/// Grants `spender` an unlimited allowance when the current one cannot cover `amount`.
pub fn approve_max_as_needed<L>(
    ledger: &mut L,
    asset: Address,
    owner: Address,
    spender: Address,
    amount: U256,
) -> Result<(), Error>
where
    L: TokenLedger + ?Sized,
{
    if ledger.allowance(asset, owner, spender) < amount {
        tracing::debug!(%asset, %spender, "granting max allowance");
        ledger.approve(asset, owner, spender, U256::MAX)?;
    }
    Ok(())
}
