use std::collections::HashMap;

use alloy_primitives::{Address, U256, address};
use lending_integration_adapter::{
    CompoundAdapter, Error, LendingMarket, ReceiptAssetOracle, ResourceManifest, TokenLedger,
    WrappedNativeAsset,
};

pub const MANAGER: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const ADAPTER: Address = address!("0xadadadadadadadadadadadadadadadadadadadad");
pub const VAULT: Address = address!("0x7070707070707070707070707070707070707070");
pub const PRICE_FEED: Address = address!("0xfefefefefefefefefefefefefefefefefefefefe");
pub const WETH: Address = address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
pub const COMPTROLLER: Address = address!("0x3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e3e");
pub const REWARD_TOKEN: Address = address!("0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c");

pub const TOKEN_A: Address = address!("0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a");
pub const TOKEN_B: Address = address!("0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");
pub const C_TOKEN_A: Address = address!("0xcacacacacacacacacacacacacacacacacacacaca");
pub const C_TOKEN_B: Address = address!("0xcbcbcbcbcbcbcbcbcbcbcbcbcbcbcbcbcbcbcbcb");
pub const C_ETH: Address = address!("0xcececececececececececececececececececece");

pub const REWARD_PER_MARKET: u64 = 100;

pub fn adapter() -> CompoundAdapter {
    CompoundAdapter::new(MANAGER, ADAPTER, PRICE_FEED, WETH, COMPTROLLER)
}

pub fn u(amount: u64) -> U256 {
    U256::from(amount)
}

/// External calls the adapter issued, in order. Survives rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Approve {
        asset: Address,
        spender: Address,
        amount: U256,
    },
    Mint {
        receipt_asset: Address,
        amount: U256,
    },
    MintNative {
        receipt_asset: Address,
        amount: U256,
    },
    Redeem {
        receipt_asset: Address,
        amount: U256,
    },
    ClaimRewards {
        registry: Address,
        holder: Address,
        receipt_assets: Vec<Address>,
    },
    Wrap {
        amount: U256,
    },
    Unwrap {
        amount: U256,
    },
}

/// One receipt-token market. Mints `amount * rate_bps / 10_000 + surplus` receipt tokens and
/// redeems symmetrically, so every call leaves a little dust on top of the quoted amount.
#[derive(Debug, Clone, Copy)]
pub struct Market {
    pub underlying: Address,
    pub native: bool,
    pub rate_bps: u64,
    pub surplus: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    balances: HashMap<(Address, Address), U256>,
    native: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

/// Called from inside `mint`, before the market moves any funds.
pub type MintHook = Box<dyn FnMut(&mut MemoryHost) -> Result<(), Error>>;

#[derive(Default)]
pub struct MemoryHost {
    pub chain: Chain,
    pub calls: Vec<Call>,
    pub markets: HashMap<Address, Market>,
    pub fail_mints: bool,
    pub on_mint: Option<MintHook>,
    /// Results of every `on_mint` invocation, in order.
    pub hook_results: Vec<Result<(), Error>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let mut host = Self::default();
        host.markets.insert(
            C_TOKEN_A,
            Market {
                underlying: TOKEN_A,
                native: false,
                rate_bps: 9_500,
                surplus: 3,
            },
        );
        host.markets.insert(
            C_TOKEN_B,
            Market {
                underlying: TOKEN_B,
                native: false,
                rate_bps: 10_000,
                surplus: 0,
            },
        );
        host.markets.insert(
            C_ETH,
            Market {
                underlying: WETH,
                native: true,
                rate_bps: 5_000,
                surplus: 1,
            },
        );
        host
    }

    pub fn credit(&mut self, asset: Address, holder: Address, amount: U256) {
        *self.chain.balances.entry((asset, holder)).or_default() += amount;
    }

    pub fn credit_native(&mut self, holder: Address, amount: U256) {
        *self.chain.native.entry(holder).or_default() += amount;
    }

    fn debit(&mut self, asset: Address, holder: Address, amount: U256) -> Result<(), Error> {
        let balance = self.balance_of(asset, holder);
        if balance < amount {
            return Err(Error::ExternalCall {
                reason: format!("insufficient {asset} balance for {holder}"),
            });
        }
        self.chain.balances.insert((asset, holder), balance - amount);
        Ok(())
    }

    fn debit_native(&mut self, holder: Address, amount: U256) -> Result<(), Error> {
        let balance = self.native_balance(holder);
        if balance < amount {
            return Err(Error::ExternalCall {
                reason: "insufficient native balance".into(),
            });
        }
        self.chain.native.insert(holder, balance - amount);
        Ok(())
    }

    fn market(&self, receipt_asset: Address) -> Result<Market, Error> {
        self.markets
            .get(&receipt_asset)
            .copied()
            .ok_or_else(|| Error::ExternalCall {
                reason: format!("no market for {receipt_asset}"),
            })
    }

    /// Runs `f` all-or-nothing: balances are restored when it fails.
    pub fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let snapshot = self.chain.clone();
        let result = f(self);
        if result.is_err() {
            self.chain = snapshot;
        }
        result
    }

    /// What the integration manager does before executing a `Transfer` action.
    pub fn fund_adapter(&mut self, manifest: &ResourceManifest) -> Result<(), Error> {
        for (asset, amount) in manifest
            .spend_assets
            .iter()
            .zip(&manifest.spend_asset_amounts)
        {
            self.transfer(*asset, VAULT, ADAPTER, *amount)?;
        }
        Ok(())
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl TokenLedger for MemoryHost {
    fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.chain
            .balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Error> {
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount);
        Ok(())
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.chain
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), Error> {
        self.calls.push(Call::Approve {
            asset,
            spender,
            amount,
        });
        self.chain
            .allowances
            .insert((asset, owner, spender), amount);
        Ok(())
    }
}

impl WrappedNativeAsset for MemoryHost {
    fn native_balance(&self, holder: Address) -> U256 {
        self.chain.native.get(&holder).copied().unwrap_or_default()
    }

    fn wrap_native(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<(), Error> {
        self.calls.push(Call::Wrap { amount });
        self.debit_native(holder, amount)?;
        self.credit(wrapped, holder, amount);
        Ok(())
    }

    fn unwrap_native(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<(), Error> {
        self.calls.push(Call::Unwrap { amount });
        self.debit(wrapped, holder, amount)?;
        self.credit_native(holder, amount);
        Ok(())
    }
}

impl LendingMarket for MemoryHost {
    fn mint(
        &mut self,
        receipt_asset: Address,
        minter: Address,
        amount: U256,
    ) -> Result<(), Error> {
        self.calls.push(Call::Mint {
            receipt_asset,
            amount,
        });
        if let Some(mut hook) = self.on_mint.take() {
            let result = hook(self);
            self.hook_results.push(result);
            self.on_mint = Some(hook);
        }
        let market = self.market(receipt_asset)?;
        let allowance = self.allowance(market.underlying, minter, receipt_asset);
        if allowance < amount {
            return Err(Error::ExternalCall {
                reason: "mint: allowance too low".into(),
            });
        }
        if allowance != U256::MAX {
            self.chain
                .allowances
                .insert((market.underlying, minter, receipt_asset), allowance - amount);
        }
        self.transfer(market.underlying, minter, receipt_asset, amount)?;
        if self.fail_mints {
            return Err(Error::ExternalCall {
                reason: "mint: market paused".into(),
            });
        }
        let minted = amount * u(market.rate_bps) / u(10_000) + u(market.surplus);
        self.credit(receipt_asset, minter, minted);
        Ok(())
    }

    fn mint_native(
        &mut self,
        receipt_asset: Address,
        minter: Address,
        amount: U256,
    ) -> Result<(), Error> {
        self.calls.push(Call::MintNative {
            receipt_asset,
            amount,
        });
        let market = self.market(receipt_asset)?;
        if !market.native {
            return Err(Error::ExternalCall {
                reason: "mint_native: not a native market".into(),
            });
        }
        self.debit_native(minter, amount)?;
        self.credit_native(receipt_asset, amount);
        let minted = amount * u(market.rate_bps) / u(10_000) + u(market.surplus);
        self.credit(receipt_asset, minter, minted);
        Ok(())
    }

    fn redeem(
        &mut self,
        receipt_asset: Address,
        redeemer: Address,
        amount: U256,
    ) -> Result<(), Error> {
        self.calls.push(Call::Redeem {
            receipt_asset,
            amount,
        });
        let market = self.market(receipt_asset)?;
        self.debit(receipt_asset, redeemer, amount)?;
        let paid = amount * u(10_000) / u(market.rate_bps) + u(market.surplus);
        if market.native {
            self.credit_native(redeemer, paid);
        } else {
            self.credit(market.underlying, redeemer, paid);
        }
        Ok(())
    }

    fn claim_rewards(
        &mut self,
        registry: Address,
        holder: Address,
        receipt_assets: &[Address],
    ) -> Result<(), Error> {
        self.calls.push(Call::ClaimRewards {
            registry,
            holder,
            receipt_assets: receipt_assets.to_vec(),
        });
        let reward = u(REWARD_PER_MARKET) * U256::from(receipt_assets.len());
        self.credit(REWARD_TOKEN, holder, reward);
        Ok(())
    }
}

impl ReceiptAssetOracle for MemoryHost {
    fn underlying_of(&self, price_feed: Address, receipt_asset: Address) -> Option<Address> {
        if price_feed != PRICE_FEED {
            return None;
        }
        self.markets.get(&receipt_asset).map(|m| m.underlying)
    }
}
