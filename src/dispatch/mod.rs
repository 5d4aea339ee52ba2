pub mod adapters;
pub mod host;

use std::cell::Cell;

use alloy_primitives::{Address, Selector};
use alloy_sol_types::{SolCall, sol};

use crate::error::Error;

sol! {
    function lend(address vaultProxy, bytes actionData, bytes assetData);
    function redeem(address vaultProxy, bytes actionData, bytes assetData);
    function claimRewards(address vaultProxy, bytes actionData, bytes assetData);
}

pub const LEND_SELECTOR: [u8; 4] = <lendCall as SolCall>::SELECTOR;
pub const REDEEM_SELECTOR: [u8; 4] = <redeemCall as SolCall>::SELECTOR;
pub const CLAIM_REWARDS_SELECTOR: [u8; 4] = <claimRewardsCall as SolCall>::SELECTOR;

/// Every action an adapter can be asked to perform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Lend,
    Redeem,
    ClaimRewards,
}

impl ActionKind {
    pub const fn selector(self) -> Selector {
        match self {
            Self::Lend => Selector::new(LEND_SELECTOR),
            Self::Redeem => Selector::new(REDEEM_SELECTOR),
            Self::ClaimRewards => Selector::new(CLAIM_REWARDS_SELECTOR),
        }
    }

    pub fn from_selector(selector: Selector) -> Result<Self, Error> {
        match selector.0 {
            LEND_SELECTOR => Ok(Self::Lend),
            REDEEM_SELECTOR => Ok(Self::Redeem),
            CLAIM_REWARDS_SELECTOR => Ok(Self::ClaimRewards),
            _ => Err(Error::UnsupportedAction { selector }),
        }
    }

    /// Canonical entry-point signature the selector is derived from.
    pub fn signature(self) -> &'static str {
        match self {
            Self::Lend => <lendCall as SolCall>::SIGNATURE,
            Self::Redeem => <redeemCall as SolCall>::SIGNATURE,
            Self::ClaimRewards => <claimRewardsCall as SolCall>::SIGNATURE,
        }
    }
}

/// Where a single execute call currently stands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum CallPhase {
    Unauthorized,
    Authorized,
    Decoded,
    Executing,
    Swept,
    Failed,
}

impl CallPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Swept | Self::Failed)
    }

    /// Next phase on the success path. Terminal phases stay put.
    pub fn advance(self) -> Self {
        match self {
            Self::Unauthorized => Self::Authorized,
            Self::Authorized => Self::Decoded,
            Self::Decoded => Self::Executing,
            Self::Executing | Self::Swept => Self::Swept,
            Self::Failed => Self::Failed,
        }
    }

    /// A failure before the sweep completes ends the call. `Swept` is final.
    pub fn fail(self) -> Self {
        match self {
            Self::Swept => Self::Swept,
            _ => Self::Failed,
        }
    }
}

/// Call-depth guard for state-changing entry points.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    entered: Cell<bool>,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> Result<LockGuard<'_>, Error> {
        if self.entered.replace(true) {
            return Err(Error::Reentrant);
        }
        Ok(LockGuard { lock: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

pub struct LockGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.entered.set(false);
    }
}

/// One authorized call in flight: the caller was the integration manager and the adapter's
/// lock is held until this is dropped.
///
/// Action handlers take one of these, so they cannot run outside the dispatcher:
///
/// ```compile_fail
/// use alloy_primitives::Address;
/// use lending_integration_adapter::AuthorizedCall;
///
/// let call = AuthorizedCall { vault: Address::ZERO };
/// ```
pub struct AuthorizedCall<'a> {
    vault: Address,
    _guard: LockGuard<'a>,
}

impl<'a> AuthorizedCall<'a> {
    pub(crate) fn new(vault: Address, guard: LockGuard<'a>) -> Self {
        Self {
            vault,
            _guard: guard,
        }
    }

    /// Beneficiary of every sweep made during this call.
    pub fn vault(&self) -> Address {
        self.vault
    }
}
