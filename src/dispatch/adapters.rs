use alloy_primitives::{Address, Bytes, Selector};
use alloy_sol_types::SolValue;

use crate::dispatch::host::{Host, ReceiptAssetOracle, TokenLedger};
use crate::dispatch::{ActionKind, AuthorizedCall, CallPhase, ReentrancyLock};
use crate::error::Error;
use crate::manifest::{AssetData, ResourceManifest, abi_error, ensure_canonical};

/// Protocol-independent half of every adapter: who may call it, where it holds assets,
/// and how balances leave it after an action.
#[derive(Debug)]
pub struct AdapterBase {
    integration_manager: Address,
    address: Address,
    lock: ReentrancyLock,
}

impl AdapterBase {
    pub fn new(integration_manager: Address, address: Address) -> Self {
        Self {
            integration_manager,
            address,
            lock: ReentrancyLock::new(),
        }
    }

    pub fn integration_manager(&self) -> Address {
        self.integration_manager
    }

    /// The address the adapter holds balances under.
    pub fn address(&self) -> Address {
        self.address
    }

    /// True while an action is executing.
    pub fn is_executing(&self) -> bool {
        self.lock.is_entered()
    }

    pub fn authorize(&self, caller: Address) -> Result<(), Error> {
        if caller == self.integration_manager {
            Ok(())
        } else {
            tracing::warn!(%caller, "rejected caller");
            Err(Error::Unauthorized { caller })
        }
    }

    /// Takes the lock for one call on `vault`'s behalf. Callers must have authorized first.
    pub(crate) fn enter(&self, vault: Address) -> Result<AuthorizedCall<'_>, Error> {
        let guard = self.lock.enter()?;
        Ok(AuthorizedCall::new(vault, guard))
    }

    /// Runs `action`, then moves the adapter's entire balance of every incoming asset to `vault`.
    pub(crate) fn with_incoming_sweep<H, T, F>(
        &self,
        host: &mut H,
        vault: Address,
        asset_data: &AssetData,
        action: F,
    ) -> Result<T, Error>
    where
        H: TokenLedger + ?Sized,
        F: FnOnce(&mut H) -> Result<T, Error>,
    {
        let out = action(host)?;
        self.sweep(host, vault, &asset_data.incoming_assets)?;
        Ok(out)
    }

    /// Runs `action`, then returns whatever spend assets the action left behind to `vault`.
    pub(crate) fn with_spend_sweep<H, T, F>(
        &self,
        host: &mut H,
        vault: Address,
        asset_data: &AssetData,
        action: F,
    ) -> Result<T, Error>
    where
        H: TokenLedger + ?Sized,
        F: FnOnce(&mut H) -> Result<T, Error>,
    {
        let out = action(host)?;
        self.sweep(host, vault, &asset_data.spend_assets)?;
        Ok(out)
    }

    /// Full balance, not a delta: dust and rounding remainders go to `vault` too.
    pub(crate) fn sweep<H>(
        &self,
        host: &mut H,
        vault: Address,
        assets: &[Address],
    ) -> Result<(), Error>
    where
        H: TokenLedger + ?Sized,
    {
        for &asset in assets {
            let balance = host.balance_of(asset, self.address);
            if balance.is_zero() {
                continue;
            }
            tracing::debug!(%asset, %vault, %balance, "sweeping balance to vault");
            host.transfer(asset, self.address, vault, balance)?;
        }
        Ok(())
    }
}

/// Uniform surface the integration manager drives.
///
/// Implementors supply one parse and one execute handler per [`ActionKind`]; routing,
/// authorization and the reentrancy guard live in the provided methods. Execute handlers
/// take an [`AuthorizedCall`], which only [`IntegrationAdapter::execute`] can produce.
pub trait IntegrationAdapter {
    fn base(&self) -> &AdapterBase;

    fn parse_lend<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized;

    fn parse_redeem<O>(&self, oracle: &O, action_args: &[u8]) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized;

    fn parse_claim_rewards(&self, action_args: &[u8]) -> Result<ResourceManifest, Error>;

    fn lend<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        action_args: &[u8],
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized;

    fn redeem<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        action_args: &[u8],
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized;

    fn claim_rewards<H>(
        &self,
        host: &mut H,
        call: &AuthorizedCall<'_>,
        action_args: &[u8],
        asset_data: &AssetData,
    ) -> Result<(), Error>
    where
        H: Host + ?Sized;

    /// Read-only: the resources `selector` would touch with `action_args`.
    fn describe<O>(
        &self,
        oracle: &O,
        selector: Selector,
        action_args: &[u8],
    ) -> Result<ResourceManifest, Error>
    where
        O: ReceiptAssetOracle + ?Sized,
    {
        let kind = ActionKind::from_selector(selector)?;
        parse_action(self, oracle, kind, action_args)
    }

    fn execute<H>(
        &self,
        host: &mut H,
        caller: Address,
        vault: Address,
        selector: Selector,
        action_args: &[u8],
        asset_data: &[u8],
    ) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        let mut phase = CallPhase::Unauthorized;
        let result = run_action(
            self,
            host,
            &mut phase,
            caller,
            vault,
            selector,
            action_args,
            asset_data,
        );
        match &result {
            Ok(()) => tracing::debug!(%selector, %vault, %phase, "action completed"),
            Err(err) => {
                tracing::warn!(%selector, %vault, reached = %phase, error = %err, "action failed");
                phase = phase.fail();
                tracing::debug!(%phase, "call ended");
            }
        }
        result
    }

    /// Entry point for a raw call: `selector ++ abi(address vault, bytes actionArgs, bytes assetData)`.
    fn execute_calldata<H>(&self, host: &mut H, caller: Address, calldata: &[u8]) -> Result<(), Error>
    where
        H: Host + ?Sized,
    {
        // Checked here as well as in `execute` so a stranger gets `Unauthorized`, never a
        // calldata decode error.
        self.base().authorize(caller)?;
        let (selector, params) = split_selector(calldata)?;
        let decoded = <(Address, Bytes, Bytes)>::abi_decode_params(params)
            .map_err(|e| abi_error("call parameters", &e))?;
        ensure_canonical("call parameters", params, &decoded.abi_encode_params())?;
        let (vault, action_args, asset_data) = decoded;
        self.execute(host, caller, vault, selector, &action_args, &asset_data)
    }
}

fn parse_action<A, O>(
    adapter: &A,
    oracle: &O,
    kind: ActionKind,
    action_args: &[u8],
) -> Result<ResourceManifest, Error>
where
    A: IntegrationAdapter + ?Sized,
    O: ReceiptAssetOracle + ?Sized,
{
    let manifest = match kind {
        ActionKind::Lend => adapter.parse_lend(oracle, action_args)?,
        ActionKind::Redeem => adapter.parse_redeem(oracle, action_args)?,
        ActionKind::ClaimRewards => adapter.parse_claim_rewards(action_args)?,
    };
    manifest.validate()?;
    tracing::debug!(action = %kind, handle = %manifest.handle_type, "parsed action");
    Ok(manifest)
}

/// The asset data handed to execute must be exactly what the parsed action declares.
fn check_asset_data(
    kind: ActionKind,
    asset_data: &AssetData,
    manifest: &ResourceManifest,
) -> Result<(), Error> {
    if *asset_data == manifest.asset_data() {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "asset data does not match the {kind} action arguments"
        )))
    }
}

#[expect(
    clippy::too_many_arguments,
    reason = "mirrors execute plus the phase tracker"
)]
fn run_action<A, H>(
    adapter: &A,
    host: &mut H,
    phase: &mut CallPhase,
    caller: Address,
    vault: Address,
    selector: Selector,
    action_args: &[u8],
    asset_data: &[u8],
) -> Result<(), Error>
where
    A: IntegrationAdapter + ?Sized,
    H: Host + ?Sized,
{
    let base = adapter.base();
    base.authorize(caller)?;
    *phase = phase.advance();

    let call = base.enter(vault)?;
    let kind = ActionKind::from_selector(selector)?;
    let manifest = parse_action(adapter, &*host, kind, action_args)?;
    let asset_data = AssetData::decode(asset_data)?;
    check_asset_data(kind, &asset_data, &manifest)?;
    *phase = phase.advance();

    tracing::debug!(action = %kind, %vault, "dispatching action");
    *phase = phase.advance();
    match kind {
        ActionKind::Lend => adapter.lend(host, &call, action_args, &asset_data)?,
        ActionKind::Redeem => adapter.redeem(host, &call, action_args, &asset_data)?,
        ActionKind::ClaimRewards => adapter.claim_rewards(host, &call, action_args, &asset_data)?,
    }
    *phase = phase.advance();
    Ok(())
}

fn split_selector(calldata: &[u8]) -> Result<(Selector, &[u8]), Error> {
    match calldata.split_first_chunk::<4>() {
        Some((selector, params)) => Ok((Selector::new(*selector), params)),
        None => Err(Error::malformed(format!(
            "calldata of {} bytes has no selector",
            calldata.len()
        ))),
    }
}

/// Builds the calldata the integration manager sends for `kind`.
pub fn encode_action_call(
    kind: ActionKind,
    vault: Address,
    action_args: &[u8],
    asset_data: &[u8],
) -> Vec<u8> {
    let params = (
        vault,
        Bytes::copy_from_slice(action_args),
        Bytes::copy_from_slice(asset_data),
    )
        .abi_encode_params();
    let mut calldata = Vec::with_capacity(4 + params.len());
    calldata.extend_from_slice(kind.selector().as_slice());
    calldata.extend_from_slice(&params);
    calldata
}
