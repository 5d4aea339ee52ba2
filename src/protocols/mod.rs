pub mod compound;
pub mod lending;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;

use crate::error::Error;
use crate::manifest::{abi_error, ensure_canonical};

/// Arguments shared by lend and redeem: `(address receiptAsset, uint256 outgoingAmount,
/// uint256 minIncomingAmount)`.
///
/// For lend the outgoing amount is underlying and the minimum is receipt tokens; redeem
/// flips both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptAssetArgs {
    pub receipt_asset: Address,
    pub outgoing_amount: U256,
    pub min_incoming_amount: U256,
}

impl ReceiptAssetArgs {
    pub fn new(receipt_asset: Address, outgoing_amount: U256, min_incoming_amount: U256) -> Self {
        Self {
            receipt_asset,
            outgoing_amount,
            min_incoming_amount,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        (
            self.receipt_asset,
            self.outgoing_amount,
            self.min_incoming_amount,
        )
            .abi_encode_params()
    }

    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let decoded = <(Address, U256, U256)>::abi_decode_params(data)
            .map_err(|e| abi_error("receipt asset args", &e))?;
        ensure_canonical("receipt asset args", data, &decoded.abi_encode_params())?;
        let (receipt_asset, outgoing_amount, min_incoming_amount) = decoded;
        Ok(Self::new(receipt_asset, outgoing_amount, min_incoming_amount))
    }
}

/// `(address[] receiptAssets, address rewardsRegistry)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRewardsArgs {
    pub receipt_assets: Vec<Address>,
    pub registry: Address,
}

impl ClaimRewardsArgs {
    pub fn new(receipt_assets: Vec<Address>, registry: Address) -> Self {
        Self {
            receipt_assets,
            registry,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        (self.receipt_assets.clone(), self.registry).abi_encode_params()
    }

    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let decoded = <(Vec<Address>, Address)>::abi_decode_params(data)
            .map_err(|e| abi_error("claim rewards args", &e))?;
        ensure_canonical("claim rewards args", data, &decoded.abi_encode_params())?;
        let (receipt_assets, registry) = decoded;
        Ok(Self::new(receipt_assets, registry))
    }
}
