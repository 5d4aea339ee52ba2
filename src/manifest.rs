use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use serde::Serialize;

use crate::error::Error;

/// How the integration manager hands spend assets to the adapter before the call.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SpendAssetsHandleType {
    None = 0,
    Approve = 1,
    Transfer = 2,
}

impl SpendAssetsHandleType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Resources an action declares before it runs.
///
/// `spend_assets[i]` is debited up to `spend_asset_amounts[i]`; `incoming_assets[i]` must be
/// credited with at least `min_incoming_asset_amounts[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManifest {
    pub handle_type: SpendAssetsHandleType,
    pub spend_assets: Vec<Address>,
    pub spend_asset_amounts: Vec<U256>,
    pub incoming_assets: Vec<Address>,
    pub min_incoming_asset_amounts: Vec<U256>,
}

impl ResourceManifest {
    /// A manifest that moves nothing through the adapter.
    pub fn empty() -> Self {
        Self {
            handle_type: SpendAssetsHandleType::None,
            spend_assets: Vec::new(),
            spend_asset_amounts: Vec::new(),
            incoming_assets: Vec::new(),
            min_incoming_asset_amounts: Vec::new(),
        }
    }

    pub fn single(
        handle_type: SpendAssetsHandleType,
        spend_asset: Address,
        spend_amount: U256,
        incoming_asset: Address,
        min_incoming_amount: U256,
    ) -> Self {
        Self {
            handle_type,
            spend_assets: vec![spend_asset],
            spend_asset_amounts: vec![spend_amount],
            incoming_assets: vec![incoming_asset],
            min_incoming_asset_amounts: vec![min_incoming_amount],
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.spend_assets.len() != self.spend_asset_amounts.len() {
            return Err(Error::malformed(format!(
                "{} spend assets but {} spend amounts",
                self.spend_assets.len(),
                self.spend_asset_amounts.len()
            )));
        }
        if self.incoming_assets.len() != self.min_incoming_asset_amounts.len() {
            return Err(Error::malformed(format!(
                "{} incoming assets but {} minimum amounts",
                self.incoming_assets.len(),
                self.min_incoming_asset_amounts.len()
            )));
        }
        Ok(())
    }

    /// The asset data the integration manager passes back when executing this action.
    pub fn asset_data(&self) -> AssetData {
        AssetData {
            spend_assets: self.spend_assets.clone(),
            spend_asset_amounts: self.spend_asset_amounts.clone(),
            incoming_assets: self.incoming_assets.clone(),
        }
    }

    /// ABI return data: `(uint8, address[], uint256[], address[], uint256[])`.
    pub fn abi_encode(&self) -> Vec<u8> {
        (
            U256::from(self.handle_type.as_u8()),
            self.spend_assets.clone(),
            self.spend_asset_amounts.clone(),
            self.incoming_assets.clone(),
            self.min_incoming_asset_amounts.clone(),
        )
            .abi_encode_params()
    }
}

/// Spend and incoming assets forwarded to an action at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetData {
    pub spend_assets: Vec<Address>,
    pub spend_asset_amounts: Vec<U256>,
    pub incoming_assets: Vec<Address>,
}

impl AssetData {
    pub fn new(
        spend_assets: Vec<Address>,
        spend_asset_amounts: Vec<U256>,
        incoming_assets: Vec<Address>,
    ) -> Result<Self, Error> {
        if spend_assets.len() != spend_asset_amounts.len() {
            return Err(Error::malformed(format!(
                "asset data: {} spend assets but {} spend amounts",
                spend_assets.len(),
                spend_asset_amounts.len()
            )));
        }
        Ok(Self {
            spend_assets,
            spend_asset_amounts,
            incoming_assets,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        (
            self.spend_assets.clone(),
            self.spend_asset_amounts.clone(),
            self.incoming_assets.clone(),
        )
            .abi_encode_params()
    }

    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let decoded = <(Vec<Address>, Vec<U256>, Vec<Address>)>::abi_decode_params(data)
            .map_err(|e| abi_error("asset data", &e))?;
        ensure_canonical("asset data", data, &decoded.abi_encode_params())?;
        let (spend_assets, spend_asset_amounts, incoming_assets) = decoded;
        Self::new(spend_assets, spend_asset_amounts, incoming_assets)
    }

    /// The only spend asset of a single-asset action, with its amount.
    pub fn sole_spend(&self) -> Result<(Address, U256), Error> {
        match (
            self.spend_assets.as_slice(),
            self.spend_asset_amounts.as_slice(),
        ) {
            ([asset], [amount]) => Ok((*asset, *amount)),
            _ => Err(Error::malformed(format!(
                "expected exactly one spend asset, got {}",
                self.spend_assets.len()
            ))),
        }
    }

    pub fn first_incoming(&self) -> Result<Address, Error> {
        self.incoming_assets
            .first()
            .copied()
            .ok_or_else(|| Error::malformed("expected at least one incoming asset"))
    }
}

pub(crate) fn abi_error(what: &str, err: &alloy_sol_types::Error) -> Error {
    Error::malformed(format!("{what}: {err}"))
}

/// Rejects blobs that decode but carry trailing bytes or non-canonical words.
pub(crate) fn ensure_canonical(what: &str, data: &[u8], reencoded: &[u8]) -> Result<(), Error> {
    if data == reencoded {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "{what}: expected {} canonical bytes, got {}",
            reencoded.len(),
            data.len()
        )))
    }
}
