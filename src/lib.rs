#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod protocols;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dispatch::adapters::{AdapterBase, IntegrationAdapter, encode_action_call};
pub use dispatch::host::{
    Host, LendingMarket, ReceiptAssetOracle, StaticReceiptOracle, TokenLedger, WrappedNativeAsset,
};
pub use dispatch::{ActionKind, AuthorizedCall, CallPhase, ReentrancyLock};
pub use error::Error;
pub use manifest::{AssetData, ResourceManifest, SpendAssetsHandleType};
pub use protocols::compound::CompoundAdapter;
pub use protocols::lending::LendingAdapter;
pub use protocols::{ClaimRewardsArgs, ReceiptAssetArgs};
pub use types::AdapterConfig;
