use alloy_primitives::{Address, Selector};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unauthorized caller {caller}: only the integration manager can call this function")]
    Unauthorized { caller: Address },

    #[error("unsupported action selector {selector}")]
    UnsupportedAction { selector: Selector },

    #[error("unsupported receipt asset {asset}")]
    UnsupportedAsset { asset: Address },

    #[error("malformed arguments: {reason}")]
    MalformedArguments { reason: String },

    #[error("unsupported rewards registry {actual}, expected {expected}")]
    UnsupportedRegistry { expected: Address, actual: Address },

    #[error("reentrant call into adapter")]
    Reentrant,

    #[error("external call failed: {reason}")]
    ExternalCall { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedArguments {
            reason: reason.into(),
        }
    }
}
