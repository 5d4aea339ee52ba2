use alloy_primitives::{Selector, hex};
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;

use crate::dispatch::ActionKind;
use crate::dispatch::adapters::IntegrationAdapter;
use crate::dispatch::host::StaticReceiptOracle;
use crate::protocols::compound::CompoundAdapter;
use crate::types::AdapterConfig;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

/// Every supported action with its selector.
#[wasm_bindgen]
pub fn supported_actions() -> JsValue {
    let actions: Vec<serde_json::Value> = ActionKind::iter()
        .map(|kind| {
            serde_json::json!({
                "name": kind.as_ref(),
                "signature": kind.signature(),
                "selector": kind.selector().to_string(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(actions))
}

/// Resource manifest for `selector`/`args` without executing anything.
///
/// `oracle_json` maps receipt assets to underlyings: `{"0xc...": "0xa..."}`.
#[wasm_bindgen]
pub fn describe_action(
    config_json: &str,
    selector_hex: &str,
    args_hex: &str,
    oracle_json: &str,
) -> JsValue {
    let config = match AdapterConfig::from_json_str(config_json) {
        Ok(c) => c,
        Err(e) => return error_result(&format!("Invalid config: {e}")),
    };
    let Ok(selector) = selector_hex.parse::<Selector>() else {
        return error_result("Invalid selector hex");
    };
    let Ok(args) = hex::decode(args_hex) else {
        return error_result("Invalid args hex");
    };
    let oracle = match StaticReceiptOracle::from_json_str(oracle_json) {
        Ok(o) => o,
        Err(e) => return error_result(&format!("Invalid oracle table: {e}")),
    };

    let adapter = CompoundAdapter::from_config(&config);
    match adapter.describe(&oracle, selector, &args) {
        Ok(manifest) => match serde_json::to_value(&manifest) {
            Ok(mut value) => {
                value["encoded"] =
                    serde_json::Value::String(hex::encode_prefixed(manifest.abi_encode()));
                to_js(&value)
            }
            Err(e) => error_result(&e.to_string()),
        },
        Err(e) => error_result(&e.to_string()),
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}
