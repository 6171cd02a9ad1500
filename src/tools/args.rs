use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;

use crate::common::utils::from_str;
use crate::markets::errors::{DlmmError, DlmmResult};

pub fn required_str<'a>(args: &'a Value, key: &'static str) -> DlmmResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(DlmmError::MissingArgument(key))
}

pub fn required_pubkey(args: &Value, key: &'static str) -> DlmmResult<Pubkey> {
    from_str(required_str(args, key)?)
}

/// A positive integer, given as a number or a numeric string. Anything else yields `None`.
pub fn optional_positive(args: &Value, key: &str) -> Option<usize> {
    let value = match args.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if value.is_finite() && value >= 1.0 {
        Some(value.floor() as usize)
    } else {
        None
    }
}

/// JSON schema for an object of required string properties.
pub fn string_props_schema(props: &[(&str, &str)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, description) in props {
        properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
    }
    let required: Vec<&str> = props.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
