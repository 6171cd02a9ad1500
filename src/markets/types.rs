use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::Display;

/// Where a read was ultimately served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataSource {
    #[strum(serialize = "api")]
    Api,
    #[strum(serialize = "chain")]
    Chain,
}

/// Numbers from the DLMM API arrive as numbers, numeric strings or null.
pub(crate) fn de_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().map_err(de::Error::custom)?,
        Value::Number(num) => num.as_f64().ok_or(de::Error::custom("Invalid number"))?,
        Value::Null => 0.0,
        _ => return Err(de::Error::custom("wrong type")),
    })
}

pub(crate) fn de_opt_rating<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse().map_err(de::Error::custom)?),
        Value::Number(num) => Some(num.as_f64().ok_or(de::Error::custom("Invalid number"))?),
        _ => return Err(de::Error::custom("wrong type")),
    })
}

pub(crate) fn de_opt_i64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse().map_err(de::Error::custom)?),
        Value::Number(num) => Some(num.as_i64().ok_or(de::Error::custom("Invalid integer"))?),
        _ => return Err(de::Error::custom("wrong type")),
    })
}

/// Text fields may come back as null.
pub(crate) fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(num) => num.to_string(),
        _ => return Err(de::Error::custom("wrong type")),
    })
}

/// Liquidity is kept as the API's string; a bare number is rendered back to text.
pub(crate) fn de_liquidity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(num) => num.to_string(),
        Value::Null => String::from("0"),
        _ => return Err(de::Error::custom("wrong type")),
    })
}

fn default_liquidity() -> String {
    String::from("0")
}

/// One entry of `GET /pair/all`, or the body of `GET /pair/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairInfo {
    #[serde(default, deserialize_with = "de_string")]
    pub address: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub mint_x: String,
    #[serde(default, deserialize_with = "de_string")]
    pub mint_y: String,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub active_bin_id: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub bin_step: Option<i64>,
    #[serde(default, deserialize_with = "de_rating")]
    pub fees_24h: f64,
    #[serde(default, deserialize_with = "de_opt_rating")]
    pub volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_rating")]
    pub trade_volume_24h: Option<f64>,
    #[serde(default = "default_liquidity", deserialize_with = "de_liquidity")]
    pub liquidity: String,
    #[serde(default, deserialize_with = "de_opt_rating")]
    pub current_price: Option<f64>,
}

impl Default for PairInfo {
    fn default() -> Self {
        Self {
            address: String::new(),
            name: String::new(),
            mint_x: String::new(),
            mint_y: String::new(),
            active_bin_id: None,
            bin_step: None,
            fees_24h: 0.0,
            volume_24h: None,
            trade_volume_24h: None,
            liquidity: default_liquidity(),
            current_price: None,
        }
    }
}

impl PairInfo {
    /// Older API revisions publish `volume_24h`, current ones `trade_volume_24h`.
    pub fn volume_24h(&self) -> f64 {
        self.volume_24h.or(self.trade_volume_24h).unwrap_or(0.0)
    }

    /// Unparseable liquidity counts as zero.
    pub fn liquidity_value(&self) -> f64 {
        self.liquidity.trim().parse::<f64>().unwrap_or(0.0)
    }
}

/// Output of `get_pool_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub pool_address: String,
    pub name: String,
    pub token_x: String,
    pub token_y: String,
    pub active_bin_id: Option<i64>,
    #[serde(rename = "fees24h")]
    pub fees_24h: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub liquidity: String,
    pub current_price: Option<f64>,
    pub bin_step: Option<i64>,
}

impl PoolInfo {
    pub fn from_pair(pool_address: &str, pair: &PairInfo) -> Self {
        Self {
            pool_address: pool_address.to_string(),
            name: pair.name.clone(),
            token_x: pair.mint_x.clone(),
            token_y: pair.mint_y.clone(),
            active_bin_id: pair.active_bin_id,
            fees_24h: pair.fees_24h,
            volume_24h: pair.volume_24h(),
            liquidity: pair.liquidity.clone(),
            current_price: pair.current_price,
            bin_step: pair.bin_step,
        }
    }
}

/// Output row of `get_popular_pools`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub address: String,
    pub name: String,
    pub token_x: String,
    pub token_y: String,
    pub liquidity: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    #[serde(rename = "fees24h")]
    pub fees_24h: f64,
}

impl From<&PairInfo> for PoolSummary {
    fn from(pair: &PairInfo) -> Self {
        Self {
            address: pair.address.clone(),
            name: pair.name.clone(),
            token_x: pair.mint_x.clone(),
            token_y: pair.mint_y.clone(),
            liquidity: pair.liquidity.clone(),
            volume_24h: pair.volume_24h(),
            fees_24h: pair.fees_24h,
        }
    }
}

/// A position found on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub position_address: String,
    pub pool_address: String,
}

/// Raw fee amounts owed to a position, in token base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimableFees {
    pub fee_x: u64,
    pub fee_y: u64,
}

/// Output of `get_claimable_fees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableFeesReport {
    pub position_address: String,
    pub pool_address: String,
    pub pool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_x: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_y: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Output of `get_active_bin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBin {
    pub pool_address: String,
    pub token_x: String,
    pub token_y: String,
    pub active_bin_id: i32,
    pub bin_step: u16,
    pub active_price: f64,
}
