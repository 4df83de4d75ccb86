use super::Shaped;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A `spot.trades` update: one public trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeUpdate {
    pub id: u64,
    /// Unix seconds.
    pub create_time: i64,
    /// Unix milliseconds with fractional part, sent as a string.
    pub create_time_ms: Decimal,
    pub side: TradeSide,
    pub currency_pair: String,
    pub amount: Decimal,
    pub price: Decimal,
}

pub(crate) fn trades_payload(currency_pairs: &[String]) -> Shaped {
    Shaped {
        payload: Some(Value::from(currency_pairs.to_vec())),
        requires_auth: false,
    }
}
