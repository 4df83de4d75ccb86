use super::Shaped;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `spot.tickers` update for one currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerUpdate {
    pub currency_pair: String,
    pub last: Decimal,
    pub lowest_ask: Decimal,
    pub highest_bid: Decimal,
    /// 24h change in percent.
    pub change_percentage: Decimal,
    pub base_volume: Decimal,
    pub quote_volume: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
}

/// Tickers take the currency pair list as-is and need no signature.
pub(crate) fn tickers_payload(currency_pairs: &[String]) -> Shaped {
    Shaped {
        payload: Some(Value::from(currency_pairs.to_vec())),
        requires_auth: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ChannelResult, Subscription};
    use crate::models::Response;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_tickers_shape_passes_pairs_through() {
        let shaped = Subscription::tickers(["BTC_USDT", "ETH_USDT"]).shape();

        assert_eq!(shaped.payload, Some(json!(["BTC_USDT", "ETH_USDT"])));
        assert!(!shaped.requires_auth);
    }

    #[test]
    fn test_ticker_update_decodes_decimal_strings() {
        let response: Response = serde_json::from_value(json!({
            "time": 1606291803,
            "channel": "spot.tickers",
            "event": "update",
            "result": {
                "currency_pair": "BTC_USDT",
                "last": "19106.55",
                "lowest_ask": "19108",
                "highest_bid": "19106.55",
                "change_percentage": "3.66",
                "base_volume": "2811.3042155865",
                "quote_volume": "53441606.5241",
                "high_24h": "19417.74",
                "low_24h": "18434.21"
            }
        }))
        .unwrap();

        assert!(response.is_tickers());
        match response.channel_result() {
            ChannelResult::Tickers(ticker) => {
                assert_eq!(ticker.currency_pair, "BTC_USDT");
                assert_eq!(ticker.last, dec!(19106.55));
                assert_eq!(ticker.lowest_ask, dec!(19108));
                assert_eq!(ticker.change_percentage, dec!(3.66));
                assert_eq!(ticker.low_24h, dec!(18434.21));
            }
            other => panic!("Expected Tickers, got {:?}", other),
        }
    }
}
