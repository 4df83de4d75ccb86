use super::Shaped;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A `spot.balances` update for one currency of the signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub timestamp: String,
    pub timestamp_ms: String,
    pub user: String,
    pub currency: String,
    pub change: Decimal,
    pub total: Decimal,
    pub available: Decimal,
}

/// Balances take no arguments but must be signed.
pub(crate) fn balances_payload() -> Shaped {
    Shaped {
        payload: None,
        requires_auth: true,
    }
}

#[cfg(test)]
mod tests {
    use crate::channels::{ChannelResult, Subscription};
    use crate::models::Response;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_balances_shape_requires_auth() {
        let shaped = Subscription::Balances.shape();
        assert_eq!(shaped.payload, None);
        assert!(shaped.requires_auth);
    }

    #[test]
    fn test_balance_update_decodes_list() {
        let response: Response = serde_json::from_value(json!({
            "time": 1605248616,
            "channel": "spot.balances",
            "event": "update",
            "result": [{
                "timestamp": "1605248616",
                "timestamp_ms": "1605248616123",
                "user": "1000001",
                "currency": "USDT",
                "change": "100",
                "total": "1032951.325075926",
                "available": "1022943.325075926"
            }]
        }))
        .unwrap();

        assert!(response.is_balances());
        match response.channel_result() {
            ChannelResult::Balances(balances) => {
                assert_eq!(balances.len(), 1);
                assert_eq!(balances[0].currency, "USDT");
                assert_eq!(balances[0].change, dec!(100));
                assert_eq!(balances[0].available, dec!(1022943.325075926));
            }
            other => panic!("Expected Balances, got {:?}", other),
        }
    }
}
