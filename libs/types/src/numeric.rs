//! Native-currency amounts
//!
//! Amounts are unsigned integers in the smallest native unit (wei). There is
//! no fractional arithmetic anywhere in the contract; `format_ether` exists
//! only for human-readable output.

/// Amount in the smallest native-currency unit
pub type Wei = u128;

/// Number of wei in one whole native coin
pub const WEI_PER_ETHER: Wei = 1_000_000_000_000_000_000;

/// Render `amount` as a decimal number of whole coins, trimming trailing zeros.
pub fn format_ether(amount: Wei) -> String {
    let whole = amount / WEI_PER_ETHER;
    let frac = amount % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:018}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Serde adapter carrying a [`Wei`] as a decimal string, so amounts above
/// 2^53 survive JSON tooling that parses numbers as doubles.
pub mod wei_str {
    use super::Wei;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Wei, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}

/// [`wei_str`] for optional amounts. Pair with `#[serde(default)]`.
pub mod wei_str_opt {
    use super::Wei;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Option<Wei>, serializer: S) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => serializer.collect_str(amount),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Wei>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| s.trim().parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payment {
        #[serde(with = "wei_str")]
        amount: Wei,
        #[serde(default, with = "wei_str_opt")]
        tip: Option<Wei>,
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(3 * WEI_PER_ETHER), "3");
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_ether(WEI_PER_ETHER + WEI_PER_ETHER / 2), "1.5");
        assert_eq!(format_ether(1), "0.000000000000000001");
    }

    #[test]
    fn test_wei_str_keeps_full_precision() {
        let payment = Payment {
            amount: u128::MAX,
            tip: Some(7),
        };
        let json = serde_json::to_string(&payment).unwrap();
        assert_eq!(
            json,
            format!("{{\"amount\":\"{}\",\"tip\":\"7\"}}", u128::MAX)
        );
        let back: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payment);
    }

    #[test]
    fn test_wei_str_opt_missing_is_none() {
        let payment: Payment = serde_json::from_str(r#"{"amount":"100"}"#).unwrap();
        assert_eq!(payment.tip, None);
        assert_eq!(payment.amount, 100);
    }

    #[test]
    fn test_wei_str_rejects_negative() {
        let result: Result<Payment, _> = serde_json::from_str(r#"{"amount":"-5"}"#);
        assert!(result.is_err());
    }
}
