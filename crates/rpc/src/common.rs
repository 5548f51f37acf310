use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};
use std::fmt;

/// Largest magnitude below which every integral `f64` is exact (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Which on-chain reads contributed to a balance response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSource {
    /// native and contract balances were both read
    Both,
    /// the contract read failed; only the native balance is real
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInfo {
    pub address: String,
    pub native_balance: String,
    pub contract_balance: String,
    /// mirrors `native_balance` for older dashboard builds
    pub balance: String,
    pub source: BalanceSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemBalanceInfo {
    pub address: String,
    pub gem_balance: String,
    pub base_gem_balance: String,
    pub modifier_amount: String,
    pub ron_balance: String,
    pub conversion_rate: u64,
}

/// A modifier ledger entry as exposed over the API.
///
/// A wallet that was never adjusted is reported with only `wallet_address`
/// and a zero `gem_modifier`; the remaining fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierEntryInfo {
    pub wallet_address: String,
    pub gem_modifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// unix millis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ModifierEntryInfo {
    pub fn untouched(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            gem_modifier: "0".to_string(),
            sequence: None,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Numeric request field; the dashboard sends either JSON numbers or strings.
///
/// JSON numbers are only accepted while their digits survive parsing: any
/// integer that fits 64 bits, or a float below 2^53 printed without an
/// exponent. Anything larger has to be sent as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(Number),
}

fn is_exact(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64()
        .is_some_and(|f| f.is_finite() && f.abs() < MAX_EXACT_FLOAT && !n.to_string().contains('e'))
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(AmountInput::Text(s)),
            Value::Number(n) if is_exact(&n) => Ok(AmountInput::Number(n)),
            Value::Number(n) => Err(de::Error::custom(format!(
                "amount {n} cannot be represented exactly, send it as a string"
            ))),
            other => Err(de::Error::custom(format!(
                "amount must be a number or a string, got {other}"
            ))),
        }
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountInput::Text(s) => f.write_str(s.trim()),
            AmountInput::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierChangeRequest {
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub from_address: String,
    pub to_address: String,
    pub amount: AmountInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub id: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: String,
    pub tx_hash: Option<String>,
    pub status: String,
    /// unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(json: &str) -> Result<AmountInput, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn integers_and_short_decimals_keep_their_digits() {
        assert_eq!(amount("42").unwrap().to_string(), "42");
        assert_eq!(amount("-7").unwrap().to_string(), "-7");
        assert_eq!(amount("18446744073709551615").unwrap().to_string(), "18446744073709551615");
        assert_eq!(amount("1.5").unwrap().to_string(), "1.5");
        assert_eq!(amount(r#"" 250 ""#).unwrap().to_string(), "250");
    }

    #[test]
    fn numbers_beyond_exact_range_must_be_strings() {
        let err = amount("100000000000000000000").unwrap_err();
        assert!(err.to_string().contains("send it as a string"), "{err}");
        assert!(amount("9007199254740993.5").is_err());
        assert_eq!(
            amount(r#""100000000000000000000""#).unwrap().to_string(),
            "100000000000000000000"
        );
    }

    #[test]
    fn other_json_types_are_refused() {
        assert!(amount("true").is_err());
        assert!(amount("[1]").is_err());
    }

    #[test]
    fn missing_modifier_amount_is_none() {
        let req: ModifierChangeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.amount, None);
        let req: ModifierChangeRequest =
            serde_json::from_str(r#"{"amount": "5", "description": "bonus"}"#).unwrap();
        assert_eq!(req.amount, Some(AmountInput::from("5")));
    }
}
