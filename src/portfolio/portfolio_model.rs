use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A portfolio owns a base currency and a set of transactions; all derived
/// valuation is expressed in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub base_currency: String,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
