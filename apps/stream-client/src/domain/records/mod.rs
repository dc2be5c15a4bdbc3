//! Dashboard Record Types
//!
//! Shapes of the trading records the backend serves and embeds in push
//! notifications. Field names match the backend's JSON (camelCase).
//! The CRUD layer that lists and mutates these records is an external
//! collaborator; these types only describe its boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed trading position synced from an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Record identifier.
    pub id: i64,
    /// Exchange-assigned order identifier.
    pub order_id: String,
    /// Exchange name (e.g. "bybit", "gate").
    pub exchange: String,
    /// Traded symbol.
    pub symbol: String,
    /// Cumulative exit value.
    pub cum_exit_value: Decimal,
    /// Position size.
    pub qty: Decimal,
    /// Leverage used.
    pub leverage: i32,
    /// Realized profit and loss.
    pub closed_pnl: Decimal,
    /// Position side ("Buy" or "Sell").
    pub side: String,
    /// Close timestamp.
    pub date: DateTime<Utc>,
}

/// A withdrawal from an exchange account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Record identifier.
    pub id: i64,
    /// Exchange name.
    pub exchange: String,
    /// Withdrawn amount.
    pub amount: Decimal,
    /// Currency of the withdrawal.
    pub currency: String,
    /// Withdrawal timestamp.
    pub date: DateTime<Utc>,
}

/// A monthly income record per exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    /// Record identifier.
    pub id: i64,
    /// Exchange name.
    pub exchange: String,
    /// Income amount.
    pub amount: Decimal,
    /// Profit and loss for the month.
    pub pnl: Decimal,
    /// Month timestamp.
    pub date: DateTime<Utc>,
}
