//! Change Notifications
//!
//! Typed representation of the messages the backend pushes over the
//! live-update channel. Each wire frame is a JSON object with a `type`
//! discriminator; the closed set of kinds below is decoded into one
//! variant each, with precisely-typed optional payload fields.
//!
//! Consumers dispatch on [`NotificationKind`] only. Every payload field
//! is optional and absent-tolerant: the backend has varied what it
//! attaches to a given kind over time, and the contract is "something
//! of this kind changed", not a data feed.

use serde::{Deserialize, Serialize};

use super::records::{MonthlyIncome, Position, Withdrawal};

/// Kind discriminator for a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A bulk position sync completed.
    PositionsUpdate,
    /// A position record was created.
    PositionCreated,
    /// A position record was deleted.
    PositionDeleted,
    /// A withdrawal record was created.
    WithdrawalCreated,
    /// A withdrawal record was deleted.
    WithdrawalDeleted,
    /// A monthly income record was created.
    MonthlyIncomeCreated,
    /// A monthly income record was deleted.
    MonthlyIncomeDeleted,
}

impl NotificationKind {
    /// All recognized kinds, in wire-name order.
    pub const ALL: [Self; 7] = [
        Self::PositionsUpdate,
        Self::PositionCreated,
        Self::PositionDeleted,
        Self::WithdrawalCreated,
        Self::WithdrawalDeleted,
        Self::MonthlyIncomeCreated,
        Self::MonthlyIncomeDeleted,
    ];

    /// Get the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PositionsUpdate => "positions_update",
            Self::PositionCreated => "position_created",
            Self::PositionDeleted => "position_deleted",
            Self::WithdrawalCreated => "withdrawal_created",
            Self::WithdrawalDeleted => "withdrawal_deleted",
            Self::MonthlyIncomeCreated => "monthly_income_created",
            Self::MonthlyIncomeDeleted => "monthly_income_deleted",
        }
    }

    /// Look up a kind by its wire name.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed server-pushed change notification.
///
/// Constructed only by decoding an inbound frame, immutable, and
/// discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A bulk sync replaced the position set for an exchange.
    PositionsUpdate {
        /// The synced positions, when the backend includes them.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        positions: Option<Vec<Position>>,
        /// Number of positions synced.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
        /// Exchange the sync ran against.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exchange: Option<String>,
    },
    /// A position record was created.
    PositionCreated {
        /// The created record.
        #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// A position record was deleted.
    PositionDeleted {
        /// Identifier of the deleted record. The backend has emitted
        /// this under `postId` as well; both spellings are accepted.
        #[serde(
            default,
            rename = "positionId",
            alias = "postId",
            skip_serializing_if = "Option::is_none"
        )]
        position_id: Option<i64>,
    },
    /// A withdrawal record was created.
    WithdrawalCreated {
        /// The created record.
        #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
        withdrawal: Option<Withdrawal>,
    },
    /// A withdrawal record was deleted.
    WithdrawalDeleted {
        /// Identifier of the deleted record.
        #[serde(
            default,
            rename = "withdrawalId",
            skip_serializing_if = "Option::is_none"
        )]
        withdrawal_id: Option<i64>,
    },
    /// A monthly income record was created.
    MonthlyIncomeCreated {
        /// The created record.
        #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
        income: Option<MonthlyIncome>,
    },
    /// A monthly income record was deleted.
    MonthlyIncomeDeleted {
        /// Identifier of the deleted record.
        #[serde(default, rename = "incomeId", skip_serializing_if = "Option::is_none")]
        income_id: Option<i64>,
    },
}

impl Notification {
    /// Get the kind of this notification.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::PositionsUpdate { .. } => NotificationKind::PositionsUpdate,
            Self::PositionCreated { .. } => NotificationKind::PositionCreated,
            Self::PositionDeleted { .. } => NotificationKind::PositionDeleted,
            Self::WithdrawalCreated { .. } => NotificationKind::WithdrawalCreated,
            Self::WithdrawalDeleted { .. } => NotificationKind::WithdrawalDeleted,
            Self::MonthlyIncomeCreated { .. } => NotificationKind::MonthlyIncomeCreated,
            Self::MonthlyIncomeDeleted { .. } => NotificationKind::MonthlyIncomeDeleted,
        }
    }
}
