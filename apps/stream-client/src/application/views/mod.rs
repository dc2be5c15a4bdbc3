//! View Interest Sets
//!
//! The contract between the core and the dashboard views: which
//! notification kinds should make which view re-pull its data. The
//! core performs no filtering — these helpers run inside the view's
//! own consumer callback.
//!
//! Views refresh independently and redundantly; a position change
//! triggers both the positions table and the aggregate stats view,
//! and each re-pulls its own snapshot from the data-access layer.

use std::sync::Arc;

use crate::domain::notification::{Notification, NotificationKind};
use crate::infrastructure::hub::{NotificationHub, SubscriptionHandle};

/// A dashboard view with live-updated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Aggregate stats landing view.
    Dashboard,
    /// Positions table.
    Positions,
    /// Withdrawals table.
    Withdrawals,
    /// Monthly income table.
    MonthlyIncome,
}

impl View {
    /// All live-updated views.
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Positions,
        Self::Withdrawals,
        Self::MonthlyIncome,
    ];

    /// Check whether a notification of `kind` should make this view
    /// re-pull its data.
    #[must_use]
    pub const fn is_interested(&self, kind: NotificationKind) -> bool {
        use NotificationKind::{
            MonthlyIncomeCreated, MonthlyIncomeDeleted, PositionCreated, PositionDeleted,
            PositionsUpdate, WithdrawalCreated, WithdrawalDeleted,
        };

        match self {
            // Aggregate stats are derived from positions.
            Self::Dashboard | Self::Positions => matches!(
                kind,
                PositionsUpdate | PositionCreated | PositionDeleted
            ),
            Self::Withdrawals => matches!(kind, WithdrawalCreated | WithdrawalDeleted),
            Self::MonthlyIncome => {
                matches!(kind, MonthlyIncomeCreated | MonthlyIncomeDeleted)
            }
        }
    }

    /// Get the view name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Positions => "positions",
            Self::Withdrawals => "withdrawals",
            Self::MonthlyIncome => "monthly_income",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register a refresh trigger for `view` on the hub.
///
/// `refresh` runs for every notification whose kind the view is
/// interested in; it receives the notification so a view may use the
/// payload opportunistically, but must tolerate its absence. Returns
/// the unsubscribe handle, which the view must keep and invoke on
/// teardown.
#[must_use = "dropping the handle makes the subscription permanent"]
pub fn subscribe_view<F>(
    hub: &Arc<NotificationHub>,
    view: View,
    refresh: F,
) -> SubscriptionHandle
where
    F: Fn(&Notification) + Send + Sync + 'static,
{
    hub.subscribe(move |notification| {
        if view.is_interested(notification.kind()) {
            refresh(notification);
        }
    })
}
