//! Notification Hub
//!
//! Decouples the single inbound notification stream from the
//! independently-rendered views. The hub is a plain multicast registry:
//! no filtering, no buffering, no state machine. Each consumer decides
//! for itself whether a notification's kind is relevant and re-pulls
//! its own data through the data-access layer.
//!
//! Dispatch is synchronous and in registration order. A consumer that
//! panics is isolated: the panic is caught, logged, and delivery
//! continues with the next consumer. Registering the same closure twice
//! creates two independent entries; each must be unsubscribed through
//! its own handle.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::domain::notification::Notification;

/// A registered consumer callback.
pub type Subscriber = Arc<dyn Fn(&Notification) + Send + Sync + 'static>;

struct Entry {
    id: u64,
    callback: Subscriber,
}

/// Multicast registry for server-pushed change notifications.
#[derive(Default)]
pub struct NotificationHub {
    registry: Arc<Mutex<Vec<Entry>>>,
    next_id: AtomicU64,
}

impl NotificationHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer callback.
    ///
    /// The callback receives every notification published after this
    /// call, until the returned handle is unsubscribed. Dropping the
    /// handle without unsubscribing leaves the subscription alive.
    #[must_use = "dropping the handle makes the subscription permanent"]
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.lock().push(Entry {
            id,
            callback: Arc::new(callback),
        });

        SubscriptionHandle {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver a notification to every currently registered consumer.
    ///
    /// Consumers are invoked synchronously, in registration order,
    /// against the registry as it stood when `publish` was called:
    /// a consumer registered mid-dispatch does not receive this
    /// notification, and one unsubscribed mid-dispatch may still see
    /// it. Returns the number of consumers invoked.
    pub fn publish(&self, notification: &Notification) -> usize {
        // Snapshot so consumer callbacks can freely subscribe or
        // unsubscribe without holding the registry lock.
        let snapshot: Vec<Subscriber> = self
            .registry
            .lock()
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect();

        for callback in &snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(notification))) {
                let reason = panic_message(&panic);
                tracing::warn!(
                    kind = %notification.kind(),
                    reason,
                    "notification consumer panicked; continuing dispatch"
                );
            }
        }

        snapshot.len()
    }

    /// Get the number of registered consumers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`NotificationHub::subscribe`].
///
/// Unsubscribing removes exactly the entry created by that `subscribe`
/// call and is idempotent.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: u64,
    registry: Weak<Mutex<Vec<Entry>>>,
}

impl SubscriptionHandle {
    /// Remove this subscription from the hub.
    ///
    /// A no-op if the subscription was already removed or the hub is
    /// gone.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().retain(|entry| entry.id != self.id);
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}
