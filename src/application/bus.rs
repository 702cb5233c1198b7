use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, trace};

use crate::domain::event::{Event, EventPayload};

/// Callback invoked once per published event.
///
/// Callbacks run synchronously on the publisher's thread and must return
/// quickly; slow work (database writes, network calls) must be handed off to
/// a task. Calling [`EventBus::publish`] from inside a callback is not
/// supported; `subscribe` and `unsubscribe` are.
pub type EventCallback = dyn Fn(&Event) + Send + Sync;

/// Handle returned by [`EventBus::subscribe`], used to cancel the
/// subscription. Dropping the handle does not cancel; consumers release
/// their registration explicitly on teardown.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

/// In-process registry of subscribers with synchronous, ordered fan-out.
///
/// Every subscriber registered at publish time observes every published
/// event, in one global publish order. Delivery is at-most-once: no retry,
/// no replay for late subscribers. A panicking subscriber is isolated and
/// reported to the log; the remaining subscribers still receive the event.
///
/// The bus imposes no cap on subscriber count; `publish` is linear in the
/// number of subscribers, so callers opening many registrations (dashboard
/// tabs, test harnesses) should watch [`EventBus::subscriber_count`].
pub struct EventBus {
    subscribers: Mutex<HashMap<u64, Arc<EventCallback>>>,
    next_id: AtomicU64,
    // Serializes complete fan-outs so all subscribers see one event order.
    delivery: Mutex<()>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            delivery: Mutex::new(()),
        }
    }

    /// Registers a callback for all events published after this call.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry().insert(id, Arc::new(callback));
        Subscription { id }
    }

    /// Removes a subscription. Idempotent: an already-removed or unknown
    /// handle is a no-op. Safe to call from inside a callback.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.registry().remove(&subscription.id);
    }

    /// Stamps the payload and delivers it to every currently registered
    /// subscriber.
    ///
    /// The registry is snapshotted at publish time: subscribers added during
    /// the fan-out do not receive this event, and a subscriber removed
    /// mid-fan-out may still receive it.
    pub fn publish(&self, payload: EventPayload) {
        // Held across the whole fan-out; stamping inside keeps timestamps
        // in publish order.
        let _order = self
            .delivery
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let event = Event::now(payload);

        let targets: Vec<(u64, Arc<EventCallback>)> = self
            .registry()
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect();

        for (id, callback) in &targets {
            // The registry lock is not held here, so callbacks may
            // subscribe/unsubscribe reentrantly.
            if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                error!(
                    subscriber = *id,
                    kind = %event.kind(),
                    "subscriber panicked during delivery"
                );
            }
        }

        trace!(
            kind = %event.kind(),
            subscribers = targets.len(),
            "event delivered"
        );
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<u64, Arc<EventCallback>>> {
        // Callbacks never run under this lock, so it cannot be poisoned by
        // a subscriber panic; recover rather than unwind if it ever is.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
