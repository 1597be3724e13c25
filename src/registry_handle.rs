//! Subscription handles and the listener callback type.

use std::fmt;
use std::sync::Arc;

/// A shared listener callback.
///
/// Listeners are compared by `Arc` identity, never by value, so the same closure
/// subscribed twice through [`EventRegistry::subscribe_arc`](crate::EventRegistry::subscribe_arc)
/// is two registrations of one listener.
pub type Listener<P> = Arc<dyn Fn(&P) + Send + Sync + 'static>;

/// Token returned by a subscribe call, required to remove that exact registration.
///
/// Handles are cheap to clone. Unsubscribing with a handle whose registration is
/// already gone is a no-op, so a handle can be passed around freely.
pub struct SubscriptionHandle<P> {
    pub(crate) event_name: String,
    pub(crate) index: usize,
    pub(crate) listener: Listener<P>,
}

impl<P> SubscriptionHandle<P> {
    /// The event name this registration was made under.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Position of the listener at registration time.
    ///
    /// Informational only; later removals shift the real position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The registered listener.
    pub fn listener(&self) -> &Listener<P> {
        &self.listener
    }
}

/// Listener identity: the same `Arc` allocation, regardless of vtable.
pub(crate) fn same_listener<P>(a: &Listener<P>, b: &Listener<P>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<P> Clone for SubscriptionHandle<P> {
    fn clone(&self) -> Self {
        Self {
            event_name: self.event_name.clone(),
            index: self.index,
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<P> fmt::Debug for SubscriptionHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("event_name", &self.event_name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
