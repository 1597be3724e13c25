//! The listener registry.
//!
//! [`EventRegistry`] maps event names to ordered lists of listeners. Listeners are
//! invoked synchronously, in registration order, by [`EventRegistry::emit`].
//!
//! # Examples
//!
//! ```
//! use event_registry::EventRegistry;
//! use std::sync::{Arc, Mutex};
//!
//! let registry = EventRegistry::<Vec<i32>>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let handle = registry
//!     .subscribe("update", move |data: &Vec<i32>| sink.lock().unwrap().push(data.clone()))
//!     .unwrap();
//!
//! registry.emit("update", &vec![1, 2, 3]);
//! registry.unsubscribe(&handle);
//! registry.emit("update", &vec![4]);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2, 3]]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, trace};

use crate::registry_handle::same_listener;
use crate::{EmitterError, EmitterEvent, LifetimeScope, Listener, SubscriptionHandle};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`EmitterEvent`] produced by the registry it is set on.
pub type TraceCallback = dyn Fn(&EmitterEvent<'_>) + Send + Sync + 'static;

struct Entry<P> {
    event_name: String,
    index: usize,
    listener: Listener<P>,
    // dropped with the entry; lifetime scopes watch it to forget ended registrations
    _tether: Option<Arc<()>>,
}

/// State shared between a registry and the disposers it hands to lifetime scopes.
struct Shared<P> {
    listeners: Mutex<HashMap<String, Vec<Entry<P>>>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl<P> Shared<P> {
    fn emit_event(&self, event: &EmitterEvent<'_>) {
        // clone out so the callback may call back into the registry
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn remove(&self, name: &str, listener: &Listener<P>) -> bool {
        let entry = {
            let mut map = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
            match map.get_mut(name) {
                Some(list) => match list.iter().position(|e| same_listener(&e.listener, listener)) {
                    Some(position) => {
                        let entry = list.remove(position);
                        if list.is_empty() {
                            map.remove(name);
                        }
                        Some(entry)
                    }
                    None => None,
                },
                None => None,
            }
        };

        match &entry {
            Some(entry) => debug!(
                event_name = entry.event_name.as_str(),
                index = entry.index,
                "listener unsubscribed"
            ),
            None => debug!(event_name = name, "no matching listener to unsubscribe"),
        }
        self.emit_event(&EmitterEvent::Unsubscribe {
            event_name: name,
            removed: entry.is_some(),
        });

        entry.is_some()
    }
}

/// An event emitter: event names mapped to ordered listener lists.
///
/// Each registry is fully independent. Services that need events hold their own
/// registry as a field; when several owners must share one, wrap it in an `Arc`.
///
/// # Reentrancy
///
/// `emit` dispatches over a snapshot of the listener list taken when it starts, and
/// no lock is held while listeners run. A listener may therefore subscribe,
/// unsubscribe or emit on the same registry; such changes apply from the next emit.
///
/// # Panics
///
/// A panicking listener is not caught. The panic propagates to the caller of
/// `emit` and the remaining listeners of that dispatch do not run.
pub struct EventRegistry<P> {
    shared: Arc<Shared<P>>,
}

impl<P: 'static> EventRegistry<P> {
    /// Creates an empty registry with no trace callback.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                listeners: Mutex::new(HashMap::new()),
                trace: Mutex::new(None),
            }),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for this registry's operations.
    ///
    /// Replaces any previous callback. The callback is invoked without holding any
    /// registry lock.
    pub fn set_trace_callback(&self, callback: impl Fn(&EmitterEvent<'_>) + Send + Sync + 'static) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // -------------------------------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------------------------------

    /// Append `callback` to the listeners of `event_name`.
    ///
    /// The listener stays registered until [`unsubscribe`](Self::unsubscribe) is called
    /// with the returned handle or the registry is cleared.
    ///
    /// # Errors
    ///
    /// - [`EmitterError::EmptyEventName`] if `event_name` is empty
    pub fn subscribe(
        &self,
        event_name: &str,
        callback: impl Fn(&P) + Send + Sync + 'static,
    ) -> Result<SubscriptionHandle<P>, EmitterError> {
        self.subscribe_arc(event_name, Arc::new(callback))
    }

    /// Append an already shared listener to the listeners of `event_name`.
    ///
    /// Subscribing the same `Arc` more than once registers it more than once; each
    /// emit then invokes it once per registration.
    ///
    /// # Errors
    ///
    /// - [`EmitterError::EmptyEventName`] if `event_name` is empty
    pub fn subscribe_arc(
        &self,
        event_name: &str,
        listener: Listener<P>,
    ) -> Result<SubscriptionHandle<P>, EmitterError> {
        self.insert(event_name, listener, None)
    }

    fn insert(
        &self,
        event_name: &str,
        listener: Listener<P>,
        tether: Option<Arc<()>>,
    ) -> Result<SubscriptionHandle<P>, EmitterError> {
        if event_name.is_empty() {
            return Err(EmitterError::EmptyEventName);
        }

        let index = {
            let mut map = self
                .shared
                .listeners
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            let list = map.entry(event_name.to_string()).or_default();
            let index = list.len();
            list.push(Entry {
                event_name: event_name.to_string(),
                index,
                listener: Arc::clone(&listener),
                _tether: tether,
            });
            index
        };

        debug!(event_name, index, "listener subscribed");
        self.shared
            .emit_event(&EmitterEvent::Subscribe { event_name, index });

        Ok(SubscriptionHandle {
            event_name: event_name.to_string(),
            index,
            listener,
        })
    }

    /// Subscribe `callback` and bind its lifetime to `scope`.
    ///
    /// When the scope is torn down the subscription is removed automatically. The
    /// scope only holds a weak reference to the registry, so tearing down a scope
    /// that outlived its registry does nothing. If the scope is already torn down
    /// the subscription is removed before this returns.
    ///
    /// The scope holds no strong reference to the listener, and a scope such as
    /// [`Scope`](crate::Scope) forgets the registration once it is unsubscribed
    /// manually or the registry is cleared.
    ///
    /// # Errors
    ///
    /// - [`EmitterError::EmptyEventName`] if `event_name` is empty
    pub fn subscribe_scoped(
        &self,
        event_name: &str,
        callback: impl Fn(&P) + Send + Sync + 'static,
        scope: &impl LifetimeScope,
    ) -> Result<SubscriptionHandle<P>, EmitterError> {
        let tether = Arc::new(());
        let alive = Arc::downgrade(&tether);
        let handle = self.insert(event_name, Arc::new(callback), Some(tether))?;

        let shared: Weak<Shared<P>> = Arc::downgrade(&self.shared);
        let listener = Arc::downgrade(&handle.listener);
        let name = handle.event_name.clone();
        scope.on_teardown_while(
            alive,
            Box::new(move || {
                if let (Some(shared), Some(listener)) = (shared.upgrade(), listener.upgrade()) {
                    shared.remove(&name, &listener);
                }
            }),
        );

        Ok(handle)
    }

    /// Remove the registration identified by `handle`.
    ///
    /// Only the first listener under the handle's event name that is the same `Arc`
    /// as the handle's listener is removed; every other entry keeps its place. The
    /// event name disappears from the registry once its last listener is removed.
    ///
    /// Unknown event names, already removed registrations and cleared registries
    /// are silently ignored, so calling this twice with one handle is harmless.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle<P>) {
        self.shared.remove(&handle.event_name, &handle.listener);
    }

    /// Invoke every listener of `event_name` with `payload`, in registration order.
    ///
    /// Returns immediately if the event has no listeners; nothing is traced then.
    pub fn emit(&self, event_name: &str, payload: &P) {
        let snapshot: Vec<Listener<P>> = {
            let map = self
                .shared
                .listeners
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            match map.get(event_name) {
                Some(list) => list.iter().map(|e| Arc::clone(&e.listener)).collect(),
                None => return,
            }
        };

        trace!(event_name, listeners = snapshot.len(), "emit");
        self.shared.emit_event(&EmitterEvent::Emit {
            event_name,
            listeners: snapshot.len(),
        });

        for listener in snapshot {
            listener(payload);
        }
    }

    /// Remove every subscription.
    ///
    /// Handles issued earlier remain valid values; unsubscribing them is a no-op.
    pub fn clear(&self) {
        self.shared.emit_event(&EmitterEvent::Clear {});

        let dropped = {
            let mut map = self
                .shared
                .listeners
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            std::mem::take(&mut *map)
        };
        debug!(event_names = dropped.len(), "registry cleared");
    }

    // -------------------------------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------------------------------

    /// Number of listeners currently registered under `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(event_name)
            .map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listener_count(event_name) > 0
    }

    /// Event names with at least one listener, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_empty()
    }
}

impl<P: 'static> Default for EventRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> fmt::Debug for EventRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("event_names", &self.event_names())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
