//! Macros for creating named, process-wide emitters.
//!
//! This is the singleton usage pattern: one emitter per module, reachable from
//! anywhere through free functions, with no construction or injection at call sites.

/// Creates a process-wide emitter with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily initialised `EventRegistry<$payload>` static (hidden)
/// - Free functions delegating to it
/// - An `emitter()` accessor for the full `EventRegistry` API
///
/// The payload type is resolved from the invoking module.
///
/// # Examples
///
/// ```rust
/// use event_registry::define_emitter;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// define_emitter!(orders, Vec<u32>);
///
/// let total = Arc::new(AtomicUsize::new(0));
/// let sink = total.clone();
/// let handle = orders::subscribe("update", move |items| {
///     sink.fetch_add(items.len(), Ordering::SeqCst);
/// })
/// .unwrap();
///
/// orders::emit("update", &vec![1, 2, 3]);
/// orders::unsubscribe(&handle);
/// orders::emit("update", &vec![4]);
///
/// assert_eq!(total.load(Ordering::SeqCst), 3);
/// ```
///
/// # Multiple Emitters
///
/// Each invocation is isolated from every other:
///
/// ```rust
/// use event_registry::define_emitter;
///
/// define_emitter!(ui, String);
/// define_emitter!(network, String);
///
/// ui::subscribe("update", |_| {}).unwrap();
///
/// assert_eq!(ui::listener_count("update"), 1);
/// assert_eq!(network::listener_count("update"), 0);
/// ```
#[macro_export]
macro_rules! define_emitter {
    ($name:ident, $payload:ty) => {
        pub mod $name {
            #![allow(dead_code)]

            #[allow(unused_imports)]
            use super::*;
            use std::sync::LazyLock;

            // The process-wide registry (module-private)
            static EMITTER: LazyLock<$crate::EventRegistry<$payload>> =
                LazyLock::new($crate::EventRegistry::new);

            /// Access the underlying registry.
            pub fn emitter() -> &'static $crate::EventRegistry<$payload> {
                &EMITTER
            }

            /// Subscribe a listener to an event.
            pub fn subscribe(
                event_name: &str,
                callback: impl Fn(&$payload) + Send + Sync + 'static,
            ) -> ::core::result::Result<$crate::SubscriptionHandle<$payload>, $crate::EmitterError> {
                EMITTER.subscribe(event_name, callback)
            }

            /// Subscribe a listener bound to a lifetime scope.
            pub fn subscribe_scoped(
                event_name: &str,
                callback: impl Fn(&$payload) + Send + Sync + 'static,
                scope: &impl $crate::LifetimeScope,
            ) -> ::core::result::Result<$crate::SubscriptionHandle<$payload>, $crate::EmitterError> {
                EMITTER.subscribe_scoped(event_name, callback, scope)
            }

            /// Remove a registration.
            pub fn unsubscribe(handle: &$crate::SubscriptionHandle<$payload>) {
                EMITTER.unsubscribe(handle)
            }

            /// Invoke every listener of an event.
            pub fn emit(event_name: &str, payload: &$payload) {
                EMITTER.emit(event_name, payload)
            }

            /// Number of listeners registered under an event.
            pub fn listener_count(event_name: &str) -> usize {
                EMITTER.listener_count(event_name)
            }

            /// Set a tracing callback for this emitter.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::EmitterEvent<'_>) + Send + Sync + 'static,
            ) {
                EMITTER.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                EMITTER.clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Tick(u32);

    #[test]
    fn test_define_emitter_macro() {
        define_emitter!(test_emitter, u32);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handle = test_emitter::subscribe("tick", move |v| sink.lock().unwrap().push(*v))
            .unwrap();

        test_emitter::emit("tick", &1);
        test_emitter::unsubscribe(&handle);
        test_emitter::emit("tick", &2);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(test_emitter::listener_count("tick"), 0);
    }

    #[test]
    fn test_payload_type_from_invoking_module() {
        define_emitter!(ticks, Tick);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        ticks::subscribe("tick", move |t| sink.lock().unwrap().push(t.clone())).unwrap();

        ticks::emit("tick", &Tick(5));
        assert_eq!(*seen.lock().unwrap(), vec![Tick(5)]);
    }

    #[test]
    fn test_multiple_emitters() {
        define_emitter!(emitter_a, u32);
        define_emitter!(emitter_b, u32);

        emitter_a::subscribe("tick", |_| {}).unwrap();

        assert_eq!(emitter_a::listener_count("tick"), 1);
        assert_eq!(emitter_b::listener_count("tick"), 0);
        assert!(emitter_b::emitter().is_empty());
    }

    #[test]
    fn test_tracing() {
        define_emitter!(trace_test, u32);

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        trace_test::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        let handle = trace_test::subscribe("tick", |_| {}).unwrap();
        trace_test::emit("tick", &1);
        trace_test::unsubscribe(&handle);
        trace_test::clear_trace_callback();
        trace_test::emit("tick", &2);

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("subscribe"));
        assert!(recorded[1].contains("emit"));
        assert!(recorded[2].contains("unsubscribe"));
    }
}
