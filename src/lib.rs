//! # Event Registry
//!
//! A small, thread-safe event emitter: event names mapped to ordered lists of
//! listener callbacks, with synchronous emit-to-all.
//!
//! ## Quick Start
//!
//! ```rust
//! use event_registry::EventRegistry;
//! use std::sync::{Arc, Mutex};
//!
//! let registry = EventRegistry::<String>::new();
//! let last = Arc::new(Mutex::new(String::new()));
//!
//! let sink = last.clone();
//! registry
//!     .subscribe("greet", move |msg: &String| *sink.lock().unwrap() = msg.clone())
//!     .unwrap();
//!
//! registry.emit("greet", &"Hello, World!".to_string());
//! assert_eq!(&*last.lock().unwrap(), "Hello, World!");
//! ```
//!
//! ## Features
//!
//! - **Ordered dispatch**: listeners run in the order they subscribed
//! - **Identity-based removal**: a handle removes exactly the registration it came from
//! - **Scope-bound cleanup**: listeners tied to a [`LifetimeScope`] are removed on teardown
//! - **Isolated instances**: registries never share state unless wrapped in an `Arc`
//! - **Tracing support**: `tracing` diagnostics plus an optional per-registry trace callback
//!
//! ## Main Types
//!
//! - [`EventRegistry`] - subscribe, unsubscribe and emit
//! - [`SubscriptionHandle`] - token identifying one registration
//! - [`Scope`] / [`LifetimeScope`] - teardown-bound subscriptions
//! - [`define_emitter!`] - a named process-wide emitter

mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_handle;
mod registry_scope;

pub use registry::{EventRegistry, TraceCallback};
pub use registry_error::EmitterError;
pub use registry_event::EmitterEvent;
pub use registry_handle::{Listener, SubscriptionHandle};
pub use registry_scope::{Disposer, LifetimeScope, Scope};
