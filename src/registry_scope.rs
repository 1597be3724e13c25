//! Lifetime scopes that listener cleanup can be bound to.
//!
//! A lifetime scope is anything with its own teardown moment (a view, a session,
//! a connection) that can run a one-shot closure when it ends. The registry only
//! needs that single primitive, expressed as the [`LifetimeScope`] trait, to
//! remove scoped listeners automatically.
//!
//! [`Scope`] is a ready-made implementation. Hosts with their own lifecycle can
//! implement the trait directly, or pass a closure that stores the disposer.

use std::fmt;
use std::sync::{Mutex, Weak};

use tracing::debug;

/// One-shot closure run when a scope is torn down.
pub type Disposer = Box<dyn FnOnce() + Send + 'static>;

/// A collaborator that can notify the registry of its own teardown.
///
/// Implementors must invoke every disposer at most once, when the scope ends.
pub trait LifetimeScope {
    /// Register `disposer` to run when this scope is torn down.
    fn on_teardown(&self, disposer: Disposer);

    /// Register `disposer` for a registration that may end before the scope does.
    ///
    /// `alive` can be upgraded for as long as the registration exists. Once it
    /// cannot, the disposer has nothing left to do and the scope may drop it
    /// without running it. The default keeps it until teardown.
    fn on_teardown_while(&self, alive: Weak<()>, disposer: Disposer) {
        drop(alive);
        self.on_teardown(disposer);
    }
}

/// Any disposer-registration callback is a lifetime scope.
///
/// ```rust
/// use event_registry::{Disposer, EventRegistry};
/// use std::sync::Mutex;
///
/// let pending: Mutex<Vec<Disposer>> = Mutex::new(Vec::new());
/// let registry = EventRegistry::<u32>::new();
///
/// registry
///     .subscribe_scoped("tick", |_| {}, &|d: Disposer| pending.lock().unwrap().push(d))
///     .unwrap();
/// assert!(registry.has_listeners("tick"));
///
/// for dispose in pending.lock().unwrap().drain(..) {
///     dispose();
/// }
/// assert!(!registry.has_listeners("tick"));
/// ```
impl<F> LifetimeScope for F
where
    F: Fn(Disposer),
{
    fn on_teardown(&self, disposer: Disposer) {
        self(disposer)
    }
}

struct Pending {
    disposer: Disposer,
    alive: Option<Weak<()>>,
}

impl Pending {
    fn is_live(&self) -> bool {
        self.alive.as_ref().map_or(true, |alive| alive.strong_count() > 0)
    }
}

#[derive(Default)]
struct ScopeState {
    disposers: Vec<Pending>,
    torn_down: bool,
}

impl ScopeState {
    fn prune(&mut self) {
        self.disposers.retain(Pending::is_live);
    }
}

/// A concrete lifetime scope.
///
/// Disposers registered on it run exactly once, either on an explicit
/// [`teardown`](Scope::teardown) or when the scope is dropped, whichever comes first.
/// Disposers registered through [`LifetimeScope::on_teardown_while`] are dropped
/// unrun as soon as their registration ends, so a long-lived scope does not
/// accumulate them.
#[derive(Default)]
pub struct Scope {
    state: Mutex<ScopeState>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every pending disposer in registration order.
    ///
    /// Disposers run with the scope's lock released, so they may register further
    /// disposers; those run immediately since the scope is already torn down.
    /// Calling this more than once is a no-op.
    pub fn teardown(&self) {
        let disposers = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            std::mem::take(&mut state.disposers)
        };

        debug!(disposers = disposers.len(), "scope torn down");

        for pending in disposers {
            if pending.is_live() {
                (pending.disposer)();
            }
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .torn_down
    }

    /// Number of disposers still waiting for teardown.
    ///
    /// Disposers whose registration already ended are not counted.
    pub fn pending(&self) -> usize {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.prune();
        state.disposers.len()
    }

    fn push(&self, pending: Pending) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if state.torn_down {
            drop(state);
            if pending.is_live() {
                (pending.disposer)();
            }
            return;
        }
        state.prune();
        state.disposers.push(pending);
    }
}

impl LifetimeScope for Scope {
    /// Runs `disposer` immediately if the scope has already been torn down.
    fn on_teardown(&self, disposer: Disposer) {
        self.push(Pending {
            disposer,
            alive: None,
        });
    }

    fn on_teardown_while(&self, alive: Weak<()>, disposer: Disposer) {
        self.push(Pending {
            disposer,
            alive: Some(alive),
        });
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("pending", &self.pending())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}
