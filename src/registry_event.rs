/// Events reported by a registry during its operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// They borrow the event name from the operation, so a callback that wants to keep
/// them should format or copy what it needs.
///
/// # Examples
///
/// ```rust
/// use event_registry::EmitterEvent;
///
/// let event = EmitterEvent::Subscribe { event_name: "update", index: 0 };
/// assert_eq!(event.to_string(), "subscribe { event_name: update, index: 0 }");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterEvent<'a> {
    /// A listener was appended to an event's list.
    Subscribe {
        /// The event name the listener was registered under
        event_name: &'a str,
        /// Position of the listener in the list at registration time
        index: usize,
    },

    /// An unsubscribe was requested.
    Unsubscribe {
        event_name: &'a str,
        /// Whether a matching listener was found and removed
        removed: bool,
    },

    /// An event was emitted.
    Emit {
        event_name: &'a str,
        /// How many listeners were invoked
        listeners: usize,
    },

    /// All subscriptions were dropped.
    Clear {},
}

impl std::fmt::Display for EmitterEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitterEvent::Subscribe { event_name, index } => {
                write!(f, "subscribe {{ event_name: {event_name}, index: {index} }}")
            }
            EmitterEvent::Unsubscribe {
                event_name,
                removed,
            } => {
                write!(
                    f,
                    "unsubscribe {{ event_name: {event_name}, removed: {removed} }}"
                )
            }
            EmitterEvent::Emit {
                event_name,
                listeners,
            } => {
                write!(
                    f,
                    "emit {{ event_name: {event_name}, listeners: {listeners} }}"
                )
            }
            EmitterEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
