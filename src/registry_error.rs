use thiserror::Error;

/// Errors reported by the event registry.
///
/// Almost every registry operation is infallible: unknown event names and stale
/// handles are silent no-ops. The only rejected input is an empty event name.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum EmitterError {
    #[error("event name must not be empty")]
    EmptyEventName,
}
