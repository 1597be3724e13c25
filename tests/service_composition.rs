//! Integration tests for the two ways services carry events.
//!
//! - A singleton service publishing through a `define_emitter!` emitter
//! - Per-instance services that own an `EventRegistry` field
//!
//! A controller-like listener binds its subscriptions to a `Scope` and relies on
//! teardown to clean them up.

use event_registry::{define_emitter, EmitterError, EventRegistry, Scope};
use serial_test::serial;
use std::sync::{Arc, Mutex};

define_emitter!(service_events, Vec<i32>);

/// Singleton-style service: one data list, events through the process-wide emitter.
struct Service {
    data: Mutex<Vec<i32>>,
}

impl Service {
    fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, item: i32) {
        let snapshot = {
            let mut data = self.data.lock().unwrap();
            data.push(item);
            data.clone()
        };
        service_events::emit("update", &snapshot);
    }
}

/// Instance-style service: every value owns its own registry.
struct OtherService {
    data: Vec<i32>,
    events: EventRegistry<Vec<i32>>,
}

impl OtherService {
    fn new(data: Vec<i32>) -> Self {
        Self {
            data,
            events: EventRegistry::new(),
        }
    }

    fn push(&mut self, item: i32) {
        self.data.push(item);
        self.events.emit("update", &self.data);
    }
}

#[test]
#[serial]
fn test_singleton_service_notifies_listener() -> Result<(), EmitterError> {
    service_events::emitter().clear();
    let service = Service::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let handle = service_events::subscribe("update", move |data| {
        *sink.lock().unwrap() = data.clone();
    })?;

    service.push(1);
    service.push(2);
    service.push(3);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);

    service_events::unsubscribe(&handle);
    service.push(4);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_instances_keep_separate_listeners() -> Result<(), EmitterError> {
    let mut first = OtherService::new(vec![1, 2, 3]);
    let mut second = OtherService::new(Vec::new());

    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = log.clone();
    let first_handle = first.events.subscribe("update", move |data| {
        sink.lock().unwrap().push(format!("instance 1 {:?}", data));
    })?;
    let sink = log.clone();
    second.events.subscribe("update", move |data| {
        sink.lock().unwrap().push(format!("instance 2 {:?}", data));
    })?;

    first.push(4);
    second.push(1);

    first.events.unsubscribe(&first_handle);
    first.push(5);
    second.push(2);

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "instance 1 [1, 2, 3, 4]",
            "instance 2 [1]",
            "instance 2 [1, 2]",
        ]
    );
    assert_eq!(first.data, vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
#[serial]
fn test_controller_scope_cleans_up_everything() -> Result<(), EmitterError> {
    service_events::emitter().clear();
    let service = Service::new();
    let mut other = OtherService::new(vec![1, 2, 3]);
    let mut other2 = OtherService::new(Vec::new());

    let controller_scope = Scope::new();
    let view = Arc::new(Mutex::new(Vec::new()));

    let sink = view.clone();
    service_events::subscribe_scoped(
        "update",
        move |data| sink.lock().unwrap().push(("service", data.len())),
        &controller_scope,
    )?;
    let sink = view.clone();
    other.events.subscribe_scoped(
        "update",
        move |data| sink.lock().unwrap().push(("other", data.len())),
        &controller_scope,
    )?;
    let sink = view.clone();
    other2.events.subscribe_scoped(
        "update",
        move |data| sink.lock().unwrap().push(("other2", data.len())),
        &controller_scope,
    )?;

    service.push(1);
    other.push(4);
    other2.push(1);
    assert_eq!(view.lock().unwrap().len(), 3);

    controller_scope.teardown();

    assert_eq!(service_events::listener_count("update"), 0);
    assert!(other.events.is_empty());
    assert!(other2.events.is_empty());

    service.push(2);
    other.push(5);
    other2.push(2);
    assert_eq!(
        *view.lock().unwrap(),
        vec![("service", 1), ("other", 4), ("other2", 1)]
    );
    Ok(())
}
