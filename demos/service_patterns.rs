//! Service patterns example for event-registry.
//!
//! Demonstrates:
//! - A singleton service publishing through a `define_emitter!` emitter
//! - Services that own their own `EventRegistry` per instance
//! - Manual `unsubscribe` versus scope-bound automatic cleanup
//!
//! Run with: `RUST_LOG=debug cargo run --example service_patterns`

use event_registry::{define_emitter, EmitterError, EventRegistry, Scope};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Process-wide emitter used by the singleton service
define_emitter!(service_events, Vec<i32>);

struct Service {
    data: Mutex<Vec<i32>>,
}

impl Service {
    fn push(&self, item: i32) {
        let snapshot = {
            let mut data = self.data.lock().unwrap_or_else(|p| p.into_inner());
            data.push(item);
            data.clone()
        };
        service_events::emit("update", &snapshot);
    }
}

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

fn main() -> Result<(), EmitterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== event-registry: Service Patterns ===\n");

    // Everything the "controller" subscribes is bound to this scope
    let scope = Scope::new();

    // -------------------------------------------------------------------------
    // 1. Singleton service
    // -------------------------------------------------------------------------
    println!("1. Singleton service with a process-wide emitter...");

    let service = Service {
        data: Mutex::new(Vec::new()),
    };

    service_events::subscribe_scoped(
        "update",
        |data| println!("   service updated {:?}", data),
        &scope,
    )?;

    service.push(1);
    service.push(2);
    service.push(3);

    // -------------------------------------------------------------------------
    // 2. Per-instance services
    // -------------------------------------------------------------------------
    println!("\n2. Two service instances, each with its own registry...");

    let mut other = OtherService::new(vec![1, 2, 3]);
    let mut other2 = OtherService::new(Vec::new());

    let handle = other.events.subscribe_scoped(
        "update",
        |data| println!("   instance 1 updated {:?}", data),
        &scope,
    )?;
    other2.events.subscribe_scoped(
        "update",
        |data| println!("   instance 2 updated {:?}", data),
        &scope,
    )?;

    other.push(4);
    other2.push(1);

    // -------------------------------------------------------------------------
    // 3. Manual removal
    // -------------------------------------------------------------------------
    println!("\n3. Removing the instance 1 listener by handle...");

    other.events.unsubscribe(&handle);
    other.push(5);
    println!("   instance 1 pushed 5, nobody notified");

    for i in 2..5 {
        other2.push(i);
    }

    // -------------------------------------------------------------------------
    // 4. Scope teardown
    // -------------------------------------------------------------------------
    println!("\n4. Tearing down the scope...");

    scope.teardown();
    info!(pending = scope.pending(), "controller scope destroyed");

    println!("   service listeners:    {:?}", service_events::emitter());
    println!("   instance 1 listeners: {:?}", other.events);
    println!("   instance 2 listeners: {:?}", other2.events);

    service.push(4);
    other2.push(5);
    println!("   pushes after teardown notified nobody");

    println!("\n=== Example completed successfully ===");
    Ok(())
}
