//! Event dispatcher implementation

use crate::config::{self, DispatcherConfig, EventCatalog};
use crate::container::{ListenerContainer, ListenerFactory};
use crate::error::{DispatchError, ListenerError};
use crate::event::{Event, EventType};
use crate::listener::{InlineListener, ListenerRef};
use crate::log::{DispatchLog, TracingLog};
use crate::resolver::Resolver;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Listeners registered for one event type, in dispatch order.
#[derive(Debug, Clone)]
struct EventEntry {
    event_type: EventType,
    listeners: Vec<ListenerRef>,
}

/// Synchronous event dispatcher
///
/// Built once with [`EventDispatcherBuilder`] and immutable afterwards.
/// Cloning is cheap; every clone shares the same registry.
#[derive(Clone)]
pub struct EventDispatcher {
    /// Listeners registered for each event type
    registry: Arc<HashMap<TypeId, EventEntry>>,

    resolver: Resolver,
}

impl EventDispatcher {
    pub fn builder() -> EventDispatcherBuilder {
        EventDispatcherBuilder::new()
    }

    /// Dispatch an event
    ///
    /// Listeners registered for the exact type `E` run one after another in
    /// registration order. The first error stops the remaining listeners and
    /// is returned to the caller.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// dispatcher.dispatch(&PaymentEvent { amount: 10 })?;
    /// ```
    pub fn dispatch<E: Event>(&self, event: &E) -> Result<(), DispatchError> {
        self.dispatch_dyn(event)
    }

    /// Dispatch a type-erased event, keyed by its concrete runtime type.
    ///
    /// Pass `&*boxed` for a `Box<dyn Event>`; `&boxed` would dispatch the
    /// box itself.
    pub fn dispatch_dyn(&self, event: &dyn Event) -> Result<(), DispatchError> {
        let type_id = event.as_any().type_id();

        let entry = match self.registry.get(&type_id) {
            Some(entry) if !entry.listeners.is_empty() => entry,
            _ => {
                if self.resolver.log_events() {
                    debug!("No listeners registered for event: {}", event.event_name());
                }
                return Ok(());
            }
        };

        for listener in &entry.listeners {
            if let Err(e) = self.resolver.fire(event, listener) {
                if self.resolver.log_events() {
                    error!(
                        event = entry.event_type.name(),
                        listener = listener.describe(),
                        "Listener failed: {}",
                        e
                    );
                }
                return Err(e);
            }
        }

        Ok(())
    }

    /// Get listener count for an event type
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry
            .get(&TypeId::of::<E>())
            .map(|entry| entry.listeners.len())
            .unwrap_or(0)
    }

    pub fn has_listeners<E: Event>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    pub fn log_events(&self) -> bool {
        self.resolver.log_events()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("events", &self.registry.len())
            .field("log_events", &self.resolver.log_events())
            .finish()
    }
}

/// Event dispatcher builder
pub struct EventDispatcherBuilder {
    entries: HashMap<TypeId, EventEntry>,
    factory: Arc<dyn ListenerFactory>,
    logger: Arc<dyn DispatchLog>,
    log_events: bool,
}

impl EventDispatcherBuilder {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            factory: Arc::new(ListenerContainer::new()),
            logger: Arc::new(TracingLog),
            log_events: true,
        }
    }

    /// Start from a configuration's `listen` table and logging flag.
    ///
    /// Event aliases are resolved through `catalog`; an alias it does not
    /// know is an error. Two aliases naming the same event type are rejected,
    /// since the order between them is not part of the configuration.
    pub fn from_config(config: DispatcherConfig, catalog: &EventCatalog) -> config::Result<Self> {
        let mut builder = Self::new().log_events(config.log_events);
        let mut seen: HashMap<TypeId, String> = HashMap::new();

        for (alias, listeners) in config.listen {
            let event_type = catalog.resolve(&alias)?;
            if let Some(previous) = seen.get(&event_type.id()) {
                return Err(config::ConfigError::DuplicateEvent {
                    alias,
                    previous: previous.clone(),
                });
            }
            seen.insert(event_type.id(), alias);
            for id in listeners {
                builder.push(event_type, ListenerRef::Named(id));
            }
        }

        Ok(builder)
    }

    fn push(&mut self, event_type: EventType, listener: ListenerRef) {
        self.entries
            .entry(event_type.id())
            .or_insert_with(|| EventEntry {
                event_type,
                listeners: Vec::new(),
            })
            .listeners
            .push(listener);
    }

    /// Append a closure listener for `E`.
    pub fn listen<E, F>(mut self, f: F) -> Self
    where
        E: Event,
        F: Fn(&E) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let inline = InlineListener::new(f);
        self.push(inline.event_type(), ListenerRef::Inline(inline));
        self
    }

    /// Append a named listener for `E`, resolved by the factory at dispatch time.
    pub fn listen_named<E: Event>(mut self, id: impl Into<String>) -> Self {
        self.push(EventType::of::<E>(), ListenerRef::Named(id.into()));
        self
    }

    /// Set the factory used to materialize named listeners.
    pub fn factory<F: ListenerFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Set the sink for dispatch records.
    pub fn logger<L: DispatchLog + 'static>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Enable/disable logging
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> EventDispatcher {
        if self.log_events {
            debug!(events = self.entries.len(), "Event dispatcher built");
        }

        EventDispatcher {
            registry: Arc::new(self.entries),
            resolver: Resolver::new(self.factory, self.logger, self.log_events),
        }
    }
}

impl Default for EventDispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::Listener;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct PaymentEvent {
        amount: u64,
    }

    #[derive(Debug)]
    struct RefundEvent;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn recording(
        calls: Calls,
        name: &'static str,
    ) -> impl Fn(&PaymentEvent) -> Result<(), ListenerError> + Send + Sync + 'static {
        move |event: &PaymentEvent| {
            calls.lock().unwrap().push(format!("{}:{}", name, event.amount));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl DispatchLog for Recorder {
        fn info(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let calls = Calls::default();
        let dispatcher = EventDispatcher::builder()
            .listen(recording(calls.clone(), "first"))
            .listen(recording(calls.clone(), "second"))
            .listen(recording(calls.clone(), "third"))
            .build();

        dispatcher.dispatch(&PaymentEvent { amount: 3 }).unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first:3", "second:3", "third:3"]
        );
    }

    #[test]
    fn test_unregistered_event_is_noop() {
        let calls = Calls::default();
        let dispatcher = EventDispatcher::builder()
            .listen(recording(calls.clone(), "payment"))
            .build();

        dispatcher.dispatch(&RefundEvent).unwrap();

        assert!(calls.lock().unwrap().is_empty());
        assert!(!dispatcher.has_listeners::<RefundEvent>());
    }

    #[test]
    fn test_duplicates_all_invoked() {
        let calls = Calls::default();
        let dispatcher = EventDispatcher::builder()
            .listen(recording(calls.clone(), "dup"))
            .listen(recording(calls.clone(), "dup"))
            .build();

        dispatcher.dispatch(&PaymentEvent { amount: 1 }).unwrap();
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(dispatcher.listener_count::<PaymentEvent>(), 2);
    }

    #[test]
    fn test_error_stops_remaining_listeners() {
        let calls = Calls::default();
        let dispatcher = EventDispatcher::builder()
            .listen(recording(calls.clone(), "before"))
            .listen(|_: &PaymentEvent| Err(ListenerError::Failed("declined".to_string())))
            .listen(recording(calls.clone(), "after"))
            .build();

        let err = dispatcher.dispatch(&PaymentEvent { amount: 9 }).unwrap_err();

        assert!(matches!(err, DispatchError::Listener(ListenerError::Failed(_))));
        assert_eq!(*calls.lock().unwrap(), vec!["before:9"]);
    }

    #[test]
    fn test_named_listener_through_factory() {
        struct Doubler(Calls);

        impl Listener<PaymentEvent> for Doubler {
            fn handle(&self, event: &PaymentEvent) -> Result<(), ListenerError> {
                self.0.lock().unwrap().push(format!("doubled:{}", event.amount * 2));
                Ok(())
            }
        }

        let calls = Calls::default();
        let container = ListenerContainer::new();
        let shared = calls.clone();
        container.register_listener::<PaymentEvent, _, _>("doubler", move || {
            Ok(Doubler(shared.clone()))
        });

        let dispatcher = EventDispatcher::builder()
            .factory(container)
            .listen_named::<PaymentEvent>("doubler")
            .listen(recording(calls.clone(), "inline"))
            .build();

        dispatcher.dispatch(&PaymentEvent { amount: 4 }).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["doubled:8", "inline:4"]);
    }

    #[test]
    fn test_one_record_per_listener() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = EventDispatcher::builder()
            .logger(recorder.clone())
            .listen(|_: &PaymentEvent| Ok(()))
            .listen(|_: &PaymentEvent| Ok(()))
            .build();

        dispatcher.dispatch(&PaymentEvent { amount: 1 }).unwrap();
        dispatcher.dispatch(&RefundEvent).unwrap();

        let records = recorder.0.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.ends_with("Trigger: closure")));
    }

    #[test]
    fn test_logging_disabled() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = EventDispatcher::builder()
            .logger(recorder.clone())
            .log_events(false)
            .listen(|_: &PaymentEvent| Ok(()))
            .build();

        dispatcher.dispatch(&PaymentEvent { amount: 1 }).unwrap();

        assert!(!dispatcher.log_events());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_dyn_uses_concrete_type() {
        let calls = Calls::default();
        let dispatcher = EventDispatcher::builder()
            .listen(recording(calls.clone(), "boxed"))
            .build();

        let boxed: Box<dyn Event> = Box::new(PaymentEvent { amount: 6 });
        dispatcher.dispatch_dyn(&*boxed).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["boxed:6"]);
    }

    #[test]
    fn test_from_config() {
        let config = DispatcherConfig::new()
            .log_events(false)
            .listen("app.payment", ["first", "second"]);
        let catalog = EventCatalog::new().register_as::<PaymentEvent>("app.payment");

        let dispatcher = EventDispatcherBuilder::from_config(config, &catalog)
            .unwrap()
            .build();

        assert_eq!(dispatcher.listener_count::<PaymentEvent>(), 2);
        assert!(!dispatcher.log_events());
    }

    #[test]
    fn test_from_config_unknown_event() {
        let config = DispatcherConfig::new().listen("app.missing", ["first"]);
        let result = EventDispatcherBuilder::from_config(config, &EventCatalog::new());

        assert!(matches!(result, Err(config::ConfigError::UnknownEvent(alias)) if alias == "app.missing"));
    }

    #[test]
    fn test_from_config_two_aliases_for_one_event() {
        let config = DispatcherConfig::new()
            .listen("z.payment", ["first"])
            .listen("a.payment", ["second"]);
        let catalog = EventCatalog::new()
            .register_as::<PaymentEvent>("z.payment")
            .register_as::<PaymentEvent>("a.payment");

        let result = EventDispatcherBuilder::from_config(config, &catalog);

        match result {
            Err(config::ConfigError::DuplicateEvent { alias, previous }) => {
                assert_eq!(alias, "z.payment");
                assert_eq!(previous, "a.payment");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected duplicate event error"),
        }
    }
}
