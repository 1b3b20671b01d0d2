//! Listener resolution and invocation

use crate::container::{Instance, ListenerFactory};
use crate::error::DispatchError;
use crate::event::{Event, EventType};
use crate::listener::ListenerRef;
use crate::log::{self, DispatchLog};
use std::sync::Arc;

/// Turns a [`ListenerRef`] into a call against an event.
///
/// Named listeners are created through the factory on every call; nothing
/// is cached between dispatches.
#[derive(Clone)]
pub struct Resolver {
    factory: Arc<dyn ListenerFactory>,
    logger: Arc<dyn DispatchLog>,
    log_events: bool,
}

impl Resolver {
    pub fn new(
        factory: Arc<dyn ListenerFactory>,
        logger: Arc<dyn DispatchLog>,
        log_events: bool,
    ) -> Self {
        Self {
            factory,
            logger,
            log_events,
        }
    }

    pub fn log_events(&self) -> bool {
        self.log_events
    }

    /// Log, resolve and invoke one listener.
    pub fn fire(&self, event: &dyn Event, listener: &ListenerRef) -> Result<(), DispatchError> {
        self.log(event, listener);

        match listener {
            ListenerRef::Inline(inline) => inline.call(event).map_err(Into::into),
            ListenerRef::Named(id) => self.fire_named(event, id),
        }
    }

    fn fire_named(&self, event: &dyn Event, id: &str) -> Result<(), DispatchError> {
        let event_type = EventType::of_val(event);

        match self.factory.create(id)? {
            Instance::Listener(handler) if handler.event_type() == event_type => {
                handler.handle_dyn(event).map_err(Into::into)
            }
            _ => Err(DispatchError::InvalidListener {
                listener: id.to_string(),
                event: event_type.name(),
            }),
        }
    }

    /// Record that `listener` is about to fire. Never fails.
    pub fn log(&self, event: &dyn Event, listener: &ListenerRef) {
        if !self.log_events {
            return;
        }
        log::emit(self.logger.as_ref(), &log::format_record(event, listener));
    }
}
