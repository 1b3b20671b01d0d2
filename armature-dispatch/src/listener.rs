//! Listener definitions and traits

use crate::error::ListenerError;
use crate::event::{Event, EventType};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Listener trait
///
/// Implemented by handler types that are registered by name and
/// materialized through a [`ListenerFactory`](crate::ListenerFactory).
pub trait Listener<E: Event>: Send + Sync {
    /// Handle the event
    fn handle(&self, event: &E) -> Result<(), ListenerError>;
}

/// Type-erased listener
pub trait DynListener: Send + Sync {
    /// The event type this listener handles.
    fn event_type(&self) -> EventType;

    /// Handle event (type-erased)
    fn handle_dyn(&self, event: &dyn Event) -> Result<(), ListenerError>;
}

/// Wrapper for typed listeners
pub struct TypedListener<E: Event, L: Listener<E>> {
    listener: L,
    _phantom: PhantomData<fn(&E)>,
}

impl<E: Event, L: Listener<E>> TypedListener<E, L> {
    pub fn new(listener: L) -> Self {
        Self {
            listener,
            _phantom: PhantomData,
        }
    }

    pub fn into_inner(self) -> L {
        self.listener
    }
}

impl<E: Event, L: Listener<E>> DynListener for TypedListener<E, L> {
    fn event_type(&self) -> EventType {
        EventType::of::<E>()
    }

    fn handle_dyn(&self, event: &dyn Event) -> Result<(), ListenerError> {
        match event.as_any().downcast_ref::<E>() {
            Some(typed) => self.listener.handle(typed),
            None => Err(ListenerError::TypeMismatch {
                expected: std::any::type_name::<E>(),
                actual: event.event_name(),
            }),
        }
    }
}

type ErasedFn = dyn Fn(&dyn Event) -> Result<(), ListenerError> + Send + Sync;

/// A closure registered directly for one event type.
#[derive(Clone)]
pub struct InlineListener {
    event_type: EventType,
    call: Arc<ErasedFn>,
}

impl InlineListener {
    pub fn new<E, F>(f: F) -> Self
    where
        E: Event,
        F: Fn(&E) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let call = move |event: &dyn Event| match event.as_any().downcast_ref::<E>() {
            Some(typed) => f(typed),
            None => Err(ListenerError::TypeMismatch {
                expected: std::any::type_name::<E>(),
                actual: event.event_name(),
            }),
        };

        Self {
            event_type: EventType::of::<E>(),
            call: Arc::new(call),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn call(&self, event: &dyn Event) -> Result<(), ListenerError> {
        (self.call)(event)
    }
}

impl fmt::Debug for InlineListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineListener")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// A registered listener: either a closure or the identifier of a handler
/// resolved at dispatch time.
#[derive(Debug, Clone)]
pub enum ListenerRef {
    Inline(InlineListener),
    Named(String),
}

impl ListenerRef {
    /// Placeholder used in log records for inline listeners.
    pub const CLOSURE: &'static str = "closure";

    /// Text used to identify this listener in log records.
    pub fn describe(&self) -> &str {
        match self {
            Self::Inline(_) => Self::CLOSURE,
            Self::Named(id) => id,
        }
    }
}

impl From<InlineListener> for ListenerRef {
    fn from(listener: InlineListener) -> Self {
        Self::Inline(listener)
    }
}

impl From<String> for ListenerRef {
    fn from(id: String) -> Self {
        Self::Named(id)
    }
}

impl From<&str> for ListenerRef {
    fn from(id: &str) -> Self {
        Self::Named(id.to_string())
    }
}
