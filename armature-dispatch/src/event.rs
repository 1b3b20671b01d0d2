//! Event identity

use std::any::{Any, TypeId};
use std::fmt;

/// Event trait
///
/// Any `'static` value can be dispatched. The dispatcher only looks at the
/// concrete runtime type of the value, never at its contents.
pub trait Event: Any {
    /// Name of the concrete event type, used in log records.
    fn event_name(&self) -> &'static str;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Event for T {
    fn event_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Identity of an event type: the key listeners are registered under.
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// Identity of the static type `E`.
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    /// Identity of the concrete type behind a type-erased event.
    pub fn of_val(event: &dyn Event) -> Self {
        Self {
            id: event.as_any().type_id(),
            name: event.event_name(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventType").field(&self.name).finish()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
