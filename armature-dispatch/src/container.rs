// Listener container: materializes named listeners on demand

use crate::error::FactoryError;
use crate::event::Event;
use crate::listener::{DynListener, Listener, TypedListener};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// An object produced by a [`ListenerFactory`].
pub enum Instance {
    /// Something that can handle events of one type.
    Listener(Box<dyn DynListener>),
    /// Any other object. It cannot be fired.
    Component(Box<dyn Any + Send + Sync>),
}

impl Instance {
    pub fn is_listener(&self) -> bool {
        matches!(self, Self::Listener(_))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listener(l) => f.debug_tuple("Listener").field(&l.event_type()).finish(),
            Self::Component(_) => f.write_str("Component"),
        }
    }
}

/// Turns a listener identifier into a fresh instance.
///
/// The dispatcher calls this every time a named listener is fired.
pub trait ListenerFactory: Send + Sync {
    fn create(&self, id: &str) -> Result<Instance, FactoryError>;
}

type Constructor = dyn Fn() -> Result<Instance, FactoryError> + Send + Sync;

/// Identifier-keyed container of listener constructors.
#[derive(Clone)]
pub struct ListenerContainer {
    constructors: Arc<RwLock<HashMap<String, Arc<Constructor>>>>,
}

impl ListenerContainer {
    pub fn new() -> Self {
        debug!("Creating new listener container");
        Self {
            constructors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a listener for `E` built by `ctor` on every resolution.
    pub fn register_listener<E, L, F>(&self, id: impl Into<String>, ctor: F)
    where
        E: Event,
        L: Listener<E> + 'static,
        F: Fn() -> Result<L, FactoryError> + Send + Sync + 'static,
    {
        let constructor = move || -> Result<Instance, FactoryError> {
            let listener = ctor()?;
            Ok(Instance::Listener(Box::new(TypedListener::<E, L>::new(listener))))
        };
        self.insert(id.into(), std::any::type_name::<L>(), Arc::new(constructor));
    }

    /// Register a listener for `E` built with `L::default()`.
    pub fn register_default<E, L>(&self, id: impl Into<String>)
    where
        E: Event,
        L: Listener<E> + Default + 'static,
    {
        self.register_listener::<E, L, _>(id, || Ok(L::default()));
    }

    /// Register an object that is not a listener.
    pub fn register_component<T, F>(&self, id: impl Into<String>, ctor: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        let constructor = move || -> Result<Instance, FactoryError> {
            let component = ctor()?;
            Ok(Instance::Component(Box::new(component)))
        };
        self.insert(id.into(), std::any::type_name::<T>(), Arc::new(constructor));
    }

    fn insert(&self, id: String, type_name: &'static str, constructor: Arc<Constructor>) {
        trace!(id = %id, "Acquiring write lock for registration");
        let mut constructors = self.constructors.write();
        constructors.insert(id.clone(), constructor);

        debug!(id = %id, provider = type_name, "Listener registered in container");
    }

    /// Check if an identifier is registered
    pub fn has(&self, id: &str) -> bool {
        self.constructors.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.constructors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registration
    pub fn clear(&self) {
        let mut constructors = self.constructors.write();
        let count = constructors.len();
        constructors.clear();

        debug!(count, "Cleared all listeners from container");
    }
}

impl ListenerFactory for ListenerContainer {
    fn create(&self, id: &str) -> Result<Instance, FactoryError> {
        // Clone the constructor out so user code never runs under the lock.
        let constructor = self
            .constructors
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| FactoryError::NotFound(id.to_string()))?;

        trace!(id, "Constructing listener");
        constructor()
    }
}

impl Default for ListenerContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constructors = self.constructors.read();
        let mut ids: Vec<&String> = constructors.keys().collect();
        ids.sort();
        f.debug_struct("ListenerContainer").field("ids", &ids).finish()
    }
}
