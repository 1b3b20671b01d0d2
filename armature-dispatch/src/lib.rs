//! Synchronous event dispatch for Armature
//!
//! Maps event types to ordered lists of listeners and runs them, one after
//! another, whenever an event of that exact type is dispatched.
//!
//! ## Features
//!
//! - **Any type is an event** - dispatch is keyed by the concrete `TypeId`
//! - **Two listener forms** - inline closures and named handlers built by a
//!   [`ListenerFactory`] on every dispatch
//! - **Ordered and fail-fast** - registration order is dispatch order; the
//!   first error stops the rest and reaches the caller
//! - **Configuration driven** - listener tables load from TOML or JSON
//! - **Dispatch logging** - one record per listener, switchable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use armature_dispatch::*;
//!
//! // Define an event
//! #[derive(Debug)]
//! struct PaymentEvent {
//!     amount: u64,
//! }
//!
//! // Define a listener
//! #[derive(Default)]
//! struct PaymentListener;
//!
//! impl Listener<PaymentEvent> for PaymentListener {
//!     fn handle(&self, event: &PaymentEvent) -> Result<(), ListenerError> {
//!         println!("Charging {}", event.amount);
//!         Ok(())
//!     }
//! }
//!
//! let container = ListenerContainer::new();
//! container.register_default::<PaymentEvent, PaymentListener>("payment_listener");
//!
//! let dispatcher = EventDispatcher::builder()
//!     .factory(container)
//!     .listen_named::<PaymentEvent>("payment_listener")
//!     .listen(|event: &PaymentEvent| {
//!         tracing::info!(amount = event.amount, "payment seen");
//!         Ok(())
//!     })
//!     .build();
//!
//! dispatcher.dispatch(&PaymentEvent { amount: 10 })?;
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! let config = DispatcherConfig::from_file("config/events.toml")?;
//! let catalog = EventCatalog::new().register_as::<PaymentEvent>("app.payment");
//!
//! let dispatcher = EventDispatcherBuilder::from_config(config, &catalog)?
//!     .factory(container)
//!     .build();
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! match dispatcher.dispatch(&event) {
//!     Ok(()) => {}
//!     Err(DispatchError::InvalidListener { listener, .. }) => {
//!         panic!("misconfigured listener: {}", listener)
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod config;
pub mod container;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod listener;
pub mod log;
pub mod resolver;

pub use config::{ConfigError, DispatcherConfig, EventCatalog, FileFormat};
pub use container::{Instance, ListenerContainer, ListenerFactory};
pub use dispatcher::{EventDispatcher, EventDispatcherBuilder};
pub use error::{DispatchError, FactoryError, ListenerError};
pub use event::{Event, EventType};
pub use listener::{DynListener, InlineListener, Listener, ListenerRef, TypedListener};
pub use log::{DispatchLog, TracingLog};
pub use resolver::Resolver;
