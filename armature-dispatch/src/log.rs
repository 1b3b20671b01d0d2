//! Dispatch activity logging

use crate::event::Event;
use crate::listener::ListenerRef;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Sink for the one-line records written before each listener fires.
pub trait DispatchLog: Send + Sync {
    fn info(&self, message: &str);
}

impl<L: DispatchLog + ?Sized> DispatchLog for Arc<L> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }
}

/// Default sink: forwards records to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DispatchLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "armature::events", "{}", message);
    }
}

/// Render the record for one (event, listener) pair.
pub fn format_record(event: &dyn Event, listener: &ListenerRef) -> String {
    format!(
        "Event: {}\nTrigger: {}",
        event.event_name(),
        listener.describe()
    )
}

/// Write a record, swallowing any panic raised by the sink.
pub(crate) fn emit(log: &dyn DispatchLog, message: &str) {
    let _ = catch_unwind(AssertUnwindSafe(|| log.info(message)));
}
