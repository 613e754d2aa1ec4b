//! Typed notification events emitted by the variables extension
//!
//! Listeners are registered on the surface and observe events read-only;
//! all tree mutation happens in the synchronous handler that emitted the
//! event.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Notification payloads consumable by host-level listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableEvent {
    /// A marker was produced from a placeholder match
    Rendered { raw: String, label: String },

    /// A marker was removed via the key policy
    Deleted { content: String },

    /// A suppressed attempt to edit a marker in place
    ModifyAttempt { node_id: String },
}

/// Listener registry for [`VariableEvent`] notifications
#[derive(Default, Clone)]
pub struct EventHub {
    listeners: Vec<Arc<dyn Fn(&VariableEvent)>>,
}

impl EventHub {
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&VariableEvent) + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    pub fn emit(&self, event: &VariableEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
