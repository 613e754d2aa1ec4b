//! # Surface Handle
//!
//! Per-instance editing surface: the content tree plus the editing state an
//! extension needs (caret, params, toolbar, notifications).
//!
//! All operations run synchronously on the caller's thread; the content
//! tree is only ever mutated through the handle, so there is no locking
//! discipline to observe.

use tracing::debug;
use varmark_dom::{parse, serialize, Element, IdGenerator};

use crate::error::SurfaceError;
use crate::events::{EventHub, VariableEvent};
use crate::params::Params;
use crate::toolbar::ToolbarButton;
use serde::{Deserialize, Serialize};

/// Caret position within the surface body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caret {
    /// Generated ID of the element containing the caret
    pub element_id: String,

    /// Index of the child the caret sits in
    pub child_index: usize,

    /// Character offset within that child
    pub offset: usize,
}

/// A single host editing surface
#[derive(Debug)]
pub struct Surface {
    name: String,
    body: Element,
    params: Params,
    caret: Option<Caret>,
    buttons: Vec<ToolbarButton>,
    hub: EventHub,
    ids: IdGenerator,

    /// Content version, incremented on each mutation
    version: u64,
}

impl Surface {
    /// Create an empty surface
    pub fn new(name: &str) -> Self {
        let mut ids = IdGenerator::new(name);
        let body = Element::new("body", ids.new_id());
        Self {
            name: name.to_string(),
            body,
            params: Params::default(),
            caret: None,
            buttons: Vec::new(),
            hub: EventHub::default(),
            ids,
            version: 0,
        }
    }

    /// Create a surface with initial markup content
    pub fn with_content(name: &str, markup: &str) -> Result<Self, SurfaceError> {
        let mut surface = Self::new(name);
        surface.set_content(markup)?;
        Ok(surface)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Mutable body access; counts as a content mutation
    pub fn body_mut(&mut self) -> &mut Element {
        self.version += 1;
        &mut self.body
    }

    /// Serialized markup of the body's children
    pub fn content(&self) -> String {
        serialize(&self.body.children)
    }

    /// Replace the body content with parsed markup
    ///
    /// The caret is dropped: its node no longer exists.
    pub fn set_content(&mut self, markup: &str) -> Result<(), SurfaceError> {
        let nodes = parse(markup, &mut self.ids)?;
        self.body.children = nodes;
        self.caret = None;
        self.version += 1;
        debug!(surface = %self.name, version = self.version, "content replaced");
        Ok(())
    }

    /// Allocate a node ID for an element created outside the parser
    pub fn next_node_id(&mut self) -> String {
        self.ids.new_id()
    }

    pub fn caret(&self) -> Option<&Caret> {
        self.caret.as_ref()
    }

    pub fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    /// Resolve the element containing the caret
    pub fn caret_element(&self) -> Option<&Element> {
        let caret = self.caret.as_ref()?;
        self.body.find_element_by_id(&caret.element_id)
    }

    /// Register a toolbar button; each button ID may be registered once
    pub fn add_button(&mut self, button: ToolbarButton) -> Result<(), SurfaceError> {
        if self.buttons.iter().any(|existing| existing.id == button.id) {
            return Err(SurfaceError::ButtonExists(button.id));
        }
        debug!(surface = %self.name, button = %button.id, "toolbar button registered");
        self.buttons.push(button);
        Ok(())
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    /// Register a notification listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&VariableEvent) + 'static,
    {
        self.hub.subscribe(listener);
    }

    /// Emit a notification to all listeners
    pub fn emit(&self, event: VariableEvent) {
        self.hub.emit(&event);
    }
}
