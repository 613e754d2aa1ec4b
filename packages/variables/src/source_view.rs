//! # Source View Integration
//!
//! Dialog state machine behind the "Edit source" toolbar button:
//!
//! ```text
//! Closed ──open──▶ Open { draft }
//!   ▲                  │
//!   ├──confirm: edited text installed verbatim (raw until next render)
//!   └──cancel:  forward conversion re-applied immediately
//! ```

use tracing::debug;
use varmark_surface::Surface;

use crate::error::ExtensionError;
use crate::renderer::Renderer;

#[derive(Debug, Default)]
pub struct SourceView {
    state: DialogState,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum DialogState {
    #[default]
    Closed,
    Open {
        draft: String,
    },
}

impl SourceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    /// The raw text currently shown in the dialog
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open { draft } => Some(draft),
            DialogState::Closed => None,
        }
    }

    /// Open the dialog: strip markers and expose the raw serialized content
    pub fn open(
        &mut self,
        renderer: &Renderer,
        surface: &mut Surface,
    ) -> Result<String, ExtensionError> {
        if self.is_open() {
            return Err(ExtensionError::DialogOpen);
        }

        renderer.strip(surface);
        let draft = surface.content();
        debug!(surface = %surface.name(), bytes = draft.len(), "source view opened");
        self.state = DialogState::Open {
            draft: draft.clone(),
        };
        Ok(draft)
    }

    /// Confirm: install the edited text verbatim as the new content
    ///
    /// No forward conversion happens here; the next key-up or re-open
    /// re-renders markers. On a markup parse error the dialog stays open so
    /// the text can be corrected.
    pub fn confirm(&mut self, surface: &mut Surface, edited: &str) -> Result<(), ExtensionError> {
        if !self.is_open() {
            return Err(ExtensionError::DialogClosed);
        }

        surface.set_content(edited)?;
        self.state = DialogState::Closed;
        debug!(surface = %surface.name(), "source view confirmed");
        Ok(())
    }

    /// Cancel: restore rendered-marker form immediately
    pub fn cancel(
        &mut self,
        renderer: &Renderer,
        surface: &mut Surface,
    ) -> Result<(), ExtensionError> {
        if !self.is_open() {
            return Err(ExtensionError::DialogClosed);
        }

        renderer.render(surface);
        self.state = DialogState::Closed;
        debug!(surface = %surface.name(), "source view cancelled");
        Ok(())
    }
}
