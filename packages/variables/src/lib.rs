//! # Varmark Variables
//!
//! Variable-placeholder extension for a [`varmark_surface::Surface`].
//!
//! Authors type `{user.name}`; the extension renders it as a styled,
//! non-editable inline marker and converts back to plain text for source
//! editing. Three cooperating parts:
//!
//! - [`Renderer`]: placeholder text ⇄ marker elements (two-phase tree
//!   rewrites, allow-list + label mapping from the surface params)
//! - [`keyboard::intercept`]: key-down policy while the caret is inside a
//!   marker (delete whole, step out, suppress edits)
//! - [`SourceView`]: raw-text dialog around reverse/forward conversion
//!
//! ## Usage
//!
//! ```rust
//! use varmark_surface::{Key, Surface};
//! use varmark_variables::VariablesExtension;
//!
//! let mut surface = Surface::with_content("compose", "Hi {user.name}!").unwrap();
//! let mut extension = VariablesExtension::new();
//!
//! // host init hook
//! extension.attach(&mut surface).unwrap();
//! assert!(surface.content().contains("data-original-variable"));
//!
//! // host input hooks
//! extension.on_key_up(&mut surface);
//! let _disposition = extension.on_key_down(&mut surface, Key::Char('x')).unwrap();
//!
//! // toolbar "Edit source" click
//! let raw = extension.open_source_view(&mut surface).unwrap();
//! assert_eq!(raw, "Hi {user.name}!");
//! extension.cancel_source_view(&mut surface).unwrap();
//! ```

mod error;
pub mod keyboard;
mod renderer;
mod source_view;

pub use error::ExtensionError;
pub use renderer::{Renderer, MARKER_CLASS, ORIGINAL_ATTR};
pub use source_view::SourceView;

use varmark_surface::{Key, KeyDisposition, Surface, ToolbarButton};

/// One extension instance per surface
///
/// Bundles the renderer and the source-view state so multiple surfaces can
/// each carry their own independent extension.
#[derive(Debug, Default)]
pub struct VariablesExtension {
    renderer: Renderer,
    source_view: SourceView,
}

impl VariablesExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialization hook: render existing placeholders and register the
    /// "Edit source" toolbar button
    ///
    /// Attaching twice to the same surface fails with
    /// [`varmark_surface::SurfaceError::ButtonExists`].
    pub fn attach(&mut self, surface: &mut Surface) -> Result<(), ExtensionError> {
        surface.add_button(ToolbarButton::new("source", "Edit source", "code"))?;
        self.renderer.render(surface);
        Ok(())
    }

    /// Key-up hook: re-render placeholders typed since the last pass
    pub fn on_key_up(&self, surface: &mut Surface) {
        self.renderer.render(surface);
    }

    /// Key-down hook: marker edit/delete/navigate policy
    pub fn on_key_down(
        &self,
        surface: &mut Surface,
        key: Key,
    ) -> Result<KeyDisposition, ExtensionError> {
        keyboard::intercept(surface, key)
    }

    /// Toolbar click: open the raw-source dialog, returning its initial text
    pub fn open_source_view(&mut self, surface: &mut Surface) -> Result<String, ExtensionError> {
        self.source_view.open(&self.renderer, surface)
    }

    /// Dialog submit: install edited text verbatim
    pub fn confirm_source_view(
        &mut self,
        surface: &mut Surface,
        edited: &str,
    ) -> Result<(), ExtensionError> {
        self.source_view.confirm(surface, edited)
    }

    /// Dialog close/cancel: restore rendered-marker form
    pub fn cancel_source_view(&mut self, surface: &mut Surface) -> Result<(), ExtensionError> {
        self.source_view.cancel(&self.renderer, surface)
    }

    pub fn source_view(&self) -> &SourceView {
        &self.source_view
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
