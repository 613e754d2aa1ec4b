//! # Varmark Surface
//!
//! The host editing-surface model that extensions operate against.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: markup text ⇄ content tree             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ surface: per-instance editing handle        │
//! │  - body tree + caret + content version      │
//! │  - parameter store (variable registry)      │
//! │  - toolbar registry                         │
//! │  - typed notification hub                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ variables: renderer + key policy + source   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! There is intentionally no global "current surface": every operation takes
//! an explicit [`Surface`] handle, so multiple independent surfaces can
//! coexist in one process.

mod error;
mod events;
mod keys;
mod params;
mod surface;
mod toolbar;

pub use error::SurfaceError;
pub use events::{EventHub, VariableEvent};
pub use keys::{Key, KeyDisposition};
pub use params::Params;
pub use surface::{Caret, Surface};
pub use toolbar::ToolbarButton;
