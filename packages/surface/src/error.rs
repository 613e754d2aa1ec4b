//! Error types for the surface model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("markup error: {0}")]
    Markup(#[from] varmark_dom::ParseError),

    #[error("toolbar button already registered: {0}")]
    ButtonExists(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),
}
