//! Error types for the variables extension

use thiserror::Error;
use varmark_surface::SurfaceError;

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("source view is already open")]
    DialogOpen,

    #[error("source view is not open")]
    DialogClosed,
}
