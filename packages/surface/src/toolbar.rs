use serde::{Deserialize, Serialize};

/// A toolbar button registered by an extension
///
/// The surface only records the descriptor; wiring the click to an
/// extension operation is the host's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarButton {
    pub id: String,
    pub label: String,
    pub icon: String,
}

impl ToolbarButton {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }
}
