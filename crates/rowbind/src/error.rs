//! Error types for the data-set adapter.

use crate::adapter::{LayoutId, ViewSlot};

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while configuring or driving a data-set adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// An item-layout attribute value is not a valid layout reference.
    #[error("Invalid itemLayout resource syntax: '{value}' (expected '@type/name' or '{{property}}')")]
    InvalidLayoutReference { value: String },

    /// A static layout reference did not resolve to a resource identifier.
    #[error("Layout resource '@{resource_type}/{name}' could not be resolved")]
    UnresolvedResource { resource_type: String, name: String },

    /// A dynamic item-layout attribute names a property the context lacks.
    #[error("No layout id property named '{property}'")]
    UnknownLayoutProperty { property: String },

    /// A view operation was requested before any value model was attached.
    #[error("No value model attached to the adapter")]
    NoValueModel,

    /// A recycled row carries a slot this adapter never issued.
    #[error("View slot {slot:?} was not produced by this adapter")]
    UnknownViewSlot { slot: ViewSlot },

    /// A slot exists but no presentation model was ever stored in its tag.
    #[error("View slot {slot:?} has no presentation model attached")]
    UntaggedView { slot: ViewSlot },

    /// The layout binder failed to inflate a layout.
    #[error("Failed to inflate layout {layout}: {message}")]
    Inflate { layout: LayoutId, message: String },

    /// The inflated view could not be bound to its presentation model.
    ///
    /// Returned by [`BindableView::bind_to`](crate::adapter::BindableView::bind_to)
    /// implementations and propagated unchanged by the adapter.
    #[error("Failed to bind view to presentation model: {0}")]
    Bind(String),

    /// A layout selector was configured without any layouts.
    #[error("Layout selector requires at least one layout kind")]
    NoLayoutKinds,

    /// The adapter builder is missing a required component.
    #[error("Adapter builder is missing its {0}")]
    MissingComponent(&'static str),

    /// Adapter configuration could not be parsed.
    #[error("Invalid adapter configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl AdapterError {
    /// Create an invalid layout reference error.
    pub fn invalid_layout_reference(value: impl Into<String>) -> Self {
        Self::InvalidLayoutReference {
            value: value.into(),
        }
    }

    /// Create an inflation error.
    pub fn inflate(layout: LayoutId, message: impl Into<String>) -> Self {
        Self::Inflate {
            layout,
            message: message.into(),
        }
    }

    /// Create a binding error.
    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_reference_names_value() {
        let err = AdapterError::invalid_layout_reference("badformat");
        let message = err.to_string();
        assert!(message.contains("'badformat'"), "{message}");
        assert!(message.contains("{property}"), "{message}");
    }

    #[test]
    fn test_inflate_message() {
        let err = AdapterError::inflate(7, "no such layout");
        assert_eq!(err.to_string(), "Failed to inflate layout 7: no such layout");
    }

    #[test]
    fn test_bind_message() {
        let err = AdapterError::bind("no text slot for property `item`");
        assert_eq!(
            err.to_string(),
            "Failed to bind view to presentation model: no text slot for property `item`"
        );
    }
}
