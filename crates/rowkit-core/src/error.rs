//! Error types for rowkit.

/// A specialized Result type for rowkit operations.
pub type Result<T> = std::result::Result<T, ListError>;

/// Errors raised by the registry, the item manager and the binding shim.
///
/// Lookup failures ([`UnregisteredRenderer`](Self::UnregisteredRenderer) and
/// [`UnknownViewType`](Self::UnknownViewType)) signal a broken contract: every
/// item reaching an observer has had its renderer ensured, so hitting one of
/// them means the caller bypassed the manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// The renderer was never assigned a view type.
    #[error("renderer '{renderer}' is not registered")]
    UnregisteredRenderer { renderer: String },

    /// No renderer is registered under this view type.
    #[error("view type {view_type} is unused")]
    UnknownViewType { view_type: usize },

    /// An index-based operation was given an index outside the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A sub-range was requested that does not fit inside the sequence.
    #[error("range {start}..{end} out of bounds for length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// A renderer was handed a visual it did not create.
    #[error("renderer '{renderer}' expected a visual of type {expected}")]
    VisualMismatch {
        renderer: String,
        expected: &'static str,
    },

    /// A renderer was asked to bind an item of another kind.
    #[error("renderer '{renderer}' expected an item of type {expected}")]
    ItemMismatch {
        renderer: String,
        expected: &'static str,
    },

    /// A renderer was given a parent container it cannot build into.
    #[error("renderer '{renderer}' cannot create a visual inside {expected}")]
    ParentMismatch {
        renderer: String,
        expected: &'static str,
    },
}

impl ListError {
    /// Create an index error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a visual mismatch error for the expected visual type `T`.
    pub fn visual_mismatch<T: ?Sized>(renderer: impl Into<String>) -> Self {
        Self::VisualMismatch {
            renderer: renderer.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create an item mismatch error for the expected item type `T`.
    pub fn item_mismatch<T: ?Sized>(renderer: impl Into<String>) -> Self {
        Self::ItemMismatch {
            renderer: renderer.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create a parent mismatch error for the expected container type `T`.
    pub fn parent_mismatch<T: ?Sized>(renderer: impl Into<String>) -> Self {
        Self::ParentMismatch {
            renderer: renderer.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// Returns `true` for registry lookup failures.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredRenderer { .. } | Self::UnknownViewType { .. }
        )
    }
}
