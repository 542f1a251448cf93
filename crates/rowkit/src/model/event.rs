//! Change notifications emitted by item lists.

use std::fmt;

/// A granular description of one change to an item list.
///
/// Events describe a change that has already been applied. A sequence of
/// events applied in order to the previously displayed rows yields the rows
/// now held by the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeEvent {
    /// One item was inserted at `index`.
    ItemInserted(usize),
    /// `count` items were inserted starting at `start`.
    RangeInserted { start: usize, count: usize },
    /// The item at `index` was removed.
    ItemRemoved(usize),
    /// `count` items were removed starting at `start`.
    RangeRemoved { start: usize, count: usize },
    /// The item at `index` was replaced or its content changed.
    ItemChanged(usize),
    /// `count` items starting at `start` changed.
    RangeChanged { start: usize, count: usize },
    /// The item at `from` now sits at `to`.
    ItemMoved { from: usize, to: usize },
    /// Positional information is unavailable; redraw everything.
    DataSetInvalidated,
}

impl ChangeEvent {
    /// Insertion event for `count` items, using the single-item form for one.
    pub fn inserted(start: usize, count: usize) -> Self {
        if count == 1 {
            Self::ItemInserted(start)
        } else {
            Self::RangeInserted { start, count }
        }
    }

    /// Removal event for `count` items, using the single-item form for one.
    pub fn removed(start: usize, count: usize) -> Self {
        if count == 1 {
            Self::ItemRemoved(start)
        } else {
            Self::RangeRemoved { start, count }
        }
    }

    /// Change event for `count` items, using the single-item form for one.
    pub fn changed(start: usize, count: usize) -> Self {
        if count == 1 {
            Self::ItemChanged(start)
        } else {
            Self::RangeChanged { start, count }
        }
    }

    /// Returns `true` for events that force a full redraw.
    pub fn is_invalidation(&self) -> bool {
        matches!(self, Self::DataSetInvalidated)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemInserted(index) => write!(f, "inserted {index}"),
            Self::RangeInserted { start, count } => write!(f, "inserted {start}+{count}"),
            Self::ItemRemoved(index) => write!(f, "removed {index}"),
            Self::RangeRemoved { start, count } => write!(f, "removed {start}+{count}"),
            Self::ItemChanged(index) => write!(f, "changed {index}"),
            Self::RangeChanged { start, count } => write!(f, "changed {start}+{count}"),
            Self::ItemMoved { from, to } => write!(f, "moved {from}->{to}"),
            Self::DataSetInvalidated => f.write_str("invalidated"),
        }
    }
}

/// Receives the change events of an item list.
///
/// Implemented for every `Fn(&ChangeEvent)` closure, so hosts can pass either
/// a closure or their own adapter type.
pub trait ChangeObserver: Send + Sync {
    /// Called synchronously after each mutation has been applied.
    fn on_change(&self, event: &ChangeEvent);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn on_change(&self, event: &ChangeEvent) {
        self(event)
    }
}
