//! rowkit - declarative item lists for recycling list widgets.
//!
//! Describe rows as items, let the list assign view types and compute change
//! notifications, and hand the host widget an adapter.
//!
//! # Example
//!
//! ```
//! use rowkit::model::{ChangeEvent, ItemManager};
//!
//! let manager = ItemManager::build(|_rows| {});
//! manager.set_observer(|event: &ChangeEvent| println!("{event}"));
//! let script = manager.auto_refresh(|_rows| {});
//! assert!(script.is_empty());
//! ```

pub use rowkit_core::*;

pub mod model;
