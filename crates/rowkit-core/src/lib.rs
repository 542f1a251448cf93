//! Core systems for rowkit.
//!
//! This crate provides the pieces shared by the rowkit list layer:
//!
//! - **Errors**: [`ListError`] and the crate-wide [`Result`] alias
//! - **Observer slot**: [`ObserverSlot`], a cell holding at most one callback
//! - **Thread affinity**: [`thread_check::ThreadAffinity`] for single-thread
//!   ownership checks
//! - **Logging**: `tracing` targets, span names and [`PerfSpan`]
//!
//! # Observer Example
//!
//! ```
//! use rowkit_core::ObserverSlot;
//!
//! let changed = ObserverSlot::<String>::new();
//! let id = changed.connect(|text| println!("row changed: {text}"));
//!
//! changed.emit(&"first row".to_string());
//! changed.disconnect(id);
//! ```

mod error;
pub mod logging;
pub mod observer;
pub mod thread_check;

pub use error::{ListError, Result};
pub use logging::PerfSpan;
pub use observer::{ConnectionId, ObserverSlot};
