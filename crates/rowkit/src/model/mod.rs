//! Item lists for recycling list widgets.
//!
//! This module separates *what* a list shows from *how* a host widget draws
//! it. Client code describes rows as [`Item`]s; each item names the
//! [`Renderer`] that builds and fills its visual unit. The list keeps view
//! types, change notifications and diffing out of client code:
//!
//! - [`RendererRegistry`] gives every renderer a stable [`ViewType`]
//! - [`ItemManager`] holds the rows and reports each mutation as a
//!   [`ChangeEvent`]
//! - [`diff`] computes the minimal [`EditScript`] between two row lists
//! - [`ItemAdapter`] answers the host widget's count / view type / create /
//!   bind queries
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  mutate   ┌─────────────┐  ChangeEvent  ┌─────────────┐
//! │ Client code │──────────>│ ItemManager │──────────────>│ Host widget │
//! └─────────────┘           └─────────────┘               └─────────────┘
//!                             │         │                        │
//!                     ensure  │         │ rows                   │ count, view type,
//!                             v         v                        │ create, bind
//!                  ┌──────────────────┐ ┌─────────────┐          │
//!                  │ RendererRegistry │ │ ItemAdapter │<─────────┘
//!                  └──────────────────┘ └─────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rowkit::model::{ChangeEvent, ItemAdapter, ItemManager, RendererRegistry};
//!
//! let manager = Arc::new(ItemManager::with_registry(RendererRegistry::shared()));
//! manager.set_observer(|event: &ChangeEvent| println!("list {event}"));
//!
//! let adapter = ItemAdapter::new(manager.clone());
//! // Rows are pushed with `manager.push(...)` or rebuilt with
//! // `manager.auto_refresh(|rows| ...)`; the host widget reads them through
//! // the adapter.
//! assert_eq!(adapter.item_count(), 0);
//! ```

mod adapter;
mod builder;
mod config;
pub mod diff;
mod event;
mod item;
mod manager;
mod registry;

pub use adapter::ItemAdapter;
pub use builder::ItemListExt;
pub use config::{ManagerConfig, RemovalRefresh};
pub use diff::{EditOp, EditScript, diff, diff_by};
pub use event::{ChangeEvent, ChangeObserver};
pub use item::{Item, ItemRef, Renderer, RendererRef, Visual, item_eq};
pub use manager::ItemManager;
pub use registry::{RendererRegistry, ViewType};
