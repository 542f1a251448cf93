//! Adapter between an item list and a host list widget.

use std::any::Any;
use std::sync::Arc;

use rowkit_core::Result;

use super::item::{ItemRef, Visual};
use super::manager::ItemManager;
use super::registry::{RendererRegistry, ViewType};

/// The four queries a recycling list widget makes of its data source.
///
/// The widget asks how many rows there are, which view type each row has,
/// asks for a fresh visual when it has none to reuse for a view type, and
/// finally binds a (new or reused) visual to a row. Change notifications come
/// from the manager's observer, see [`ItemManager::set_observer`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rowkit::model::{ItemAdapter, ItemManager, RendererRegistry};
///
/// let manager = Arc::new(ItemManager::with_registry(RendererRegistry::shared()));
/// let adapter = ItemAdapter::new(manager.clone());
/// assert_eq!(adapter.item_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ItemAdapter {
    manager: Arc<ItemManager>,
}

impl ItemAdapter {
    /// Wrap an existing manager.
    pub fn new(manager: Arc<ItemManager>) -> Self {
        Self { manager }
    }

    /// Create an adapter over `items`, using the global registry.
    pub fn with_items(items: Vec<ItemRef>) -> Self {
        Self::new(Arc::new(ItemManager::with_items(
            RendererRegistry::global(),
            items,
        )))
    }

    /// Create an adapter on the global registry from rows pushed by `init`.
    pub fn build(init: impl FnOnce(&mut Vec<ItemRef>)) -> Self {
        Self::new(Arc::new(ItemManager::build(init)))
    }

    /// The underlying item list.
    pub fn manager(&self) -> &Arc<ItemManager> {
        &self.manager
    }

    /// Number of rows.
    pub fn item_count(&self) -> usize {
        self.manager.len()
    }

    /// View type of the row at `index`.
    pub fn view_type(&self, index: usize) -> Result<ViewType> {
        let item = self.manager.get(index)?;
        self.manager.registry().view_type_of(&item.renderer())
    }

    /// Build a new visual for `view_type` inside `parent`.
    pub fn create_visual(&self, view_type: ViewType, parent: &dyn Any) -> Result<Visual> {
        let renderer = self.manager.registry().renderer_of(view_type)?;
        tracing::trace!(
            target: "rowkit::manager",
            renderer = renderer.name(),
            %view_type,
            "create visual"
        );
        renderer.renderer().create_visual(parent)
    }

    /// Fill `visual` with the row at `index`.
    pub fn bind_visual(&self, visual: &mut Visual, index: usize) -> Result<()> {
        let item = self.manager.get(index)?;
        item.renderer().renderer().bind_visual(visual, item.as_ref())
    }
}

static_assertions::assert_impl_all!(ItemAdapter: Send, Sync);
