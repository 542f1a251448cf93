//! Renderer registry: stable view types for renderers.
//!
//! The registry hands out small integers ("view types") to renderers in the
//! order it first sees them, starting at 0. Host list widgets use the view
//! type to decide which visual units can be reused for which rows. The
//! registry only grows: view types stay valid for its whole lifetime even
//! after every item using a renderer has left the list.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rowkit_core::{ListError, Result};

use super::item::{ItemRef, RendererRef};

/// Small non-negative integer identifying one renderer within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ViewType(usize);

impl ViewType {
    /// Create a view type from its raw value.
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// The raw integer value.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<ViewType> for usize {
    fn from(view_type: ViewType) -> Self {
        view_type.0
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Default)]
struct RegistryInner {
    by_renderer: HashMap<RendererRef, ViewType>,
    /// Indexed by view type.
    renderers: Vec<RendererRef>,
}

/// Bidirectional map between renderers and view types.
///
/// Share one registry (through `Arc`) between every list that feeds the same
/// host widget. Tests usually build a fresh one per case; applications can
/// use the process-wide [`RendererRegistry::global`].
#[derive(Default)]
pub struct RendererRegistry {
    inner: RwLock<RegistryInner>,
}

static GLOBAL: OnceLock<Arc<RendererRegistry>> = OnceLock::new();

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(Self::shared).clone()
    }

    /// Assign a view type to `renderer` if it has none, and return it.
    pub fn ensure(&self, renderer: &RendererRef) -> ViewType {
        if let Some(view_type) = self.inner.read().by_renderer.get(renderer) {
            return *view_type;
        }

        let mut inner = self.inner.write();
        // Another caller may have registered it between the two locks.
        if let Some(view_type) = inner.by_renderer.get(renderer) {
            return *view_type;
        }
        let view_type = ViewType(inner.renderers.len());
        inner.by_renderer.insert(renderer.clone(), view_type);
        inner.renderers.push(renderer.clone());
        tracing::debug!(
            target: "rowkit::registry",
            renderer = renderer.name(),
            view_type = view_type.0,
            "registered renderer"
        );
        view_type
    }

    /// Ensure the renderers of all `items`, visiting each renderer once in
    /// first-seen order.
    pub fn ensure_all<'a, I>(&self, items: I)
    where
        I: IntoIterator<Item = &'a ItemRef>,
    {
        let mut seen = HashSet::new();
        for item in items {
            let renderer = item.renderer();
            if seen.insert(renderer.addr()) {
                self.ensure(&renderer);
            }
        }
    }

    /// The view type assigned to `renderer`.
    pub fn view_type_of(&self, renderer: &RendererRef) -> Result<ViewType> {
        self.inner
            .read()
            .by_renderer
            .get(renderer)
            .copied()
            .ok_or_else(|| ListError::UnregisteredRenderer {
                renderer: renderer.name().to_string(),
            })
    }

    /// The renderer registered under `view_type`.
    pub fn renderer_of(&self, view_type: ViewType) -> Result<RendererRef> {
        self.inner
            .read()
            .renderers
            .get(view_type.0)
            .cloned()
            .ok_or(ListError::UnknownViewType {
                view_type: view_type.0,
            })
    }

    /// Returns `true` if `renderer` has a view type.
    pub fn contains(&self, renderer: &RendererRef) -> bool {
        self.inner.read().by_renderer.contains_key(renderer)
    }

    /// Number of registered renderers.
    pub fn len(&self) -> usize {
        self.inner.read().renderers.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_list()
            .entries(inner.renderers.iter().map(|r| r.name()))
            .finish()
    }
}

static_assertions::assert_impl_all!(RendererRegistry: Send, Sync);
