//! Items, renderers and visuals.
//!
//! An [`Item`] is one row's data. It names the [`Renderer`] that knows how to
//! build and fill the visual unit for it, and optionally tells the differ
//! whether two items describe the same row ([`Item::same_identity`]) and
//! whether they would render identically ([`Item::same_content`]).
//!
//! # Renderer identity
//!
//! View types are keyed on the *identity* of a renderer handle, not on its
//! type or value. Every item of one kind must return a clone of the same
//! [`RendererRef`]. Building a fresh `RendererRef` per item gives each item
//! its own view type and defeats visual reuse in the host widget. The usual
//! pattern is a `LazyLock` static next to the item type:
//!
//! ```
//! use std::any::Any;
//! use std::sync::LazyLock;
//! use rowkit::model::{Item, Renderer, RendererRef, Visual};
//! use rowkit::Result;
//!
//! struct LabelRenderer;
//!
//! impl Renderer for LabelRenderer {
//!     fn create_visual(&self, _parent: &dyn Any) -> Result<Visual> {
//!         Ok(Visual::new(String::new()))
//!     }
//!
//!     fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
//!         let label = item.downcast_or_err::<Label>(self.name())?;
//!         *visual.downcast_mut::<String>(self.name())? = label.0.clone();
//!         Ok(())
//!     }
//! }
//!
//! static LABEL: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(LabelRenderer));
//!
//! #[derive(Debug)]
//! struct Label(String);
//!
//! impl Item for Label {
//!     fn renderer(&self) -> RendererRef {
//!         LABEL.clone()
//!     }
//! }
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rowkit_core::{ListError, Result};

/// Shared handle to an item held by an item list.
pub type ItemRef = Arc<dyn Item>;

/// One row of a list: its data plus the renderer that draws it.
///
/// Both comparison predicates default to `false`, which makes the differ
/// treat every row as new and re-render it.
pub trait Item: Any + Send + Sync + fmt::Debug {
    /// The renderer used for this item. Must be a shared handle.
    fn renderer(&self) -> RendererRef;

    /// Whether `self` (from the old list) and `other` (from the new list)
    /// represent the same row, e.g. the same underlying record.
    fn same_identity(&self, _other: &dyn Item) -> bool {
        false
    }

    /// Whether re-rendering `other` would produce the same output as `self`.
    ///
    /// Only consulted when [`same_identity`](Self::same_identity) holds.
    fn same_content(&self, _other: &dyn Item) -> bool {
        false
    }

    /// Value equality used by value-based search and removal.
    ///
    /// Two handles to the same allocation are always equal; this hook lets
    /// distinct allocations compare equal too.
    fn equals(&self, _other: &dyn Item) -> bool {
        false
    }
}

impl dyn Item {
    /// Returns the item as `T` if it is one.
    pub fn downcast_ref<T: Item>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Returns `true` if the item is a `T`.
    pub fn is<T: Item>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Like [`downcast_ref`](Self::downcast_ref), reporting a mismatch as
    /// [`ListError::ItemMismatch`] attributed to `renderer`.
    pub fn downcast_or_err<T: Item>(&self, renderer: &str) -> Result<&T> {
        self.downcast_ref::<T>()
            .ok_or_else(|| ListError::item_mismatch::<T>(renderer))
    }
}

/// Returns `true` if `a` and `b` are the same item by allocation or by
/// [`Item::equals`].
pub fn item_eq(a: &ItemRef, b: &ItemRef) -> bool {
    Arc::ptr_eq(a, b) || a.equals(b.as_ref())
}

/// A rendering strategy for one kind of item.
///
/// Renderers are stateless and shared by every item of their kind through a
/// single [`RendererRef`].
pub trait Renderer: Send + Sync {
    /// Build a new, unbound visual unit inside `parent`.
    ///
    /// `parent` is the host toolkit's container; renderers downcast it to
    /// the concrete type they know how to build into.
    fn create_visual(&self, parent: &dyn Any) -> Result<Visual>;

    /// Fill `visual` (created by this renderer) with `item`'s data.
    fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// Identity-compared handle to a shared [`Renderer`].
///
/// Equality and hashing use the address of the shared allocation: two
/// handles are equal only if one was cloned from the other. Do not construct
/// a new handle per item.
#[derive(Clone)]
pub struct RendererRef(Arc<dyn Renderer>);

impl RendererRef {
    /// Wrap a renderer in a new shared handle with its own identity.
    pub fn new<R: Renderer + 'static>(renderer: R) -> Self {
        Self(Arc::new(renderer))
    }

    /// Wrap an already shared renderer.
    pub fn from_arc(renderer: Arc<dyn Renderer>) -> Self {
        Self(renderer)
    }

    /// Address of the shared allocation; stable while any handle is alive.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Returns `true` if both handles share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// The renderer's diagnostic name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Borrow the renderer.
    pub fn renderer(&self) -> &dyn Renderer {
        self.0.as_ref()
    }
}

impl PartialEq for RendererRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for RendererRef {}

impl Hash for RendererRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for RendererRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RendererRef({} @ {:#x})", self.name(), self.addr())
    }
}

/// Opaque visual unit created by a renderer and reused by the host widget
/// for every item of the same view type.
pub struct Visual(Box<dyn Any + Send>);

impl Visual {
    /// Wrap a toolkit-specific visual.
    pub fn new<T: Any + Send>(inner: T) -> Self {
        Self(Box::new(inner))
    }

    /// Borrow the inner visual as `T`.
    pub fn downcast_ref<T: Any>(&self, renderer: &str) -> Result<&T> {
        self.0
            .downcast_ref::<T>()
            .ok_or_else(|| ListError::visual_mismatch::<T>(renderer))
    }

    /// Mutably borrow the inner visual as `T`.
    pub fn downcast_mut<T: Any>(&mut self, renderer: &str) -> Result<&mut T> {
        self.0
            .downcast_mut::<T>()
            .ok_or_else(|| ListError::visual_mismatch::<T>(renderer))
    }

    /// Unwrap the inner visual, returning `self` unchanged on a type mismatch.
    pub fn into_inner<T: Any>(self) -> std::result::Result<Box<T>, Self> {
        self.0.downcast::<T>().map_err(Self)
    }
}

impl fmt::Debug for Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visual").finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(RendererRef: Send, Sync);
static_assertions::assert_impl_all!(Visual: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Plain;

    impl Renderer for Plain {
        fn create_visual(&self, _parent: &dyn Any) -> Result<Visual> {
            Ok(Visual::new(Vec::<String>::new()))
        }

        fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
            let row = item.downcast_or_err::<Row>(self.name())?;
            visual
                .downcast_mut::<Vec<String>>(self.name())?
                .push(row.0.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Row(String);

    impl Item for Row {
        fn renderer(&self) -> RendererRef {
            RendererRef::new(Plain)
        }
    }

    #[derive(Debug)]
    struct Other;

    impl Item for Other {
        fn renderer(&self) -> RendererRef {
            RendererRef::new(Plain)
        }
    }

    #[test]
    fn test_renderer_ref_identity() {
        let a = RendererRef::new(Plain);
        let b = a.clone();
        let c = RendererRef::new(Plain);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_renderer_ref_from_shared_arc() {
        let shared: Arc<dyn Renderer> = Arc::new(Plain);
        let a = RendererRef::from_arc(shared.clone());
        let b = RendererRef::from_arc(shared);

        assert_eq!(a, b);
        assert_ne!(a, RendererRef::from_arc(Arc::new(Plain)));
    }

    #[test]
    fn test_renderer_default_name() {
        let r = RendererRef::new(Plain);
        assert!(r.name().ends_with("Plain"));
    }

    #[test]
    fn test_downcast_item() {
        let item: ItemRef = Arc::new(Row("a".into()));
        assert!(item.is::<Row>());
        assert!(!item.is::<Other>());
        assert_eq!(item.downcast_ref::<Row>().unwrap().0, "a");

        let err = item.downcast_or_err::<Other>("Plain").unwrap_err();
        assert!(matches!(err, ListError::ItemMismatch { .. }));
    }

    #[test]
    fn test_bind_through_visual() {
        let renderer = Plain;
        let mut visual = renderer.create_visual(&()).unwrap();
        renderer.bind_visual(&mut visual, &Row("hello".into())).unwrap();

        let lines = visual.downcast_ref::<Vec<String>>("Plain").unwrap();
        assert_eq!(lines, &vec!["hello".to_string()]);

        assert!(matches!(
            visual.downcast_ref::<String>("Plain"),
            Err(ListError::VisualMismatch { .. })
        ));
        assert!(visual.into_inner::<Vec<String>>().is_ok());
    }

    #[test]
    fn test_item_eq_defaults_to_allocation() {
        let a: ItemRef = Arc::new(Row("x".into()));
        let b: ItemRef = Arc::new(Row("x".into()));
        assert!(item_eq(&a, &a.clone()));
        assert!(!item_eq(&a, &b));
    }
}
