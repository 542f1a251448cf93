//! Helpers for building item lists in closures.
//!
//! [`ItemManager::build`](super::ItemManager::build),
//! [`ItemManager::refresh_with`](super::ItemManager::refresh_with) and
//! [`ItemManager::auto_refresh`](super::ItemManager::auto_refresh) all hand a
//! `&mut Vec<ItemRef>` to a closure. [`ItemListExt`] lets that closure push
//! concrete items without wrapping each one in an `Arc` by hand, and is the
//! natural place for applications to hang their own row constructors:
//!
//! ```
//! use std::any::Any;
//! use std::sync::LazyLock;
//! use rowkit::model::{Item, ItemListExt, ItemManager, ItemRef, Renderer, RendererRef, Visual};
//! use rowkit::Result;
//!
//! struct NoteRenderer;
//!
//! impl Renderer for NoteRenderer {
//!     fn create_visual(&self, _parent: &dyn Any) -> Result<Visual> {
//!         Ok(Visual::new(String::new()))
//!     }
//!
//!     fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
//!         let note = item.downcast_or_err::<Note>(self.name())?;
//!         *visual.downcast_mut::<String>(self.name())? = note.0.to_string();
//!         Ok(())
//!     }
//! }
//!
//! static NOTE: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(NoteRenderer));
//!
//! #[derive(Debug)]
//! struct Note(&'static str);
//!
//! impl Item for Note {
//!     fn renderer(&self) -> RendererRef {
//!         NOTE.clone()
//!     }
//! }
//!
//! trait NoteRows {
//!     fn note(&mut self, text: &'static str) -> &mut Self;
//! }
//!
//! impl NoteRows for Vec<ItemRef> {
//!     fn note(&mut self, text: &'static str) -> &mut Self {
//!         self.push_item(Note(text))
//!     }
//! }
//!
//! let manager = ItemManager::build(|rows| {
//!     rows.note("first").note("second");
//! });
//! assert_eq!(manager.len(), 2);
//! ```

use std::sync::Arc;

use super::item::{Item, ItemRef};

/// Convenience methods on the row vector handed to builder closures.
pub trait ItemListExt {
    /// Append a concrete item.
    fn push_item<I: Item>(&mut self, item: I) -> &mut Self;

    /// Append every item yielded by `items`.
    fn extend_items<I, It>(&mut self, items: It) -> &mut Self
    where
        I: Item,
        It: IntoIterator<Item = I>;

    /// Append a concrete item if `condition` holds.
    fn push_item_if<I: Item>(&mut self, condition: bool, item: impl FnOnce() -> I) -> &mut Self {
        if condition {
            self.push_item(item());
        }
        self
    }
}

impl ItemListExt for Vec<ItemRef> {
    fn push_item<I: Item>(&mut self, item: I) -> &mut Self {
        self.push(Arc::new(item));
        self
    }

    fn extend_items<I, It>(&mut self, items: It) -> &mut Self
    where
        I: Item,
        It: IntoIterator<Item = I>,
    {
        self.extend(items.into_iter().map(|item| Arc::new(item) as ItemRef));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Renderer, RendererRef, Visual};
    use rowkit_core::Result;
    use std::any::Any;
    use std::sync::LazyLock;

    struct Noop;

    impl Renderer for Noop {
        fn create_visual(&self, _parent: &dyn Any) -> Result<Visual> {
            Ok(Visual::new(()))
        }

        fn bind_visual(&self, _visual: &mut Visual, _item: &dyn Item) -> Result<()> {
            Ok(())
        }
    }

    static NOOP: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(Noop));

    #[derive(Debug)]
    struct Num(u8);

    impl Item for Num {
        fn renderer(&self) -> RendererRef {
            NOOP.clone()
        }
    }

    #[test]
    fn test_chained_pushes() {
        let mut rows: Vec<ItemRef> = Vec::new();
        rows.push_item(Num(1))
            .extend_items((2..5).map(Num))
            .push_item_if(false, || Num(9))
            .push_item_if(true, || Num(5));

        let values: Vec<u8> = rows
            .iter()
            .filter_map(|row| row.downcast_ref::<Num>().map(|n| n.0))
            .collect();
        assert_eq!(values, [1, 2, 3, 4, 5]);
    }
}
