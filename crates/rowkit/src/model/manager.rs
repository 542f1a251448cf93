//! Observable item list.
//!
//! [`ItemManager`] owns the ordered rows of one list widget. Every mutation
//! goes through an explicit method that updates the backing sequence,
//! registers the renderers of inserted items, and then reports the change to
//! the (single) observer:
//!
//! | Mutation | Event |
//! |---|---|
//! | [`push`](ItemManager::push) | `ItemInserted(len - 1)` |
//! | [`insert`](ItemManager::insert) | `ItemInserted(index)` |
//! | [`append_all`](ItemManager::append_all) | `RangeInserted(old_len, count)` |
//! | [`insert_all`](ItemManager::insert_all) | `RangeInserted(index, count)` |
//! | [`remove`](ItemManager::remove) | `ItemRemoved(index)` |
//! | [`set`](ItemManager::set) | `ItemChanged(index)` |
//! | [`clear`](ItemManager::clear) | `RangeRemoved(0, old_len)` |
//! | value / predicate removal | `DataSetInvalidated` |
//!
//! Value and predicate removals have no cheap positional description, so by
//! default they invalidate the whole list. [`RemovalRefresh::Diff`] switches
//! them to granular removal events.
//!
//! For larger edits, [`refresh_all`](ItemManager::refresh_all) and
//! [`auto_refresh`](ItemManager::auto_refresh) diff the old and new rows and
//! dispatch a minimal edit script instead.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;
use rowkit_core::thread_check::ThreadAffinity;
use rowkit_core::{ConnectionId, ListError, ObserverSlot, Result};

use super::config::{ManagerConfig, RemovalRefresh};
use super::diff::{EditScript, diff, diff_by};
use super::event::{ChangeEvent, ChangeObserver};
use super::item::{ItemRef, item_eq};
use super::registry::RendererRegistry;

/// An ordered, observable list of items.
///
/// All methods take `&self`; the rows live behind a lock so a manager can be
/// shared (`Arc<ItemManager>`) between the code editing the list and the
/// [`ItemAdapter`](super::ItemAdapter) the host widget reads from. Mutations
/// are expected on the thread that created the manager and are checked in
/// debug builds.
///
/// # Example
///
/// ```
/// use rowkit::model::{ChangeEvent, ItemManager, RendererRegistry};
///
/// let manager = ItemManager::with_registry(RendererRegistry::shared());
/// manager.set_observer(|event: &ChangeEvent| println!("{event}"));
/// assert!(manager.is_empty());
/// ```
pub struct ItemManager {
    items: RwLock<Vec<ItemRef>>,
    registry: Arc<RendererRegistry>,
    observer: ObserverSlot<ChangeEvent>,
    config: ManagerConfig,
    affinity: ThreadAffinity,
}

impl Default for ItemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemManager {
    /// Creates an empty manager backed by the global registry.
    pub fn new() -> Self {
        Self::with_registry(RendererRegistry::global())
    }

    /// Creates an empty manager backed by `registry`.
    pub fn with_registry(registry: Arc<RendererRegistry>) -> Self {
        Self::with_config(registry, ManagerConfig::default())
    }

    /// Creates an empty manager with explicit configuration.
    pub fn with_config(registry: Arc<RendererRegistry>, config: ManagerConfig) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            registry,
            observer: ObserverSlot::new(),
            config,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Creates a manager holding `items`, registering their renderers.
    pub fn with_items(registry: Arc<RendererRegistry>, items: Vec<ItemRef>) -> Self {
        registry.ensure_all(&items);
        let manager = Self::with_registry(registry);
        *manager.items.write() = items;
        manager
    }

    /// Creates a manager on the global registry from rows pushed by `init`.
    ///
    /// ```
    /// use rowkit::model::ItemManager;
    ///
    /// let manager = ItemManager::build(|_rows| {
    ///     // rows.push_item(...) for each row
    /// });
    /// assert!(manager.is_empty());
    /// ```
    pub fn build(init: impl FnOnce(&mut Vec<ItemRef>)) -> Self {
        let mut items = Vec::new();
        init(&mut items);
        Self::with_items(RendererRegistry::global(), items)
    }

    /// Adopt the calling thread as the owner, e.g. after building the list on
    /// a worker and handing it to the UI thread.
    pub fn rebind_thread(&mut self) {
        self.affinity.rebind();
    }

    /// The registry this manager assigns view types in.
    pub fn registry(&self) -> &Arc<RendererRegistry> {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Observer
    // -------------------------------------------------------------------------

    /// Connect the observer, replacing any previous one.
    pub fn set_observer<O>(&self, observer: O) -> ConnectionId
    where
        O: ChangeObserver + 'static,
    {
        self.observer.connect(move |event| observer.on_change(event))
    }

    /// Connect a shared observer, replacing any previous one.
    pub fn set_shared_observer(&self, observer: Arc<dyn ChangeObserver>) -> ConnectionId {
        self.observer.connect(move |event| observer.on_change(event))
    }

    /// Disconnect the observer if `id` is still the current connection.
    pub fn remove_observer(&self, id: ConnectionId) -> bool {
        self.observer.disconnect(id)
    }

    /// Disconnect any observer.
    pub fn clear_observer(&self) {
        self.observer.clear();
    }

    /// Returns `true` if an observer is connected.
    pub fn has_observer(&self) -> bool {
        self.observer.is_connected()
    }

    /// Suspend or resume change notifications.
    ///
    /// Mutations made while blocked are not reported; callers usually follow
    /// up with [`notify_invalidated`](Self::notify_invalidated).
    pub fn set_notifications_blocked(&self, blocked: bool) {
        self.observer.set_blocked(blocked);
    }

    /// Tell the observer to redraw everything.
    pub fn notify_invalidated(&self) {
        self.notify(ChangeEvent::DataSetInvalidated);
    }

    fn notify(&self, event: ChangeEvent) {
        let delivered = self.observer.emit(&event);
        tracing::trace!(target: "rowkit::manager", %event, delivered, "change event");
    }

    fn dispatch(&self, script: &EditScript) {
        let _span = tracing::trace_span!(
            target: "rowkit::manager",
            "rowkit::dispatch",
            ops = script.len()
        )
        .entered();
        for event in script.events() {
            self.notify(event);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// The row at `index`.
    pub fn get(&self, index: usize) -> Result<ItemRef> {
        let items = self.items.read();
        items
            .get(index)
            .cloned()
            .ok_or_else(|| ListError::index_out_of_range(index, items.len()))
    }

    /// The first row, if any.
    pub fn first(&self) -> Option<ItemRef> {
        self.items.read().first().cloned()
    }

    /// The last row, if any.
    pub fn last(&self) -> Option<ItemRef> {
        self.items.read().last().cloned()
    }

    /// Returns `true` if a row equal to `item` is present.
    pub fn contains(&self, item: &ItemRef) -> bool {
        self.index_of(item).is_some()
    }

    /// Returns `true` if every one of `items` is present.
    pub fn contains_all(&self, items: &[ItemRef]) -> bool {
        let current = self.items.read();
        items
            .iter()
            .all(|wanted| current.iter().any(|row| item_eq(row, wanted)))
    }

    /// Position of the first row equal to `item`.
    pub fn index_of(&self, item: &ItemRef) -> Option<usize> {
        self.items.read().iter().position(|row| item_eq(row, item))
    }

    /// Position of the last row equal to `item`.
    pub fn last_index_of(&self, item: &ItemRef) -> Option<usize> {
        self.items.read().iter().rposition(|row| item_eq(row, item))
    }

    /// The rows in `range`, copied out of the list.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<ItemRef>> {
        let items = self.items.read();
        if range.start > range.end || range.end > items.len() {
            return Err(ListError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: items.len(),
            });
        }
        Ok(items[range].to_vec())
    }

    /// A copy of all rows.
    pub fn snapshot(&self) -> Vec<ItemRef> {
        self.items.read().clone()
    }

    /// Iterate over a snapshot of the rows.
    pub fn iter(&self) -> std::vec::IntoIter<ItemRef> {
        self.snapshot().into_iter()
    }

    // -------------------------------------------------------------------------
    // Positional mutations
    // -------------------------------------------------------------------------

    /// Append `item`.
    pub fn push(&self, item: ItemRef) {
        self.affinity.debug_assert_same_thread();
        let renderer = item.renderer();
        let index = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        self.registry.ensure(&renderer);
        self.notify(ChangeEvent::ItemInserted(index));
    }

    /// Insert `item` at `index`, shifting later rows.
    pub fn insert(&self, index: usize, item: ItemRef) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        let renderer = item.renderer();
        {
            let mut items = self.items.write();
            if index > items.len() {
                return Err(ListError::index_out_of_range(index, items.len()));
            }
            items.insert(index, item);
        }
        self.registry.ensure(&renderer);
        self.notify(ChangeEvent::ItemInserted(index));
        Ok(())
    }

    /// Append all `items`. Returns `true` if any were added.
    pub fn append_all(&self, items: Vec<ItemRef>) -> bool {
        self.affinity.debug_assert_same_thread();
        if items.is_empty() {
            return false;
        }
        let count = items.len();
        self.registry.ensure_all(&items);
        let start = {
            let mut current = self.items.write();
            let start = current.len();
            current.extend(items);
            start
        };
        self.notify(ChangeEvent::RangeInserted { start, count });
        true
    }

    /// Insert all `items` at `index`. Returns `true` if any were added.
    pub fn insert_all(&self, index: usize, items: Vec<ItemRef>) -> Result<bool> {
        self.affinity.debug_assert_same_thread();
        {
            let len = self.len();
            if index > len {
                return Err(ListError::index_out_of_range(index, len));
            }
        }
        if items.is_empty() {
            return Ok(false);
        }
        let count = items.len();
        self.registry.ensure_all(&items);
        self.items.write().splice(index..index, items);
        self.notify(ChangeEvent::RangeInserted {
            start: index,
            count,
        });
        Ok(true)
    }

    /// Remove and return the row at `index`.
    pub fn remove(&self, index: usize) -> Result<ItemRef> {
        self.affinity.debug_assert_same_thread();
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                return Err(ListError::index_out_of_range(index, items.len()));
            }
            items.remove(index)
        };
        self.notify(ChangeEvent::ItemRemoved(index));
        Ok(removed)
    }

    /// Replace the row at `index`, returning the previous row.
    pub fn set(&self, index: usize, item: ItemRef) -> Result<ItemRef> {
        self.affinity.debug_assert_same_thread();
        let renderer = item.renderer();
        let previous = {
            let mut items = self.items.write();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or_else(|| ListError::index_out_of_range(index, len))?;
            std::mem::replace(slot, item)
        };
        self.registry.ensure(&renderer);
        self.notify(ChangeEvent::ItemChanged(index));
        Ok(previous)
    }

    /// Remove every row.
    pub fn clear(&self) {
        self.affinity.debug_assert_same_thread();
        let count = {
            let mut items = self.items.write();
            let count = items.len();
            items.clear();
            count
        };
        if count > 0 {
            self.notify(ChangeEvent::RangeRemoved { start: 0, count });
        }
    }

    // -------------------------------------------------------------------------
    // Value and predicate mutations
    // -------------------------------------------------------------------------

    /// Remove the first row equal to `item`. Returns `true` if one was found.
    pub fn remove_item(&self, item: &ItemRef) -> bool {
        self.affinity.debug_assert_same_thread();
        let target = self.snapshot().into_iter().find(|row| item_eq(row, item));
        let Some(target) = target else {
            return false;
        };
        let removed_at = {
            let mut items = self.items.write();
            let position = items.iter().position(|row| Arc::ptr_eq(row, &target));
            if let Some(index) = position {
                items.remove(index);
            }
            position
        };
        match (removed_at, self.config.removal_refresh) {
            (None, _) => false,
            (Some(_), RemovalRefresh::Invalidate) => {
                self.notify(ChangeEvent::DataSetInvalidated);
                true
            }
            (Some(index), RemovalRefresh::Diff) => {
                self.notify(ChangeEvent::ItemRemoved(index));
                true
            }
        }
    }

    /// Remove every row equal to one of `items`.
    pub fn remove_all(&self, items: &[ItemRef]) -> bool {
        self.remove_all_matching(|row| items.iter().any(|item| item_eq(row, item)))
    }

    /// Keep only rows equal to one of `items`.
    pub fn retain_all(&self, items: &[ItemRef]) -> bool {
        self.retain_matching(|row| items.iter().any(|item| item_eq(row, item)))
    }

    /// Remove every row for which `predicate` holds.
    pub fn remove_all_matching(&self, mut predicate: impl FnMut(&ItemRef) -> bool) -> bool {
        self.remove_where(|row| predicate(row))
    }

    /// Keep only rows for which `predicate` holds.
    pub fn retain_matching(&self, mut predicate: impl FnMut(&ItemRef) -> bool) -> bool {
        self.remove_where(|row| !predicate(row))
    }

    /// Removes the rows `remove` selects.
    ///
    /// `remove` is evaluated on a snapshot with no lock held, so it may read
    /// the manager. Selected rows are then dropped by allocation.
    fn remove_where(&self, mut remove: impl FnMut(&ItemRef) -> bool) -> bool {
        self.affinity.debug_assert_same_thread();
        let before = self.snapshot();
        let doomed: HashSet<*const ()> = before
            .iter()
            .filter(|row| remove(row))
            .map(|row| Arc::as_ptr(row).cast::<()>())
            .collect();
        if doomed.is_empty() {
            return false;
        }
        let changed = {
            let mut items = self.items.write();
            let len = items.len();
            items.retain(|row| !doomed.contains(&Arc::as_ptr(row).cast::<()>()));
            items.len() != len
        };
        if !changed {
            return false;
        }
        match self.config.removal_refresh {
            RemovalRefresh::Diff => {
                let after = self.snapshot();
                // Only removals happened, so allocation identity is exact.
                let script =
                    diff_by(&before, &after, false, |a, b| Arc::ptr_eq(a, b), |_, _| true);
                self.dispatch(&script);
            }
            RemovalRefresh::Invalidate => self.notify(ChangeEvent::DataSetInvalidated),
        }
        true
    }

    // -------------------------------------------------------------------------
    // Diffed refresh
    // -------------------------------------------------------------------------

    /// Replace all rows with `items`, dispatching the minimal edit script
    /// between the current rows and the new ones.
    pub fn refresh_all(&self, items: Vec<ItemRef>) -> EditScript {
        self.affinity.debug_assert_same_thread();
        let script = diff(&self.snapshot(), &items, self.config.detect_moves);
        self.registry.ensure_all(&items);
        *self.items.write() = items;
        self.dispatch(&script);
        script
    }

    /// Replace all rows with the ones pushed by `init` into an empty list.
    pub fn refresh_with(&self, init: impl FnOnce(&mut Vec<ItemRef>)) -> EditScript {
        let mut items = Vec::new();
        init(&mut items);
        self.refresh_all(items)
    }

    /// Edit a copy of the current rows with `edit`, then refresh to the
    /// result.
    ///
    /// Lets callers write ordinary `Vec` editing code and still get
    /// granular change events.
    pub fn auto_refresh(&self, edit: impl FnOnce(&mut Vec<ItemRef>)) -> EditScript {
        let mut items = self.snapshot();
        edit(&mut items);
        self.refresh_all(items)
    }
}

impl std::fmt::Debug for ItemManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemManager")
            .field("items", &*self.items.read())
            .field("config", &self.config)
            .field("observer", &self.observer)
            .finish()
    }
}

static_assertions::assert_impl_all!(ItemManager: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Item, Renderer, RendererRef, Visual};
    use parking_lot::Mutex;
    use std::any::Any;
    use std::sync::LazyLock;

    struct TextRenderer;

    impl Renderer for TextRenderer {
        fn create_visual(&self, _parent: &dyn Any) -> Result<Visual> {
            Ok(Visual::new(String::new()))
        }

        fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
            let text = item.downcast_or_err::<Text>(self.name())?;
            *visual.downcast_mut::<String>(self.name())? = text.0.to_string();
            Ok(())
        }
    }

    static TEXT: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(TextRenderer));
    static OTHER: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(TextRenderer));

    #[derive(Debug)]
    struct Text(&'static str);

    impl Item for Text {
        fn renderer(&self) -> RendererRef {
            TEXT.clone()
        }

        fn same_identity(&self, other: &dyn Item) -> bool {
            other.downcast_ref::<Text>().is_some_and(|o| o.0 == self.0)
        }

        fn same_content(&self, other: &dyn Item) -> bool {
            self.same_identity(other)
        }

        fn equals(&self, other: &dyn Item) -> bool {
            self.same_identity(other)
        }
    }

    #[derive(Debug)]
    struct Badge;

    impl Item for Badge {
        fn renderer(&self) -> RendererRef {
            OTHER.clone()
        }
    }

    fn text(s: &'static str) -> ItemRef {
        Arc::new(Text(s))
    }

    fn label(item: &ItemRef) -> &'static str {
        item.downcast_ref::<Text>().map_or("?", |t| t.0)
    }

    fn labels(manager: &ItemManager) -> Vec<&'static str> {
        manager.iter().map(|item| label(&item)).collect()
    }

    fn observed(manager: &ItemManager) -> Arc<Mutex<Vec<ChangeEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        manager.set_observer(move |event: &ChangeEvent| sink.lock().push(*event));
        events
    }

    fn abc(config: ManagerConfig) -> ItemManager {
        let manager = ItemManager::with_config(RendererRegistry::shared(), config);
        manager.append_all(vec![text("a"), text("b"), text("c")]);
        manager
    }

    #[test]
    fn test_push_registers_and_notifies() {
        let manager = ItemManager::with_registry(RendererRegistry::shared());
        let events = observed(&manager);

        manager.push(text("x"));
        manager.push(text("y"));

        assert_eq!(labels(&manager), ["x", "y"]);
        assert_eq!(
            *events.lock(),
            vec![ChangeEvent::ItemInserted(0), ChangeEvent::ItemInserted(1)]
        );
        assert_eq!(manager.registry().view_type_of(&TEXT).unwrap().get(), 0);
    }

    #[test]
    fn test_distinct_renderers_get_distinct_view_types() {
        let manager = ItemManager::with_registry(RendererRegistry::shared());
        manager.push(text("x"));
        manager.push(Arc::new(Badge));

        let registry = manager.registry();
        assert_eq!(registry.view_type_of(&TEXT).unwrap().get(), 0);
        assert_eq!(registry.view_type_of(&OTHER).unwrap().get(), 1);
    }

    #[test]
    fn test_insert_and_bounds() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        manager.insert(3, text("d")).unwrap();
        assert_eq!(
            manager.insert(9, text("z")).unwrap_err(),
            ListError::index_out_of_range(9, 4)
        );

        assert_eq!(labels(&manager), ["a", "b", "c", "d"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::ItemInserted(3)]);
    }

    #[test]
    fn test_append_all_reports_range() {
        let manager = ItemManager::with_registry(RendererRegistry::shared());
        manager.push(text("a"));
        let events = observed(&manager);

        assert!(manager.append_all(vec![text("b"), text("c")]));
        assert!(!manager.append_all(Vec::new()));

        assert_eq!(
            *events.lock(),
            vec![ChangeEvent::RangeInserted { start: 1, count: 2 }]
        );
    }

    #[test]
    fn test_insert_all_at_index() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        assert!(manager.insert_all(1, vec![text("x"), text("y")]).unwrap());
        assert!(!manager.insert_all(0, Vec::new()).unwrap());
        assert!(manager.insert_all(6, vec![text("z")]).is_err());

        assert_eq!(labels(&manager), ["a", "x", "y", "b", "c"]);
        assert_eq!(
            *events.lock(),
            vec![ChangeEvent::RangeInserted { start: 1, count: 2 }]
        );
    }

    #[test]
    fn test_remove_at_index() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        let removed = manager.remove(1).unwrap();
        assert_eq!(removed.downcast_ref::<Text>().unwrap().0, "b");
        assert_eq!(labels(&manager), ["a", "c"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::ItemRemoved(1)]);

        assert!(manager.remove(2).is_err());
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_remove_by_value_invalidates() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        assert!(manager.remove_item(&text("b")));
        assert!(!manager.remove_item(&text("q")));

        assert_eq!(labels(&manager), ["a", "c"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::DataSetInvalidated]);
    }

    #[test]
    fn test_remove_by_value_with_diff_refresh() {
        let manager = abc(ManagerConfig::new().with_removal_refresh(RemovalRefresh::Diff));
        let events = observed(&manager);

        assert!(manager.remove_item(&text("b")));
        assert_eq!(*events.lock(), vec![ChangeEvent::ItemRemoved(1)]);
    }

    #[test]
    fn test_predicate_removals() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        assert!(manager.remove_all(&[text("a"), text("c")]));
        assert!(!manager.retain_all(&[text("b")]));
        assert!(!manager.remove_all_matching(|_| false));

        assert_eq!(labels(&manager), ["b"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::DataSetInvalidated]);
    }

    #[test]
    fn test_predicate_removals_with_diff_refresh() {
        let manager = abc(ManagerConfig::new().with_removal_refresh(RemovalRefresh::Diff));
        manager.push(text("d"));
        let events = observed(&manager);

        let kept = manager.retain_matching(|row| !matches!(label(row), "b" | "c"));
        assert!(kept);

        assert_eq!(labels(&manager), ["a", "d"]);
        assert_eq!(
            *events.lock(),
            vec![ChangeEvent::RangeRemoved { start: 1, count: 2 }]
        );
    }

    #[test]
    fn test_set_and_clear() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        let previous = manager.set(0, Arc::new(Badge)).unwrap();
        assert!(previous.is::<Text>());
        assert!(manager.set(3, text("z")).is_err());
        assert!(manager.registry().contains(&OTHER));

        manager.clear();
        manager.clear();

        assert!(manager.is_empty());
        assert_eq!(
            *events.lock(),
            vec![
                ChangeEvent::ItemChanged(0),
                ChangeEvent::RangeRemoved { start: 0, count: 3 },
            ]
        );
    }

    #[test]
    fn test_queries() {
        let manager = abc(ManagerConfig::default());
        manager.push(text("a"));

        assert!(manager.contains(&text("b")));
        assert!(manager.contains_all(&[text("a"), text("c")]));
        assert!(!manager.contains_all(&[text("a"), text("q")]));
        assert_eq!(manager.index_of(&text("a")), Some(0));
        assert_eq!(manager.last_index_of(&text("a")), Some(3));
        assert_eq!(manager.get(1).unwrap().downcast_ref::<Text>().unwrap().0, "b");
        assert!(manager.get(4).is_err());
        assert_eq!(manager.slice(1..3).unwrap().len(), 2);
        assert!(matches!(
            manager.slice(2..9),
            Err(ListError::RangeOutOfBounds { .. })
        ));
        assert!(manager.first().is_some());
        assert_eq!(manager.last().unwrap().downcast_ref::<Text>().unwrap().0, "a");
    }

    #[test]
    fn test_refresh_all_dispatches_script() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        let script = manager.refresh_all(vec![text("a"), text("c"), text("d")]);

        assert_eq!(labels(&manager), ["a", "c", "d"]);
        assert_eq!(script.removals(), 1);
        assert_eq!(script.insertions(), 1);
        assert_eq!(
            *events.lock(),
            vec![ChangeEvent::ItemRemoved(1), ChangeEvent::ItemInserted(2)]
        );
    }

    #[test]
    fn test_auto_refresh_edits_snapshot() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        manager.auto_refresh(|rows| {
            let last = rows.remove(0);
            rows.push(last);
        });

        assert_eq!(labels(&manager), ["b", "c", "a"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::ItemMoved { from: 0, to: 2 }]);
    }

    #[test]
    fn test_refresh_with_registers_new_renderers() {
        let manager = ItemManager::with_registry(RendererRegistry::shared());
        manager.refresh_with(|rows| {
            rows.push(Arc::new(Badge));
            rows.push(text("a"));
        });
        assert_eq!(manager.registry().len(), 2);
        assert_eq!(manager.registry().view_type_of(&OTHER).unwrap().get(), 0);
    }

    #[test]
    fn test_observer_can_read_manager() {
        let manager = Arc::new(ItemManager::with_registry(RendererRegistry::shared()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&manager);
        let sink = seen.clone();
        manager.set_observer(move |_: &ChangeEvent| {
            if let Some(manager) = weak.upgrade() {
                sink.lock().push(manager.len());
            }
        });

        manager.push(text("a"));
        manager.push(text("b"));
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_shared_observer_receives_events() {
        let manager = ItemManager::with_registry(RendererRegistry::shared());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let observer: Arc<dyn ChangeObserver> =
            Arc::new(move |event: &ChangeEvent| sink.lock().push(*event));

        manager.set_shared_observer(observer);
        manager.push(text("a"));

        assert_eq!(*events.lock(), vec![ChangeEvent::ItemInserted(0)]);
    }

    #[test]
    fn test_predicates_may_read_manager() {
        for policy in [RemovalRefresh::Invalidate, RemovalRefresh::Diff] {
            let manager = Arc::new(abc(ManagerConfig::new().with_removal_refresh(policy)));
            let reader = manager.clone();

            assert!(manager.remove_all_matching(|row| reader.len() == 3 && label(row) == "b"));
            assert!(manager.retain_matching(|row| reader.contains(row) && label(row) != "c"));
            assert_eq!(labels(&manager), ["a"]);
        }
    }

    /// Equal to anything while its manager has rows.
    #[derive(Debug)]
    struct AnyWhileNonEmpty(std::sync::Weak<ItemManager>);

    impl Item for AnyWhileNonEmpty {
        fn renderer(&self) -> RendererRef {
            TEXT.clone()
        }

        fn equals(&self, _other: &dyn Item) -> bool {
            self.0.upgrade().is_some_and(|manager| !manager.is_empty())
        }
    }

    #[test]
    fn test_equality_may_read_manager() {
        let manager = Arc::new(ItemManager::with_registry(RendererRegistry::shared()));
        manager.push(Arc::new(AnyWhileNonEmpty(Arc::downgrade(&manager))));
        manager.push(text("a"));

        assert!(manager.remove_item(&text("z")));
        assert_eq!(labels(&manager), ["a"]);
    }

    #[test]
    fn test_rebind_thread_after_building_on_worker() {
        let mut manager = std::thread::spawn(|| abc(ManagerConfig::default()))
            .join()
            .unwrap();
        manager.rebind_thread();
        let events = observed(&manager);

        manager.push(text("d"));

        assert_eq!(labels(&manager), ["a", "b", "c", "d"]);
        assert_eq!(*events.lock(), vec![ChangeEvent::ItemInserted(3)]);
    }

    #[test]
    fn test_blocked_notifications() {
        let manager = abc(ManagerConfig::default());
        let events = observed(&manager);

        manager.set_notifications_blocked(true);
        manager.push(text("d"));
        manager.set_notifications_blocked(false);
        manager.notify_invalidated();

        assert_eq!(*events.lock(), vec![ChangeEvent::DataSetInvalidated]);
    }

    #[test]
    fn test_no_observer_is_silent() {
        let manager = abc(ManagerConfig::default());
        assert!(!manager.has_observer());
        manager.remove(0).unwrap();
        assert_eq!(manager.len(), 2);
    }
}
