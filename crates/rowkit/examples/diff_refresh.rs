//! rowkit diff refresh example
//!
//! A headless host list draws text rows followed by an "add more" button.
//! Each simulated click rebuilds the rows with `auto_refresh`, taking the
//! button out, appending ten text rows and putting the button back last. The
//! differ reports a single range insertion in front of the button, so the
//! host creates and binds only the new rows. Relabeling the button keeps its
//! identity and is reported as a content change.
//!
//! Run with: RUST_LOG=rowkit=debug cargo run -p rowkit --example diff_refresh

use std::any::Any;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rowkit::model::{
    ChangeEvent, Item, ItemAdapter, ItemListExt, ItemRef, Renderer, RendererRef, ViewType, Visual,
};
use rowkit::{ListError, Result};
use tracing_subscriber::EnvFilter;

/// The host's container; renderers refuse to build into anything else.
struct Console {
    width: usize,
}

// -----------------------------------------------------------------------------
// Rows
// -----------------------------------------------------------------------------

struct TextRenderer;

impl Renderer for TextRenderer {
    fn create_visual(&self, parent: &dyn Any) -> Result<Visual> {
        let console = parent
            .downcast_ref::<Console>()
            .ok_or_else(|| ListError::parent_mismatch::<Console>(self.name()))?;
        Ok(Visual::new(String::with_capacity(console.width)))
    }

    fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
        let text = item.downcast_or_err::<Text>(self.name())?;
        *visual.downcast_mut::<String>(self.name())? = format!("  {}", text.0);
        Ok(())
    }

    fn name(&self) -> &str {
        "text"
    }
}

struct ButtonRenderer;

impl Renderer for ButtonRenderer {
    fn create_visual(&self, parent: &dyn Any) -> Result<Visual> {
        let console = parent
            .downcast_ref::<Console>()
            .ok_or_else(|| ListError::parent_mismatch::<Console>(self.name()))?;
        Ok(Visual::new(String::with_capacity(console.width)))
    }

    fn bind_visual(&self, visual: &mut Visual, item: &dyn Item) -> Result<()> {
        let button = item.downcast_or_err::<Button>(self.name())?;
        *visual.downcast_mut::<String>(self.name())? = format!("[ {} ]", button.0);
        Ok(())
    }

    fn name(&self) -> &str {
        "button"
    }
}

static TEXT: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(TextRenderer));
static BUTTON: LazyLock<RendererRef> = LazyLock::new(|| RendererRef::new(ButtonRenderer));

#[derive(Debug)]
struct Text(String);

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
}

#[derive(Debug)]
struct Button(&'static str);

impl Item for Button {
    fn renderer(&self) -> RendererRef {
        BUTTON.clone()
    }

    fn same_identity(&self, other: &dyn Item) -> bool {
        other.is::<Button>()
    }

    fn same_content(&self, other: &dyn Item) -> bool {
        other.downcast_ref::<Button>().is_some_and(|o| o.0 == self.0)
    }
}

fn add_text_rows(rows: &mut Vec<ItemRef>, from: usize, count: usize) {
    rows.extend_items((from..from + count).map(|n| Text(format!("Item {n}"))));
}

// -----------------------------------------------------------------------------
// Headless host
// -----------------------------------------------------------------------------

struct Slot {
    view_type: Option<ViewType>,
    visual: Option<Visual>,
    dirty: bool,
}

impl Slot {
    fn unbound() -> Self {
        Self {
            view_type: None,
            visual: None,
            dirty: true,
        }
    }
}

/// Mirrors the list the way a recycling widget does: structural events move
/// slots around immediately, binding waits for the next layout pass when
/// positions match the list again.
struct ConsoleList {
    console: Console,
    adapter: ItemAdapter,
    pending: Arc<Mutex<Vec<ChangeEvent>>>,
    slots: Vec<Slot>,
    created: usize,
    bound: usize,
}

impl ConsoleList {
    fn new(adapter: ItemAdapter) -> Self {
        let pending = Arc::new(Mutex::new(Vec::new()));
        let sink = pending.clone();
        adapter
            .manager()
            .set_observer(move |event: &ChangeEvent| sink.lock().push(*event));

        Self {
            console: Console { width: 32 },
            slots: (0..adapter.item_count()).map(|_| Slot::unbound()).collect(),
            adapter,
            pending,
            created: 0,
            bound: 0,
        }
    }

    fn apply(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::ItemInserted(index) => self.slots.insert(index, Slot::unbound()),
            ChangeEvent::RangeInserted { start, count } => {
                self.slots
                    .splice(start..start, (0..count).map(|_| Slot::unbound()));
            }
            ChangeEvent::ItemRemoved(index) => {
                self.slots.remove(index);
            }
            ChangeEvent::RangeRemoved { start, count } => {
                self.slots.drain(start..start + count);
            }
            ChangeEvent::ItemChanged(index) => self.slots[index].dirty = true,
            ChangeEvent::RangeChanged { start, count } => {
                for slot in &mut self.slots[start..start + count] {
                    slot.dirty = true;
                }
            }
            ChangeEvent::ItemMoved { from, to } => {
                let slot = self.slots.remove(from);
                self.slots.insert(to, slot);
            }
            ChangeEvent::DataSetInvalidated => {
                self.slots = (0..self.adapter.item_count())
                    .map(|_| Slot::unbound())
                    .collect();
            }
        }
    }

    fn layout(&mut self) -> Result<()> {
        let events = std::mem::take(&mut *self.pending.lock());
        for event in events {
            println!("  event: {event}");
            self.apply(event);
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let view_type = self.adapter.view_type(index)?;
            if slot.view_type != Some(view_type) {
                slot.visual = Some(self.adapter.create_visual(view_type, &self.console)?);
                slot.view_type = Some(view_type);
                slot.dirty = true;
                self.created += 1;
            }
            if slot.dirty {
                if let Some(visual) = slot.visual.as_mut() {
                    self.adapter.bind_visual(visual, index)?;
                    self.bound += 1;
                }
                slot.dirty = false;
            }
        }
        Ok(())
    }

    fn print(&self) -> Result<()> {
        for slot in &self.slots {
            if let Some(visual) = &slot.visual {
                println!("{}", visual.downcast_ref::<String>("console")?);
            }
        }
        println!(
            "  ({} rows, {} visuals created, {} binds so far)\n",
            self.slots.len(),
            self.created,
            self.bound
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rowkit=info")),
        )
        .init();

    let adapter = ItemAdapter::build(|rows| {
        add_text_rows(rows, 0, 3);
        rows.push_item(Button("Add 10 more"));
    });
    let mut list = ConsoleList::new(adapter.clone());

    println!("initial list:");
    list.layout()?;
    list.print()?;

    for click in 1..=2 {
        println!("click {click}:");
        let script = adapter.manager().auto_refresh(|rows| {
            let from = rows.len() - 1;
            let button = rows.remove(from);
            add_text_rows(rows, from, 10);
            rows.push(button);
        });
        tracing::info!(
            insertions = script.insertions(),
            moves = script.moves(),
            removals = script.removals(),
            "refreshed"
        );
        list.layout()?;
        list.print()?;
    }

    println!("relabel the button:");
    adapter.manager().auto_refresh(|rows| {
        if let Some(last) = rows.last_mut() {
            *last = Arc::new(Button("No more"));
        }
    });
    list.layout()?;
    list.print()?;

    Ok(())
}
