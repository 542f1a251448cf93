//! Single-slot observer cell.
//!
//! An [`ObserverSlot<Args>`] holds at most one connected callback. Connecting
//! a new callback replaces the previous one, and emitting with nothing
//! connected is a silent no-op. This is the one-listener counterpart of a
//! multi-slot signal: list widgets have exactly one host view consuming their
//! change notifications.
//!
//! # Example
//!
//! ```
//! use rowkit_core::ObserverSlot;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let slot = ObserverSlot::<usize>::new();
//! let total = Arc::new(AtomicUsize::new(0));
//!
//! let sink = total.clone();
//! let id = slot.connect(move |n| {
//!     sink.fetch_add(*n, Ordering::SeqCst);
//! });
//!
//! slot.emit(&3);
//! assert_eq!(total.load(Ordering::SeqCst), 3);
//!
//! assert!(slot.disconnect(id));
//! slot.emit(&5);
//! assert_eq!(total.load(Ordering::SeqCst), 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

/// Identifies one connection made through [`ObserverSlot::connect`].
///
/// Disconnecting with a stale id (the slot has since been reconnected) does
/// nothing, so an old owner cannot detach its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// The raw connection number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

type Callback<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A cell holding zero or one observer callback.
pub struct ObserverSlot<Args> {
    current: RwLock<Option<(ConnectionId, Callback<Args>)>>,
    blocked: AtomicBool,
    next_id: AtomicU64,
}

impl<Args> Default for ObserverSlot<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for ObserverSlot<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("connected", &self.connection())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> ObserverSlot<Args> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            blocked: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Connect a callback, replacing whatever was connected before.
    pub fn connect<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let previous = self.current.write().replace((id, Arc::new(callback)));
        tracing::debug!(
            target: "rowkit_core::observer",
            connection = id.0,
            replaced = previous.is_some(),
            "observer connected"
        );
        id
    }

    /// Disconnect the callback if `id` is still the current connection.
    ///
    /// Returns `true` if a callback was removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut current = self.current.write();
        match current.as_ref() {
            Some((current_id, _)) if *current_id == id => {
                *current = None;
                tracing::debug!(
                    target: "rowkit_core::observer",
                    connection = id.0,
                    "observer disconnected"
                );
                true
            }
            _ => false,
        }
    }

    /// Remove any connected callback.
    pub fn clear(&self) {
        let cleared = self.current.write().take();
        if let Some((id, _)) = cleared {
            tracing::debug!(
                target: "rowkit_core::observer",
                connection = id.0,
                "observer cleared"
            );
        }
    }

    /// Returns the id of the current connection, if any.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.current.read().as_ref().map(|(id, _)| *id)
    }

    /// Returns `true` if a callback is connected.
    pub fn is_connected(&self) -> bool {
        self.current.read().is_some()
    }

    /// Suspend or resume emission.
    ///
    /// While blocked, [`emit`](Self::emit) drops its arguments.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Returns `true` if emission is suspended.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke the connected callback with `args`.
    ///
    /// The slot's lock is released before the callback runs, so the callback
    /// may reconnect or disconnect the slot. Returns `true` if a callback ran.
    pub fn emit(&self, args: &Args) -> bool {
        if self.is_blocked() {
            tracing::trace!(target: "rowkit_core::observer", "observer blocked, skipping emit");
            return false;
        }
        let callback = self.current.read().as_ref().map(|(_, cb)| cb.clone());
        match callback {
            Some(callback) => {
                callback(args);
                true
            }
            None => false,
        }
    }
}

static_assertions::assert_impl_all!(ObserverSlot<u32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_without_observer_is_noop() {
        let slot = ObserverSlot::<i32>::new();
        assert!(!slot.is_connected());
        assert!(!slot.emit(&1));
    }

    #[test]
    fn test_connect_replaces_previous() {
        let slot = ObserverSlot::<i32>::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let sink = first.clone();
        let first_id = slot.connect(move |v| sink.lock().push(*v));
        slot.emit(&1);

        let sink = second.clone();
        let second_id = slot.connect(move |v| sink.lock().push(*v));
        slot.emit(&2);

        assert_ne!(first_id, second_id);
        assert_eq!(*first.lock(), vec![1]);
        assert_eq!(*second.lock(), vec![2]);
    }

    #[test]
    fn test_stale_disconnect_keeps_current() {
        let slot = ObserverSlot::<i32>::new();
        let old = slot.connect(|_| {});
        let current = slot.connect(|_| {});

        assert!(!slot.disconnect(old));
        assert_eq!(slot.connection(), Some(current));
        assert!(slot.disconnect(current));
        assert!(!slot.is_connected());
    }

    #[test]
    fn test_blocked_slot_drops_emission() {
        let slot = ObserverSlot::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        slot.connect(move |v| sink.lock().push(*v));

        slot.set_blocked(true);
        assert!(!slot.emit(&1));
        slot.set_blocked(false);
        assert!(slot.emit(&2));

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_callback_may_disconnect_itself() {
        let slot = Arc::new(ObserverSlot::<i32>::new());
        let inner = slot.clone();
        slot.connect(move |_| inner.clear());

        assert!(slot.emit(&1));
        assert!(!slot.is_connected());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle_logs_share_observer_target() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let slot = ObserverSlot::<i32>::new();
            let id = slot.connect(|_| {});
            slot.disconnect(id);
            slot.connect(|_| {});
            slot.clear();
        });

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4, "{output}");
        for line in lines {
            assert!(line.contains("rowkit_core::observer"), "{line}");
        }
    }
}
