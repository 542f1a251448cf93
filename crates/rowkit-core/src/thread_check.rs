//! Thread affinity checks.
//!
//! Item lists are owned by the thread that drives the host list widget. All
//! mutations, registry updates and change notifications are expected to run
//! there. [`ThreadAffinity`] records the owning thread so that containers can
//! verify the assumption cheaply in debug builds:
//!
//! ```
//! use rowkit_core::thread_check::ThreadAffinity;
//!
//! struct Rows {
//!     affinity: ThreadAffinity,
//!     len: std::cell::Cell<usize>,
//! }
//!
//! impl Rows {
//!     fn push(&self) {
//!         // Panics in debug builds if called from another thread.
//!         self.affinity.debug_assert_same_thread();
//!         self.len.set(self.len.get() + 1);
//!     }
//! }
//!
//! let rows = Rows { affinity: ThreadAffinity::current(), len: Default::default() };
//! rows.push();
//! ```

use std::thread::ThreadId;

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns `true` if called from the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Rebind to the current thread.
    ///
    /// Used when ownership of a list is handed over to another thread before
    /// any host widget observes it.
    pub fn rebind(&mut self) {
        self.thread_id = std::thread::current().id();
    }

    /// Panics if called from another thread. Active in all builds.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("item list accessed from wrong thread")
    }

    /// Panics with `msg` if called from another thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    /// Debug-only variant of
    /// [`assert_same_thread_with_msg`](Self::assert_same_thread_with_msg).
    #[inline]
    pub fn debug_assert_same_thread_with_msg(&self, msg: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread_with_msg(msg);
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "{msg}: owned by thread {:?}, accessed from \"{current_name}\" ({current_id:?}). \
             Mutate item lists only from the thread that drives the list widget.",
            self.thread_id
        )
    }
}
