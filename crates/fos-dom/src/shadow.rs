//! Shadow DOM
//!
//! Shadow root modes and the per-host update signal that tells readers when
//! a component has finished rendering its encapsulated subtree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smol::channel::{self, Sender};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Pending-render signal owned by a shadow host.
///
/// A host calls [`begin`](Self::begin) when it schedules a render and
/// [`complete`](Self::complete) once the shadow subtree is up to date.
/// Readers await [`settled`](Self::settled) before looking inside.
#[derive(Debug, Clone, Default)]
pub struct UpdateHandle {
    inner: Rc<UpdateState>,
}

#[derive(Debug, Default)]
struct UpdateState {
    pending: Cell<u32>,
    waiters: RefCell<Vec<Sender<()>>>,
}

impl UpdateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one unit of render work as pending
    pub fn begin(&self) {
        self.inner.pending.set(self.inner.pending.get() + 1);
    }

    /// Finish one unit of render work; wakes waiters once nothing is pending
    pub fn complete(&self) {
        let pending = self.inner.pending.get().saturating_sub(1);
        self.inner.pending.set(pending);
        if pending == 0 {
            let waiters = std::mem::take(&mut *self.inner.waiters.borrow_mut());
            for waiter in waiters {
                // One send per fresh channel; fails only if the waiter is gone
                let _ = waiter.try_send(());
            }
        }
    }

    /// Check if render work is outstanding
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get() > 0
    }

    /// Wait until no render work is pending
    pub async fn settled(&self) {
        if !self.is_pending() {
            return;
        }
        let (tx, rx) = channel::bounded(1);
        self.inner.waiters.borrow_mut().push(tx);
        // Woken by the send or by the sender being dropped; both mean settled
        let _ = rx.recv().await;
    }
}
