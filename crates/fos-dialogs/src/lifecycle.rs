//! Dialog lifecycle
//!
//! `Open -> Closing -> Closed`. A close request is accepted only from the
//! cancel button, the apply button or a click on the background itself.
//! Closing runs the exit animations of the container and the background
//! together, fires `dialogClosed` on the dialog and removes it from the
//! document.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, Event, EventType, NodeId};
use smol::channel;
use smol::future::{self, BoxedLocal, FutureExt};

use crate::animation::{ExitAnimation, ExitResult};
use crate::DIALOG_CLOSED;

/// Origin of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CancelButton,
    ApplyButton,
    BackgroundClick,
    InvalidSource,
}

impl CloseTrigger {
    pub fn is_valid(self) -> bool {
        self != Self::InvalidSource
    }
}

/// Dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Open,
    Closing,
    Closed,
}

/// Result of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Both exit animations finished and the dialog was removed
    Closed { container: ExitResult, backdrop: ExitResult },
    /// The event did not come from a close control
    NotValidEventForClose,
    /// Another close is running or has finished
    AlreadyClosing,
    /// Input validation rejected the apply
    ValidationFailed,
}

impl CloseOutcome {
    /// `[container, backdrop]` results of a completed close
    pub fn exit_results(&self) -> Option<[ExitResult; 2]> {
        match *self {
            Self::Closed { container, backdrop } => Some([container, backdrop]),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

impl fmt::Display for CloseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { container, backdrop } => write!(f, "[{}, {}]", container, backdrop),
            Self::NotValidEventForClose => f.write_str("not valid event for close"),
            Self::AlreadyClosing => f.write_str("already closing"),
            Self::ValidationFailed => f.write_str("validation failed"),
        }
    }
}

/// Resolved by [`DialogLifecycle::await_closed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedSignal;

impl fmt::Display for ClosedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("isClosed")
    }
}

/// Collaborators a lifecycle coordinates
#[derive(Clone)]
pub struct DialogParts {
    /// Background host; a click on it (not inside its light content) closes
    pub background: NodeId,
    pub cancel_button: NodeId,
    pub apply_button: NodeId,
    pub backdrop: Rc<dyn ExitAnimation>,
    pub container: Rc<dyn ExitAnimation>,
}

impl fmt::Debug for DialogParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogParts")
            .field("background", &self.background)
            .field("cancel_button", &self.cancel_button)
            .field("apply_button", &self.apply_button)
            .finish_non_exhaustive()
    }
}

type DisconnectHook = Box<dyn FnOnce(&Document)>;

struct LifecycleInner {
    doc: Document,
    host: NodeId,
    parts: DialogParts,
    state: Cell<DialogState>,
    save_callback: RefCell<Option<Rc<dyn Fn()>>>,
    on_disconnect: RefCell<Vec<DisconnectHook>>,
}

/// Open/close state machine of one dialog
#[derive(Clone)]
pub struct DialogLifecycle {
    inner: Rc<LifecycleInner>,
}

impl fmt::Debug for DialogLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogLifecycle")
            .field("host", &self.inner.host)
            .field("state", &self.inner.state.get())
            .field("parts", &self.inner.parts)
            .finish_non_exhaustive()
    }
}

impl DialogLifecycle {
    /// A new lifecycle starts `Open`
    pub fn new(doc: &Document, host: NodeId, parts: DialogParts) -> Self {
        Self {
            inner: Rc::new(LifecycleInner {
                doc: doc.clone(),
                host,
                parts,
                state: Cell::new(DialogState::Open),
                save_callback: RefCell::new(None),
                on_disconnect: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    pub fn parts(&self) -> &DialogParts {
        &self.inner.parts
    }

    pub fn state(&self) -> DialogState {
        self.inner.state.get()
    }

    /// Callback run by [`apply`](Self::apply) before the dialog starts closing
    pub fn set_save_callback(&self, callback: impl Fn() + 'static) {
        *self.inner.save_callback.borrow_mut() = Some(Rc::new(callback));
    }

    /// Run `hook` once the dialog has been removed from the document
    pub fn on_disconnect(&self, hook: impl FnOnce(&Document) + 'static) {
        self.inner.on_disconnect.borrow_mut().push(Box::new(hook));
    }

    /// Classify the origin of `event`
    pub fn evaluate_close_trigger(&self, event: &Event) -> CloseTrigger {
        let parts = &self.inner.parts;
        match event.current_target {
            Some(node) if node == parts.cancel_button => CloseTrigger::CancelButton,
            Some(node) if node == parts.apply_button => CloseTrigger::ApplyButton,
            _ if event.target == parts.background => CloseTrigger::BackgroundClick,
            _ => CloseTrigger::InvalidSource,
        }
    }

    /// Close the dialog in response to `event`.
    ///
    /// Validation, propagation stop and the switch to `Closing` happen
    /// before this returns. The animations, `dialogClosed` and the removal
    /// run as a task on the document's event loop; the returned future only
    /// reports their outcome and may be dropped.
    pub fn request_close(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        let trigger = self.evaluate_close_trigger(event);
        if !trigger.is_valid() {
            tracing::trace!("Ignoring close request from {:?}", event.target);
            return future::ready(CloseOutcome::NotValidEventForClose).boxed_local();
        }
        if self.state() != DialogState::Open {
            tracing::debug!("Dialog {:?} is already {:?}", self.inner.host, self.state());
            return future::ready(CloseOutcome::AlreadyClosing).boxed_local();
        }

        event.stop_propagation();
        event.prevent_default();
        self.inner.state.set(DialogState::Closing);
        tracing::debug!("Closing dialog {:?} ({:?})", self.inner.host, trigger);

        let container = self.inner.parts.container.play_exit();
        let backdrop = self.inner.parts.backdrop.play_exit();
        let (tx, rx) = channel::bounded(1);
        let this = self.clone();
        self.inner.doc.spawn(async move {
            let (container, backdrop) = future::zip(container, backdrop).await;
            this.finish();
            // Nobody listening if the caller dropped the outcome
            let _ = tx.try_send(CloseOutcome::Closed { container, backdrop });
        });
        async move {
            match rx.recv().await {
                Ok(outcome) => outcome,
                Err(_) => future::pending().await,
            }
        }
        .boxed_local()
    }

    /// Run the save callback, then close like [`request_close`](Self::request_close)
    pub fn apply(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        if self.state() == DialogState::Open {
            let callback = self.inner.save_callback.borrow().clone();
            if let Some(callback) = callback {
                callback();
            }
        }
        self.request_close(event)
    }

    /// Resolves once `dialogClosed` has fired; right away if it already did
    pub fn await_closed(&self) -> BoxedLocal<ClosedSignal> {
        if self.state() == DialogState::Closed {
            return future::ready(ClosedSignal).boxed_local();
        }
        let closed = self.inner.doc.next_event(self.inner.host, EventType::custom(DIALOG_CLOSED));
        async move {
            closed.await;
            ClosedSignal
        }
        .boxed_local()
    }

    fn finish(&self) {
        let doc = &self.inner.doc;
        let host = self.inner.host;
        doc.dispatch_event(host, Event::custom(DIALOG_CLOSED));

        if let Err(err) = doc.remove(host) {
            tracing::warn!("Cannot remove dialog {:?}: {}", host, err);
        }
        let hooks = std::mem::take(&mut *self.inner.on_disconnect.borrow_mut());
        for hook in hooks {
            hook(doc);
        }
        self.inner.state.set(DialogState::Closed);
        tracing::info!("Dialog {:?} closed", host);
    }
}
