//! Focus trap
//!
//! Keeps keyboard focus inside a component. The component renders two
//! focusable borders (class `js-focus-border`) in its shadow root; every
//! enabled interactive element between them is part of the trap. When Tab
//! moves focus onto the last border, focus jumps to the first element;
//! Shift+Tab onto the first border jumps to the last element.
//!
//! All other Tab presses keep the default sequential navigation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use fos_dom::query::{self, Scope};
use fos_dom::{Document, EventType, Key, ListenerId, NodeId};

use crate::error::ConfigError;
use crate::FOCUS_BORDER_CLASS;

/// Focus trap state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTrapState {
    /// Not managing focus
    #[default]
    Idle,
    /// Listening, waiting for the first Tab
    Armed,
    /// Redirecting Tab at the borders
    Active,
}

/// When the trap takes focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmMode {
    /// Focus the first border and wait for the first Tab
    #[default]
    Deferred,
    /// Focus the first element right away
    Immediate,
}

/// Focus trap for the shadow root of `host`
#[derive(Debug, Clone)]
pub struct FocusTrap {
    inner: Rc<TrapInner>,
}

#[derive(Debug)]
struct TrapInner {
    doc: Document,
    host: NodeId,
    state: Cell<FocusTrapState>,
    /// Bumped on every disconnect; work started earlier is dropped
    generation: Cell<u64>,
    /// `[first, last]` border found when armed
    borders: Cell<Option<[NodeId; 2]>>,
    listeners: RefCell<Vec<ListenerId>>,
}

impl FocusTrap {
    pub fn new(doc: &Document, host: NodeId) -> Self {
        Self {
            inner: Rc::new(TrapInner {
                doc: doc.clone(),
                host,
                state: Cell::new(FocusTrapState::Idle),
                generation: Cell::new(0),
                borders: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    fn from_weak(weak: &Weak<TrapInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn state(&self) -> FocusTrapState {
        self.inner.state.get()
    }

    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    /// Start managing focus.
    ///
    /// Requires exactly two focus borders in the host's own shadow root.
    /// Otherwise the problem is logged, the trap stays idle and the error
    /// is returned for inspection. Arming an armed trap does nothing.
    pub async fn arm(&self, first_to_focus: Option<NodeId>, mode: ArmMode) -> Result<(), ConfigError> {
        if self.state() != FocusTrapState::Idle {
            tracing::debug!("Focus trap on {:?} already armed", self.inner.host);
            return Ok(());
        }
        let generation = self.inner.generation.get();

        let borders = self.borders().await;
        if self.inner.generation.get() != generation {
            return Ok(());
        }
        let [first_border, last_border] = borders[..] else {
            return Err(ConfigError::MissingFocusBorders { found: borders.len() }.report());
        };

        self.inner.borders.set(Some([first_border, last_border]));
        self.listen_for_tab();
        self.inner.state.set(FocusTrapState::Armed);
        tracing::debug!("Focus trap on {:?} armed ({:?})", self.inner.host, mode);

        match mode {
            ArmMode::Immediate => {
                self.inner.state.set(FocusTrapState::Active);
                self.focus_first(first_to_focus).await;
            }
            ArmMode::Deferred => {
                self.inner.doc.focus(first_border);
                self.wait_for_first_tab(first_to_focus, generation);
            }
        }
        Ok(())
    }

    /// Stop managing focus and remove every listener. Safe to call repeatedly.
    pub fn disconnect(&self) {
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        for id in listeners {
            self.inner.doc.remove_event_listener(id);
        }
        self.inner.generation.set(self.inner.generation.get() + 1);
        self.inner.borders.set(None);
        if self.state() != FocusTrapState::Idle {
            tracing::debug!("Focus trap on {:?} disconnected", self.inner.host);
        }
        self.inner.state.set(FocusTrapState::Idle);
    }

    /// Document-wide Tab handler. The redirect runs on a later turn, after
    /// the default navigation has moved focus. Shift+Tab pressed on the
    /// first border is recorded here, before focus leaves it.
    fn listen_for_tab(&self) {
        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.doc.add_event_listener(self.inner.doc.root(), EventType::KeyDown, move |doc, event| {
            if event.key() != Some(&Key::Tab) {
                return;
            }
            let Some(trap) = Self::from_weak(&weak) else { return };
            if trap.state() != FocusTrapState::Active {
                return;
            }
            let backward = event.modifiers().shift;
            let from_first_border = backward
                && trap.inner.borders.get().is_some_and(|[first, _]| doc.tree().matches_focus(first));
            doc.spawn(async move {
                trap.redirect(backward, from_first_border).await;
            });
        });
        self.inner.listeners.borrow_mut().push(id);
    }

    /// Swallow the first Tab inside the shadow root and focus the first element
    fn wait_for_first_tab(&self, first_to_focus: Option<NodeId>, generation: u64) {
        let Some(shadow) = self.inner.doc.shadow_root(self.inner.host) else { return };
        let weak = Rc::downgrade(&self.inner);
        let registered: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let slot = registered.clone();
        let id = self.inner.doc.add_event_listener(shadow, EventType::KeyDown, move |doc, event| {
            if event.key() != Some(&Key::Tab) {
                return;
            }
            event.stop_propagation();
            event.prevent_default();
            if let Some(id) = slot.take() {
                doc.remove_event_listener(id);
            }

            let Some(trap) = Self::from_weak(&weak) else { return };
            if trap.inner.generation.get() != generation {
                return;
            }
            trap.inner.state.set(FocusTrapState::Active);
            doc.spawn(async move {
                trap.focus_first(first_to_focus).await;
            });
        });
        registered.set(Some(id));
        self.inner.listeners.borrow_mut().push(id);
    }

    async fn redirect(&self, backward: bool, from_first_border: bool) {
        let generation = self.inner.generation.get();
        let Some((first, last)) = self.first_and_last().await else { return };
        let borders = self.borders().await;
        let [first_border, last_border] = borders[..] else { return };
        if self.inner.generation.get() != generation {
            return;
        }

        let doc = &self.inner.doc;
        let (on_border, target) = if backward {
            (first_border, last)
        } else {
            (last_border, first)
        };
        if from_first_border || doc.tree().matches_focus(on_border) {
            tracing::trace!("Focus trap wraps to {:?}", target);
            doc.focus(target);
        }
    }

    async fn focus_first(&self, first_to_focus: Option<NodeId>) {
        let target = match first_to_focus {
            Some(target) => Some(target),
            None => self.first_and_last().await.map(|(first, _)| first),
        };
        match target {
            Some(target) => {
                self.inner.doc.focus(target);
            }
            None => tracing::debug!("Focus trap on {:?} has nothing to focus", self.inner.host),
        }
    }

    /// Borders in the host's own rendering context
    async fn borders(&self) -> Vec<NodeId> {
        let doc = &self.inner.doc;
        let Some(shadow) = doc.shadow_root(self.inner.host) else { return Vec::new() };
        query::find_elements(doc, shadow, Scope::Shallow, |tree, id| {
            tree.element(id).is_some_and(|e| e.has_class(FOCUS_BORDER_CLASS))
        })
        .await
    }

    /// First and last enabled interactive elements strictly between the
    /// borders, looked up afresh through every nested component.
    pub async fn first_and_last(&self) -> Option<(NodeId, NodeId)> {
        let doc = &self.inner.doc;
        let shadow = doc.shadow_root(self.inner.host)?;
        let interactive = query::find_interactive_elements(doc, shadow, Scope::Deep).await;
        let enabled: Vec<NodeId> = {
            let tree = doc.tree();
            interactive.into_iter()
                .filter(|&id| tree.element(id).is_some_and(|e| !e.disabled))
                .collect()
        };

        let borders = self.borders().await;
        let [first_border, last_border] = borders[..] else { return None };
        let start = enabled.iter().position(|&id| id == first_border)? + 1;
        let end = enabled.iter().position(|&id| id == last_border)?;
        if start >= end {
            return None;
        }
        Some((enabled[start], enabled[end - 1]))
    }
}
