//! Document - High-level document API
//!
//! A [`Document`] is a cheap, clonable handle that owns the tree, the
//! listener registry and a single-threaded event loop. Everything runs on
//! one thread; listeners and spawned tasks receive the handle instead of
//! capturing global state.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use smol::channel;
use smol::future::{self, BoxedLocal, FutureExt};
use smol::{LocalExecutor, Task, Timer};

use crate::events::{Event, EventType, Key, KeyModifiers, ListenerId};
use crate::node::ElementData;
use crate::shadow::{ShadowRootMode, UpdateHandle};
use crate::transition::TransitionPolicy;
use crate::{DomResult, DomTree, NodeId};

/// Event-loop turns performed by [`Document::tick`]
const TICK_TURNS: usize = 16;

/// Document configuration
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// How CSS-like transitions report completion
    pub transition_policy: TransitionPolicy,
    /// Duration used by [`TransitionPolicy::Timed`]
    pub transition_duration: Duration,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            transition_policy: TransitionPolicy::Immediate,
            transition_duration: Duration::from_millis(500),
        }
    }
}

impl DocumentConfig {
    /// Set transition policy
    pub fn transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    /// Set transition duration
    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }
}

type Callback = Rc<dyn Fn(&Document, &mut Event)>;

struct Listener {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    callback: Callback,
    once: bool,
}

struct DocumentInner {
    tree: RefCell<DomTree>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    executor: LocalExecutor<'static>,
    tasks: RefCell<Vec<Task<()>>>,
    running_transitions: RefCell<Vec<NodeId>>,
    config: DocumentConfig,
}

/// Document handle
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create an empty document with the default configuration
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                tree: RefCell::new(DomTree::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(1),
                executor: LocalExecutor::new(),
                tasks: RefCell::new(Vec::new()),
                running_transitions: RefCell::new(Vec::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.inner.config
    }

    // === Tree access ===

    /// Borrow the tree. Do not hold the guard across an `.await` or a dispatch.
    pub fn tree(&self) -> Ref<'_, DomTree> {
        self.inner.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, DomTree> {
        self.inner.tree.borrow_mut()
    }

    /// Document root
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Start building an element
    pub fn build(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder::new(self, tag)
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree_mut().create_element(tag)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree_mut().append_child(parent, child)
    }

    /// Remove a node from its parent
    pub fn remove(&self, node: NodeId) -> DomResult<()> {
        self.tree_mut().remove(node)
    }

    pub fn attach_shadow(&self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        self.tree_mut().attach_shadow(host, mode)
    }

    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.tree().shadow_root(host)
    }

    pub fn update_handle(&self, host: NodeId) -> Option<UpdateHandle> {
        self.tree().update_handle(host)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree().is_connected(node)
    }

    /// Run `f` on the element data of `node`
    pub fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        self.tree_mut().element_mut(node).map(f)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree().element(node).is_some_and(|e| e.has_class(class))
    }

    /// Add or remove a class
    pub fn set_class(&self, node: NodeId, class: &str, on: bool) {
        self.with_element(node, |e| e.toggle_class(class, on));
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree().element(node)?.get_attr(name).map(str::to_string)
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: impl Into<String>) {
        self.with_element(node, |e| e.set_attr(name, value));
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree().text_content(node)
    }

    pub fn set_text(&self, node: NodeId, text: &str) -> DomResult<()> {
        self.tree_mut().set_text(node, text)
    }

    /// Render a shadow host asynchronously.
    ///
    /// The host's [`UpdateHandle`] stays pending until `render` has run on a
    /// later turn of the event loop.
    pub fn schedule_update(&self, host: NodeId, render: impl FnOnce(&Document) + 'static) {
        let handle = self.update_handle(host);
        if let Some(handle) = &handle {
            handle.begin();
        }
        let doc = self.clone();
        self.spawn(async move {
            future::yield_now().await;
            render(&doc);
            if let Some(handle) = handle {
                handle.complete();
            }
        });
    }

    // === Focus ===

    /// Focus an element; returns false if it does not accept focus
    pub fn focus(&self, node: NodeId) -> bool {
        let focused = self.tree_mut().set_focus(node);
        if focused {
            tracing::trace!(?node, "focus");
        }
        focused
    }

    pub fn blur(&self) {
        self.tree_mut().blur();
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.tree().focused()
    }

    /// Move focus along the sequential focus order, wrapping at both ends
    pub fn focus_next(&self, backward: bool) -> Option<NodeId> {
        let order = self.tree().sequential_focus_order();
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let current = self.focused().and_then(|f| order.iter().position(|&n| n == f));
        let next = match (current, backward) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };
        self.focus(order[next]);
        Some(order[next])
    }

    // === Listeners ===

    /// Register a listener for `event_type` on `node`
    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: EventType,
        callback: impl Fn(&Document, &mut Event) + 'static,
    ) -> ListenerId {
        self.register(node, event_type, Rc::new(callback), false)
    }

    /// Register a listener that is removed before its first invocation
    pub fn add_event_listener_once(
        &self,
        node: NodeId,
        event_type: EventType,
        callback: impl Fn(&Document, &mut Event) + 'static,
    ) -> ListenerId {
        self.register(node, event_type, Rc::new(callback), true)
    }

    fn register(&self, node: NodeId, event_type: EventType, callback: Callback, once: bool) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(Listener { id, node, event_type, callback, once });
        id
    }

    /// Remove a listener; returns false if it was already gone
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Wait for the next `event_type` dispatched at `node` itself.
    ///
    /// The listener is registered before this returns and removes itself
    /// on the first match; events bubbling up from descendants are ignored.
    /// Stays pending forever if no such event is ever dispatched.
    pub fn next_event(&self, node: NodeId, event_type: EventType) -> BoxedLocal<Event> {
        let (tx, rx) = channel::bounded(1);
        let registered: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let slot = registered.clone();
        let id = self.add_event_listener(node, event_type, move |doc, event| {
            if event.original_target() != node {
                return;
            }
            if let Some(id) = slot.take() {
                doc.remove_event_listener(id);
            }
            // Capacity 1 and the listener is gone after this send; a
            // dropped receiver means nobody waits anymore.
            let _ = tx.try_send(event.clone());
        });
        registered.set(Some(id));

        async move {
            match rx.recv().await {
                Ok(event) => event,
                Err(_) => future::pending().await,
            }
        }
        .boxed_local()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow().iter().any(|l| l.id == id)
    }

    /// Listeners registered in the whole document
    pub fn total_listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Remove every listener registered on `node` or anywhere inside it,
    /// shadow trees included; returns how many were removed
    pub fn remove_listeners_within(&self, node: NodeId) -> usize {
        let tree = self.tree();
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !tree.contains(node, l.node));
        before - listeners.len()
    }

    /// Listeners registered on `node` for `event_type`
    pub fn listener_count(&self, node: NodeId, event_type: &EventType) -> usize {
        self.inner.listeners.borrow()
            .iter()
            .filter(|l| l.node == node && &l.event_type == event_type)
            .count()
    }

    // === Dispatch ===

    /// Dispatch `event` at `target` and return it with its final flags.
    ///
    /// Listeners run with no tree or registry borrow held, so they may
    /// mutate the document and register or remove listeners freely.
    pub fn dispatch_event(&self, target: NodeId, mut event: Event) -> Event {
        let path = self.tree().event_path(target, event.composed);
        event.original_target = target;
        event.path = path.clone();
        tracing::trace!(event = event.event_type.name(), ?target, "dispatch");

        let reach = if event.bubbles { path.len() } else { path.len().min(1) };
        for &node in &path[..reach] {
            let callbacks: Vec<(ListenerId, Callback, bool)> = self.inner.listeners.borrow()
                .iter()
                .filter(|l| l.node == node && l.event_type == event.event_type)
                .map(|l| (l.id, Rc::clone(&l.callback), l.once))
                .collect();
            if callbacks.is_empty() {
                continue;
            }

            event.current_target = Some(node);
            event.target = self.tree().retarget(target, node);
            for (id, callback, once) in callbacks {
                if once {
                    if !self.remove_event_listener(id) {
                        continue;
                    }
                } else if !self.has_listener(id) {
                    continue;
                }
                callback(self, &mut event);
                if event.immediate_stopped() {
                    break;
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        event.target = self.tree().retarget(target, NodeId::ROOT);
        event
    }

    /// Dispatch a primary-button click
    pub fn click(&self, node: NodeId) -> Event {
        self.dispatch_event(node, Event::click())
    }

    /// Press a key: keydown at the focused element (or the root), then the
    /// default action unless a listener prevented it.
    pub fn press_key(&self, key: Key, modifiers: KeyModifiers) -> Event {
        let target = self.focused().unwrap_or(NodeId::ROOT);
        let event = self.dispatch_event(target, Event::key_down(key.clone(), modifiers));
        if key == Key::Tab && !event.default_prevented() {
            self.focus_next(modifiers.shift);
        }
        event
    }

    // === Event loop ===

    /// Spawn a task on the document's event loop
    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) {
        let task = self.inner.executor.spawn(fut);
        let mut tasks = self.inner.tasks.borrow_mut();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }

    /// Tasks held for [`idle`](Self::idle). Finished ones are released on
    /// the next [`spawn`](Self::spawn).
    pub fn task_count(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    /// Run the event loop until `fut` completes
    pub fn block_on<T>(&self, fut: impl Future<Output = T>) -> T {
        smol::block_on(self.inner.executor.run(fut))
    }

    /// Give spawned tasks a few turns of the event loop
    pub async fn tick(&self) {
        for _ in 0..TICK_TURNS {
            future::yield_now().await;
        }
    }

    /// Wait for every spawned task, including ones spawned meanwhile.
    /// Never returns while a spawned task is stuck.
    pub async fn idle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.inner.tasks.borrow_mut());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                task.await;
            }
        }
    }

    // === Transitions ===

    /// Start a transition on `node`; completion is reported per the
    /// configured [`TransitionPolicy`].
    pub fn start_transition(&self, node: NodeId) {
        match self.inner.config.transition_policy {
            TransitionPolicy::Immediate => {
                let doc = self.clone();
                self.spawn(async move {
                    future::yield_now().await;
                    doc.fire_transition_end(node);
                });
            }
            TransitionPolicy::Timed => {
                let doc = self.clone();
                let duration = self.inner.config.transition_duration;
                self.spawn(async move {
                    Timer::after(duration).await;
                    doc.fire_transition_end(node);
                });
            }
            TransitionPolicy::Manual => {
                self.inner.running_transitions.borrow_mut().push(node);
            }
        }
    }

    /// Report the end of a transition on `node`
    pub fn fire_transition_end(&self, node: NodeId) {
        self.inner.running_transitions.borrow_mut().retain(|&n| n != node);
        if self.tree().get(node).is_some() {
            self.dispatch_event(node, Event::transition_end());
        }
    }

    /// Transitions waiting for a manual end
    pub fn running_transitions(&self) -> Vec<NodeId> {
        self.inner.running_transitions.borrow().clone()
    }

    /// End every manual transition; returns how many were ended
    pub fn finish_transitions(&self) -> usize {
        let nodes = std::mem::take(&mut *self.inner.running_transitions.borrow_mut());
        for &node in &nodes {
            self.fire_transition_end(node);
        }
        nodes.len()
    }
}

/// Element builder
pub struct ElementBuilder<'a> {
    doc: &'a Document,
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    tab_index: Option<i32>,
    disabled: bool,
    text: Option<String>,
}

impl<'a> ElementBuilder<'a> {
    fn new(doc: &'a Document, tag: &str) -> Self {
        Self {
            doc,
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: Vec::new(),
            tab_index: None,
            disabled: false,
            text: None,
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Create the element detached
    pub fn finish(self) -> DomResult<NodeId> {
        let mut tree = self.doc.tree_mut();
        let id = tree.create_element(&self.tag);
        if let Some(el) = tree.element_mut(id) {
            for class in &self.classes {
                el.add_class(class);
            }
            for (name, value) in self.attrs {
                el.set_attr(&name, value);
            }
            el.tab_index = self.tab_index;
            el.disabled = self.disabled;
        }
        if let Some(text) = &self.text {
            tree.set_text(id, text)?;
        }
        Ok(id)
    }

    /// Create the element and append it to `parent`
    pub fn append_to(self, parent: NodeId) -> DomResult<NodeId> {
        let doc = self.doc;
        let id = self.finish()?;
        doc.append_child(parent, id)?;
        Ok(id)
    }
}
