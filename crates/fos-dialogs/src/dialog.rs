//! Dialog base
//!
//! Every dialog shares one skeleton, rendered into the dialog's shadow
//! root:
//!
//! ```text
//! my-modal-background.js-background
//!   div.js-focus-border
//!   my-dialog-container.js-dialog-container
//!     div.heading-text[slot=heading]
//!     div.content[slot=content]        <- filled by Dialog::render
//!     div[slot=footer]
//!       my-dialog-button.js-cancel-button
//!       my-dialog-button.js-apply-button
//!   div.js-focus-border
//! ```
//!
//! [`DialogBase`] owns the lifecycle and the focus trap; concrete dialogs
//! implement [`Dialog`] and are wired up by [`open`].

use std::rc::Rc;

use fos_dom::{Document, DomResult, Event, EventType, NodeId, ShadowRootMode};
use smol::future::BoxedLocal;

use crate::components::{ClickPoint, ContainerOptions, DialogButton, DialogContainer, ModalBackground};
use crate::focus_trap::{ArmMode, FocusTrap};
use crate::lifecycle::{CloseOutcome, ClosedSignal, DialogLifecycle, DialogParts};
use crate::{APPLY_BUTTON_CLASS, CANCEL_BUTTON_CLASS, FOCUS_BORDER_CLASS};

/// Texts and options shared by all dialogs
#[derive(Debug, Clone, PartialEq)]
pub struct DialogConfig {
    pub heading: String,
    pub message: String,
    pub apply_text: String,
    pub cancel_text: String,
    /// Origin of the slide animations; the top left corner if unset
    pub click_point: Option<ClickPoint>,
    pub no_fade_in: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            heading: "default heading".to_string(),
            message: "default message text".to_string(),
            apply_text: "default apply".to_string(),
            cancel_text: "default cancel".to_string(),
            click_point: None,
            no_fade_in: false,
        }
    }
}

impl DialogConfig {
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn apply_text(mut self, text: impl Into<String>) -> Self {
        self.apply_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn click_point(mut self, x: f32, y: f32) -> Self {
        self.click_point = Some(ClickPoint { x, y });
        self
    }

    pub fn no_fade_in(mut self, no_fade_in: bool) -> Self {
        self.no_fade_in = no_fade_in;
        self
    }
}

/// Shared dialog skeleton and controllers
#[derive(Debug)]
pub struct DialogBase {
    doc: Document,
    host: NodeId,
    config: DialogConfig,
    background: ModalBackground,
    container: DialogContainer,
    heading: NodeId,
    content: NodeId,
    cancel_button: DialogButton,
    apply_button: DialogButton,
    borders: [NodeId; 2],
    lifecycle: DialogLifecycle,
    focus_trap: FocusTrap,
}

impl DialogBase {
    /// Create a `tag` element under `parent` and render the skeleton into
    /// its shadow root
    pub fn mount(doc: &Document, parent: NodeId, tag: &str, config: DialogConfig) -> DomResult<Self> {
        let host = doc.build(tag).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        let background = ModalBackground::mount(doc, shadow, config.no_fade_in)?;
        let first_border = Self::focus_border(doc, background.host())?;

        let options = ContainerOptions {
            click_point: config.click_point.unwrap_or_default(),
            ..ContainerOptions::default()
        };
        let container = DialogContainer::mount(doc, background.host(), options)?;
        let heading = doc.build("div")
            .class("heading-text")
            .attr("slot", "heading")
            .attr("role", "heading")
            .attr("aria-level", "1")
            .text(config.heading.clone())
            .append_to(container.host())?;
        let content = doc.build("div")
            .class("content")
            .attr("slot", "content")
            .append_to(container.host())?;
        let footer = doc.build("div").attr("slot", "footer").append_to(container.host())?;

        let cancel_button = DialogButton::mount(doc, footer, &config.cancel_text)?;
        doc.set_class(cancel_button.host(), CANCEL_BUTTON_CLASS, true);
        let apply_button = DialogButton::mount(doc, footer, &config.apply_text)?;
        doc.set_class(apply_button.host(), APPLY_BUTTON_CLASS, true);

        let last_border = Self::focus_border(doc, background.host())?;

        let parts = DialogParts {
            background: background.host(),
            cancel_button: cancel_button.host(),
            apply_button: apply_button.host(),
            backdrop: Rc::new(background.clone()),
            container: Rc::new(container.clone()),
        };
        tracing::debug!("Mounted <{}> as {:?}", tag, host);

        Ok(Self {
            doc: doc.clone(),
            host,
            config,
            background,
            container,
            heading,
            content,
            cancel_button,
            apply_button,
            borders: [first_border, last_border],
            lifecycle: DialogLifecycle::new(doc, host, parts),
            focus_trap: FocusTrap::new(doc, host),
        })
    }

    fn focus_border(doc: &Document, parent: NodeId) -> DomResult<NodeId> {
        doc.build("div")
            .class(FOCUS_BORDER_CLASS)
            .tab_index(0)
            .attr("aria-hidden", "true")
            .append_to(parent)
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn background(&self) -> &ModalBackground {
        &self.background
    }

    pub fn container(&self) -> &DialogContainer {
        &self.container
    }

    pub fn heading(&self) -> NodeId {
        self.heading
    }

    /// Element dialog-specific content is rendered into
    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn cancel_button(&self) -> &DialogButton {
        &self.cancel_button
    }

    pub fn apply_button(&self) -> &DialogButton {
        &self.apply_button
    }

    pub fn borders(&self) -> [NodeId; 2] {
        self.borders
    }

    pub fn lifecycle(&self) -> &DialogLifecycle {
        &self.lifecycle
    }

    pub fn focus_trap(&self) -> &FocusTrap {
        &self.focus_trap
    }
}

/// Capabilities of a concrete dialog.
///
/// Only `base` and `render` are required; closing and applying default to
/// the lifecycle of the base.
pub trait Dialog: 'static {
    fn base(&self) -> &DialogBase;

    /// Render the dialog-specific content into `content`
    fn render(&self, content: NodeId) -> DomResult<()>;

    /// How the focus trap takes focus once the dialog is open
    fn focus_mode(&self) -> ArmMode {
        ArmMode::Deferred
    }

    /// Element focused first instead of the first focusable one
    fn first_to_focus(&self) -> Option<NodeId> {
        None
    }

    /// Called by the cancel button and by background clicks
    fn close(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        self.base().lifecycle().request_close(event)
    }

    /// Called by the apply button
    fn apply(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        self.base().lifecycle().apply(event)
    }

    /// Resolves once the dialog has closed
    fn is_closed(&self) -> BoxedLocal<ClosedSignal> {
        self.base().lifecycle().await_closed()
    }
}

/// Render `dialog`, wire its controls and arm its focus trap.
///
/// The click listeners keep the dialog alive until it is removed from the
/// document. Removal drops every listener registered inside the dialog,
/// its components' included, and releases the focus trap.
pub fn open<D: Dialog>(dialog: Rc<D>) -> DomResult<Rc<D>> {
    let base = dialog.base();
    dialog.render(base.content())?;

    // Close sequences run on the event loop; the listeners drop the outcome
    let doc = base.doc().clone();
    for node in [base.cancel_button().host(), base.background().host()] {
        let dialog = dialog.clone();
        doc.add_event_listener(node, EventType::Click, move |_, event| {
            drop(dialog.close(event));
        });
    }
    let applying = dialog.clone();
    doc.add_event_listener(base.apply_button().host(), EventType::Click, move |_, event| {
        drop(applying.apply(event));
    });

    let trap = base.focus_trap().clone();
    let host = base.host();
    base.lifecycle().on_disconnect(move |doc| {
        let removed = doc.remove_listeners_within(host);
        tracing::trace!("Dropped {} listeners of dialog {:?}", removed, host);
        trap.disconnect();
    });

    let trap = base.focus_trap().clone();
    let first_to_focus = dialog.first_to_focus();
    let mode = dialog.focus_mode();
    doc.spawn(async move {
        if let Err(err) = trap.arm(first_to_focus, mode).await {
            tracing::debug!("Dialog opened without focus trap: {}", err);
        }
    });

    tracing::info!("Dialog {:?} opened", base.host());
    Ok(dialog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::DialogState;

    struct Plain {
        base: DialogBase,
    }

    impl Dialog for Plain {
        fn base(&self) -> &DialogBase {
            &self.base
        }

        fn render(&self, content: NodeId) -> DomResult<()> {
            self.base.doc().set_text(content, &self.base.config().message)
        }
    }

    fn plain(doc: &Document, config: DialogConfig) -> Rc<Plain> {
        let base = DialogBase::mount(doc, doc.root(), "my-plain-dialog", config).unwrap();
        open(Rc::new(Plain { base })).unwrap()
    }

    #[test]
    fn test_default_texts() {
        let doc = Document::new();
        let dialog = plain(&doc, DialogConfig::default());
        doc.block_on(doc.idle());

        let base = dialog.base();
        assert_eq!(doc.text_content(base.heading()), "default heading");
        assert_eq!(doc.text_content(base.content()), "default message text");
        assert_eq!(base.cancel_button().label(), "default cancel");
        assert_eq!(base.apply_button().label(), "default apply");
        assert_eq!(base.container().options().click_point, ClickPoint::default());
    }

    #[test]
    fn test_skeleton_classes() {
        let doc = Document::new();
        let dialog = plain(&doc, DialogConfig::default().heading("Delete?").click_point(10.0, 20.0));
        let base = dialog.base();

        assert!(doc.has_class(base.cancel_button().host(), CANCEL_BUTTON_CLASS));
        assert!(doc.has_class(base.apply_button().host(), APPLY_BUTTON_CLASS));
        for border in base.borders() {
            assert!(doc.has_class(border, FOCUS_BORDER_CLASS));
            assert_eq!(doc.tree().parent(border), Some(base.background().host()));
        }
        assert_eq!(doc.text_content(base.heading()), "Delete?");
        assert_eq!(base.container().options().click_point, ClickPoint { x: 10.0, y: 20.0 });
    }

    #[test]
    fn test_deferred_focus_starts_on_border() {
        let doc = Document::new();
        let dialog = plain(&doc, DialogConfig::default());
        doc.block_on(doc.idle());

        assert_eq!(doc.focused(), Some(dialog.base().borders()[0]));
    }

    #[test]
    fn test_cancel_click_closes() {
        let doc = Document::new();
        let dialog = plain(&doc, DialogConfig::default());
        doc.block_on(doc.idle());

        doc.click(dialog.base().cancel_button().host());
        doc.block_on(dialog.is_closed());
        assert_eq!(dialog.base().lifecycle().state(), DialogState::Closed);
        assert!(!doc.is_connected(dialog.base().host()));
        assert_eq!(doc.listener_count(doc.root(), &EventType::KeyDown), 0);
    }
}
