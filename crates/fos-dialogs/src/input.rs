//! Input dialog
//!
//! Replaces the message with a [`ValidatedInput`]. On apply the input is
//! trimmed and checked with the validation predicate: a valid value is
//! confirmed (by default an `inputConfirmed` event carrying the value) and
//! the dialog closes; an invalid one shows the validation text and keeps
//! the dialog open.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, DomResult, Event, EventDetail, NodeId};
use smol::future::{self, BoxedLocal, FutureExt};

use crate::components::ValidatedInput;
use crate::dialog::{Dialog, DialogBase, DialogConfig};
use crate::focus_trap::ArmMode;
use crate::lifecycle::{CloseOutcome, DialogState};
use crate::{INPUT_CONFIRMED, VALIDATED_INPUT_CLASS};

type Predicate = Rc<dyn Fn(&str) -> bool>;
type ConfirmCallback = Rc<dyn Fn(&str)>;

/// Input dialog configuration
#[derive(Clone)]
pub struct InputDialogConfig {
    pub dialog: DialogConfig,
    pub validation_text: String,
    /// Initial value of the input
    pub input_value: String,
    validation_predicate: Predicate,
    on_confirm: Option<ConfirmCallback>,
}

impl Default for InputDialogConfig {
    fn default() -> Self {
        Self {
            dialog: DialogConfig::default(),
            validation_text: "default validation".to_string(),
            input_value: String::new(),
            validation_predicate: Rc::new(|_| true),
            on_confirm: None,
        }
    }
}

impl fmt::Debug for InputDialogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDialogConfig")
            .field("dialog", &self.dialog)
            .field("validation_text", &self.validation_text)
            .field("input_value", &self.input_value)
            .field("custom_confirm", &self.on_confirm.is_some())
            .finish_non_exhaustive()
    }
}

impl InputDialogConfig {
    pub fn dialog(mut self, dialog: DialogConfig) -> Self {
        self.dialog = dialog;
        self
    }

    pub fn validation_text(mut self, text: impl Into<String>) -> Self {
        self.validation_text = text.into();
        self
    }

    pub fn input_value(mut self, value: impl Into<String>) -> Self {
        self.input_value = value.into();
        self
    }

    /// Predicate over the trimmed input; the dialog closes only if it holds
    pub fn validation_predicate(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.validation_predicate = Rc::new(predicate);
        self
    }

    /// Receive the trimmed value instead of the `inputConfirmed` event
    pub fn on_confirm(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_confirm = Some(Rc::new(callback));
        self
    }
}

/// `my-input-dialog`
#[derive(Debug)]
pub struct InputDialog {
    base: DialogBase,
    config: InputDialogConfig,
    input: OnceCell<ValidatedInput>,
}

impl InputDialog {
    pub const TAG: &'static str = "my-input-dialog";

    pub fn open(doc: &Document, parent: NodeId, config: InputDialogConfig) -> DomResult<Rc<Self>> {
        let base = DialogBase::mount(doc, parent, Self::TAG, config.dialog.clone())?;
        crate::open(Rc::new(Self { base, config, input: OnceCell::new() }))
    }

    /// The input component, once rendered
    pub fn input(&self) -> Option<&ValidatedInput> {
        self.input.get()
    }

    fn confirm(&self, value: &str) {
        match &self.config.on_confirm {
            Some(callback) => callback(value),
            None => {
                let event = Event::custom(INPUT_CONFIRMED).with_detail(EventDetail::Input(value.to_string()));
                self.base.doc().dispatch_event(self.base.host(), event);
            }
        }
    }
}

impl Dialog for InputDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn render(&self, content: NodeId) -> DomResult<()> {
        let doc = self.base.doc();
        let input = ValidatedInput::mount(doc, content, &self.config.input_value, &self.config.validation_text)?;
        doc.set_class(input.host(), VALIDATED_INPUT_CLASS, true);
        if self.input.set(input).is_err() {
            tracing::warn!("Input dialog {:?} rendered twice", self.base.host());
        }
        Ok(())
    }

    fn focus_mode(&self) -> ArmMode {
        ArmMode::Immediate
    }

    fn apply(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        let lifecycle = self.base.lifecycle();
        if lifecycle.state() != DialogState::Open {
            return lifecycle.request_close(event);
        }
        let Some(input) = self.input.get() else {
            return lifecycle.apply(event);
        };

        let value = input.value();
        let trimmed = value.trim();
        if (self.config.validation_predicate)(trimmed) {
            self.confirm(trimmed);
            lifecycle.apply(event)
        } else {
            tracing::debug!("Input {:?} rejected by validation", trimmed);
            event.stop_propagation();
            input.show_validation_message();
            future::ready(CloseOutcome::ValidationFailed).boxed_local()
        }
    }
}
