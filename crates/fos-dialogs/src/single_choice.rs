//! Single-choice dialog
//!
//! Shows the message above a radio group. Applying from the apply button
//! reports the selected option with `optionDialogClosedWithApply`; every
//! apply also fires `optionDialogClosed` before the dialog closes.

use std::cell::OnceCell;
use std::rc::Rc;

use fos_dom::{Document, DomResult, Event, EventDetail, NodeId};
use smol::future::BoxedLocal;

use crate::components::{ChoiceOption, RadioButtonController};
use crate::dialog::{Dialog, DialogBase, DialogConfig};
use crate::focus_trap::ArmMode;
use crate::lifecycle::{CloseOutcome, DialogState};
use crate::{OPTION_CLOSED, OPTION_CLOSED_WITH_APPLY};

/// Single-choice dialog configuration
#[derive(Debug, Clone, Default)]
pub struct SingleChoiceConfig {
    pub dialog: DialogConfig,
    pub options: Vec<ChoiceOption>,
    /// Id of the option selected at start; the first option if unset
    pub preselected: Option<String>,
}

impl SingleChoiceConfig {
    pub fn dialog(mut self, dialog: DialogConfig) -> Self {
        self.dialog = dialog;
        self
    }

    pub fn option(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(ChoiceOption::new(id, text));
        self
    }

    pub fn options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    pub fn preselected(mut self, id: impl Into<String>) -> Self {
        self.preselected = Some(id.into());
        self
    }
}

/// `my-single-choice-dialog`
#[derive(Debug)]
pub struct SingleChoiceDialog {
    base: DialogBase,
    config: SingleChoiceConfig,
    controller: OnceCell<RadioButtonController>,
}

impl SingleChoiceDialog {
    pub const TAG: &'static str = "my-single-choice-dialog";

    pub fn open(doc: &Document, parent: NodeId, config: SingleChoiceConfig) -> DomResult<Rc<Self>> {
        let base = DialogBase::mount(doc, parent, Self::TAG, config.dialog.clone())?;
        crate::open(Rc::new(Self { base, config, controller: OnceCell::new() }))
    }

    pub fn controller(&self) -> Option<&RadioButtonController> {
        self.controller.get()
    }

    /// Id of the selected option
    pub fn selected_option(&self) -> Option<String> {
        self.controller.get().and_then(RadioButtonController::selected_option)
    }
}

impl Dialog for SingleChoiceDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn render(&self, content: NodeId) -> DomResult<()> {
        let doc = self.base.doc();
        let wrapper = doc.build("div").class("radio-manager-wrapper").append_to(content)?;
        doc.build("span")
            .class("message")
            .text(self.config.dialog.message.clone())
            .append_to(wrapper)?;
        let controller = RadioButtonController::mount(
            doc,
            wrapper,
            self.config.options.clone(),
            self.config.preselected.clone(),
        )?;
        if self.controller.set(controller).is_err() {
            tracing::warn!("Single-choice dialog {:?} rendered twice", self.base.host());
        }
        Ok(())
    }

    fn focus_mode(&self) -> ArmMode {
        ArmMode::Immediate
    }

    fn apply(&self, event: &mut Event) -> BoxedLocal<CloseOutcome> {
        let lifecycle = self.base.lifecycle();
        if lifecycle.state() == DialogState::Open {
            let doc = self.base.doc();
            let host = self.base.host();
            if event.current_target == Some(self.base.apply_button().host()) {
                let selected = self.selected_option();
                tracing::debug!("Option {:?} applied", selected);
                doc.dispatch_event(
                    host,
                    Event::custom(OPTION_CLOSED_WITH_APPLY).with_detail(EventDetail::Selection(selected)),
                );
            }
            doc.dispatch_event(host, Event::custom(OPTION_CLOSED));
        }
        lifecycle.apply(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::{EventType, Key, KeyModifiers};
    use std::cell::RefCell;

    fn colors() -> SingleChoiceConfig {
        SingleChoiceConfig::default()
            .option("red", "Red")
            .option("green", "Green")
            .option("blue", "Blue")
    }

    #[test]
    fn test_arrow_key_changes_reported_option() {
        let doc = Document::new();
        let dialog = SingleChoiceDialog::open(&doc, doc.root(), colors()).unwrap();
        doc.block_on(doc.idle());
        assert_eq!(dialog.selected_option().as_deref(), Some("red"));

        doc.press_key(Key::ArrowDown, KeyModifiers::NONE);
        assert_eq!(dialog.selected_option().as_deref(), Some("green"));

        let events = Rc::new(RefCell::new(Vec::new()));
        for name in [OPTION_CLOSED_WITH_APPLY, OPTION_CLOSED] {
            let events = events.clone();
            doc.add_event_listener(doc.root(), EventType::custom(name), move |_, event| {
                events.borrow_mut().push((event.event_type.name().to_string(), event.detail().cloned()));
            });
        }
        doc.click(dialog.base().apply_button().host());
        doc.block_on(dialog.is_closed());

        assert_eq!(*events.borrow(), vec![
            (OPTION_CLOSED_WITH_APPLY.to_string(), Some(EventDetail::Selection(Some("green".to_string())))),
            (OPTION_CLOSED.to_string(), None),
        ]);
    }

    #[test]
    fn test_cancel_reports_no_selection() {
        let doc = Document::new();
        let dialog = SingleChoiceDialog::open(&doc, doc.root(), colors().preselected("blue")).unwrap();
        doc.block_on(doc.idle());
        assert_eq!(dialog.selected_option().as_deref(), Some("blue"));

        let applied = Rc::new(RefCell::new(0));
        let a = applied.clone();
        doc.add_event_listener(doc.root(), EventType::custom(OPTION_CLOSED_WITH_APPLY), move |_, _| {
            *a.borrow_mut() += 1;
        });
        doc.click(dialog.base().cancel_button().host());
        doc.block_on(dialog.is_closed());
        assert_eq!(*applied.borrow(), 0);
    }
}
