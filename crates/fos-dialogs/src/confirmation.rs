//! Confirmation dialog: heading, message, cancel and apply

use std::rc::Rc;

use fos_dom::{Document, DomResult, NodeId};

use crate::dialog::{Dialog, DialogBase, DialogConfig};
use crate::focus_trap::ArmMode;

/// `my-confirmation-dialog`
#[derive(Debug)]
pub struct ConfirmationDialog {
    base: DialogBase,
}

impl ConfirmationDialog {
    pub const TAG: &'static str = "my-confirmation-dialog";

    /// Mount and open a confirmation dialog under `parent`
    pub fn open(doc: &Document, parent: NodeId, config: DialogConfig) -> DomResult<Rc<Self>> {
        let base = DialogBase::mount(doc, parent, Self::TAG, config)?;
        crate::open(Rc::new(Self { base }))
    }

    /// Register a callback run when the dialog is applied
    pub fn on_save(&self, callback: impl Fn() + 'static) {
        self.base.lifecycle().set_save_callback(callback);
    }
}

impl Dialog for ConfirmationDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn render(&self, content: NodeId) -> DomResult<()> {
        self.base.doc().set_text(content, &self.base.config().message)
    }

    fn focus_mode(&self) -> ArmMode {
        ArmMode::Deferred
    }
}
