//! fOS Dialogs
//!
//! Modal dialogs composed from encapsulated components. Shared behavior
//! lives in two owned controllers: a [`FocusTrap`] that keeps keyboard
//! focus between two border elements, and a [`DialogLifecycle`] that runs
//! the exit animations of the background and the container together and
//! removes the dialog once both have finished.
//!
//! Concrete dialogs ([`ConfirmationDialog`], [`InputDialog`],
//! [`SingleChoiceDialog`]) implement the [`Dialog`] capability trait and
//! are opened with [`open`].

mod error;
pub mod keyboard;
mod animation;
mod focus_trap;
mod lifecycle;
pub mod components;
mod dialog;
mod confirmation;
mod input;
mod single_choice;

pub use error::ConfigError;
pub use animation::{ExitAnimation, ExitResult};
pub use focus_trap::{ArmMode, FocusTrap, FocusTrapState};
pub use lifecycle::{CloseOutcome, CloseTrigger, ClosedSignal, DialogLifecycle, DialogParts, DialogState};
pub use dialog::{open, Dialog, DialogBase, DialogConfig};
pub use confirmation::ConfirmationDialog;
pub use input::{InputDialog, InputDialogConfig};
pub use single_choice::{SingleChoiceConfig, SingleChoiceDialog};
pub use components::ChoiceOption;

/// Class of the two focusable borders around a focus-trapped region
pub const FOCUS_BORDER_CLASS: &str = "js-focus-border";
pub const CANCEL_BUTTON_CLASS: &str = "js-cancel-button";
pub const APPLY_BUTTON_CLASS: &str = "js-apply-button";
pub const BACKGROUND_CLASS: &str = "js-background";
pub const DIALOG_CONTAINER_CLASS: &str = "js-dialog-container";
pub const VALIDATED_INPUT_CLASS: &str = "js-validated-input";

/// Fired on a dialog once its exit animations finished, right before removal
pub const DIALOG_CLOSED: &str = "dialogClosed";
/// Fired by [`InputDialog`] with the trimmed input as detail
pub const INPUT_CONFIRMED: &str = "inputConfirmed";
/// Fired by [`SingleChoiceDialog`] on apply with the selected option id
pub const OPTION_CLOSED_WITH_APPLY: &str = "optionDialogClosedWithApply";
/// Fired by [`SingleChoiceDialog`] whenever it is applied
pub const OPTION_CLOSED: &str = "optionDialogClosed";
