//! Integration tests for fos-dialogs
//!
//! Dialogs driven the way a user drives them: clicks and key presses on a
//! document, with the event loop run until the dialog has settled.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dialogs::{
    ArmMode, CloseOutcome, ConfirmationDialog, Dialog, DialogConfig, DialogState, ExitResult,
    FocusTrap, FocusTrapState, InputDialog, InputDialogConfig, SingleChoiceConfig, SingleChoiceDialog,
    DIALOG_CLOSED, FOCUS_BORDER_CLASS, OPTION_CLOSED_WITH_APPLY,
};
use fos_dom::{Document, Event, EventDetail, EventType, Key, KeyModifiers, NodeId, ShadowRootMode};

fn confirmation(doc: &Document) -> Rc<ConfirmationDialog> {
    let dialog = ConfirmationDialog::open(doc, doc.root(), DialogConfig::default()).unwrap();
    doc.block_on(doc.idle());
    dialog
}

/// Record every `dialogClosed` reaching the document root
fn closed_events(doc: &Document) -> Rc<RefCell<Vec<NodeId>>> {
    let closed = Rc::new(RefCell::new(Vec::new()));
    let c = closed.clone();
    doc.add_event_listener(doc.root(), EventType::custom(DIALOG_CLOSED), move |_, event| {
        c.borrow_mut().push(event.target);
    });
    closed
}

fn event_from(target: NodeId, current_target: NodeId) -> Event {
    let mut event = Event::click();
    event.target = target;
    event.current_target = Some(current_target);
    event
}

// ============================================================================
// CLOSE TRIGGERS
// ============================================================================

#[test]
fn test_every_valid_trigger_closes_once() {
    for trigger in ["cancel", "apply", "background"] {
        let doc = Document::new();
        let dialog = confirmation(&doc);
        let closed = closed_events(&doc);
        let base = dialog.base();

        let node = match trigger {
            "cancel" => base.cancel_button().host(),
            "apply" => base.apply_button().host(),
            _ => base.background().host(),
        };
        doc.click(node);
        doc.block_on(dialog.is_closed());
        doc.block_on(doc.idle());

        assert_eq!(*closed.borrow(), vec![base.host()], "trigger: {}", trigger);
        assert_eq!(base.lifecycle().state(), DialogState::Closed);
        assert!(!doc.is_connected(base.host()));
        assert!(doc.tree().children(doc.root()).is_empty());
    }
}

#[test]
fn test_click_on_content_does_not_close() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let closed = closed_events(&doc);
    let base = dialog.base();

    doc.click(base.content());
    doc.click(base.borders()[0]);
    doc.block_on(doc.idle());
    assert!(closed.borrow().is_empty());
    assert_eq!(base.lifecycle().state(), DialogState::Open);

    let mut event = event_from(base.content(), base.background().host());
    let outcome = doc.block_on(dialog.close(&mut event));
    assert_eq!(outcome, CloseOutcome::NotValidEventForClose);
    assert_eq!(outcome.to_string(), "not valid event for close");
    assert!(doc.is_connected(base.host()));
}

#[test]
fn test_close_resolves_with_exit_results() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let cancel = dialog.base().cancel_button().host();

    let outcome = doc.block_on(dialog.close(&mut event_from(cancel, cancel)));
    let results = outcome.exit_results().unwrap();
    assert_eq!(results, [ExitResult::SlidOut, ExitResult::FadedOut]);
    assert_eq!(results.map(|r| r.as_str()), ["slided out!", "fadedOut"]);
    assert!(!dialog.base().background().is_grey());
    assert!(!dialog.base().container().is_slid_in());
}

#[test]
fn test_is_closed_resolves() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let waiting = dialog.is_closed();

    doc.click(dialog.base().background().host());
    assert_eq!(doc.block_on(waiting).to_string(), "isClosed");
}

#[test]
fn test_save_runs_before_closed_event() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = log.clone();
    dialog.on_save(move || l.borrow_mut().push("saved"));
    let l = log.clone();
    doc.add_event_listener(doc.root(), EventType::custom(DIALOG_CLOSED), move |_, _| {
        l.borrow_mut().push("closed");
    });

    doc.click(dialog.base().apply_button().host());
    assert_eq!(*log.borrow(), vec!["saved"]);
    doc.block_on(dialog.is_closed());
    assert_eq!(*log.borrow(), vec!["saved", "closed"]);
}

#[test]
fn test_enter_on_focused_button_applies() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let apply = dialog.base().apply_button().button().unwrap();

    assert!(doc.focus(apply));
    doc.press_key(Key::Enter, KeyModifiers::NONE);
    doc.block_on(dialog.is_closed());
    assert_eq!(dialog.base().lifecycle().state(), DialogState::Closed);
}

// ============================================================================
// INPUT DIALOG
// ============================================================================

#[test]
fn test_failed_validation_keeps_dialog_open() {
    let doc = Document::new();
    let config = InputDialogConfig::default()
        .validation_text("Please enter a name")
        .validation_predicate(|value| !value.is_empty());
    let dialog = InputDialog::open(&doc, doc.root(), config).unwrap();
    doc.block_on(doc.idle());
    let input = dialog.input().unwrap();
    input.set_value("   ");

    let apply = dialog.base().apply_button().host();
    for _ in 0..2 {
        let mut event = event_from(apply, apply);
        let outcome = doc.block_on(dialog.apply(&mut event));
        assert_eq!(outcome, CloseOutcome::ValidationFailed);
        assert!(event.propagation_stopped());
    }
    doc.click(apply);
    doc.block_on(doc.idle());

    assert_eq!(dialog.base().lifecycle().state(), DialogState::Open);
    assert_eq!(input.validation_message(), "Please enter a name");
    assert!(input.has_error_underline());
}

#[test]
fn test_valid_input_is_trimmed_and_confirmed() {
    let doc = Document::new();
    let confirmed = Rc::new(RefCell::new(Vec::new()));
    let c = confirmed.clone();
    let config = InputDialogConfig::default()
        .validation_predicate(|value| !value.is_empty())
        .on_confirm(move |value| c.borrow_mut().push(value.to_string()));
    let dialog = InputDialog::open(&doc, doc.root(), config).unwrap();
    doc.block_on(doc.idle());

    dialog.input().unwrap().set_value("  Ada Lovelace \t");
    doc.click(dialog.base().apply_button().host());
    doc.block_on(dialog.is_closed());

    assert_eq!(*confirmed.borrow(), vec!["Ada Lovelace".to_string()]);
    assert!(!doc.is_connected(dialog.base().host()));
}

// ============================================================================
// SINGLE-CHOICE DIALOG
// ============================================================================

#[test]
fn test_apply_without_interaction_reports_first_option() {
    let doc = Document::new();
    let config = SingleChoiceConfig::default()
        .option("daily", "Daily")
        .option("weekly", "Weekly");
    let dialog = SingleChoiceDialog::open(&doc, doc.root(), config).unwrap();
    doc.block_on(doc.idle());

    let selection = Rc::new(RefCell::new(None));
    let s = selection.clone();
    doc.add_event_listener(doc.root(), EventType::custom(OPTION_CLOSED_WITH_APPLY), move |_, event| {
        *s.borrow_mut() = event.detail().cloned();
    });
    doc.click(dialog.base().apply_button().host());
    doc.block_on(dialog.is_closed());

    assert_eq!(*selection.borrow(), Some(EventDetail::Selection(Some("daily".to_string()))));
}

// ============================================================================
// FOCUS TRAP
// ============================================================================

/// host shadow: border, three controls, border
fn trapped_controls(doc: &Document) -> (FocusTrap, [NodeId; 3], [NodeId; 2]) {
    let host = doc.build("my-trapped").append_to(doc.root()).unwrap();
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    let border = |doc: &Document| doc.build("div").class(FOCUS_BORDER_CLASS).tab_index(0).append_to(shadow).unwrap();
    let control = |doc: &Document| doc.build("div").class("control").tab_index(0).append_to(shadow).unwrap();

    let first_border = border(doc);
    let controls = [control(doc), control(doc), control(doc)];
    let last_border = border(doc);
    (FocusTrap::new(doc, host), controls, [first_border, last_border])
}

#[test]
fn test_tab_cycles_inside_trap() {
    let doc = Document::new();
    let (trap, [first, second, last], _) = trapped_controls(&doc);

    doc.block_on(trap.arm(None, ArmMode::Immediate)).unwrap();
    assert_eq!(trap.state(), FocusTrapState::Active);
    assert_eq!(doc.focused(), Some(first));

    doc.press_key(Key::Tab, KeyModifiers::NONE);
    doc.block_on(doc.idle());
    assert_eq!(doc.focused(), Some(second));

    doc.focus(last);
    doc.press_key(Key::Tab, KeyModifiers::NONE);
    doc.block_on(doc.idle());
    assert_eq!(doc.focused(), Some(first));

    doc.press_key(Key::Tab, KeyModifiers::SHIFT);
    doc.block_on(doc.idle());
    assert_eq!(doc.focused(), Some(last));
}

#[test]
fn test_dialog_traps_focus_across_components() {
    let doc = Document::new();
    let dialog = InputDialog::open(&doc, doc.root(), InputDialogConfig::default()).unwrap();
    doc.block_on(doc.idle());
    let input = dialog.input().unwrap().input_element();
    let apply = dialog.base().apply_button().button();
    assert_eq!(doc.focused(), input);

    doc.focus(apply.unwrap());
    doc.press_key(Key::Tab, KeyModifiers::NONE);
    doc.block_on(doc.idle());
    assert_eq!(doc.focused(), input);

    doc.press_key(Key::Tab, KeyModifiers::SHIFT);
    doc.block_on(doc.idle());
    assert_eq!(doc.focused(), apply);
}

#[test]
fn test_deferred_arm_waits_for_first_tab() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    let base = dialog.base();
    assert_eq!(base.focus_trap().state(), FocusTrapState::Armed);
    assert_eq!(doc.focused(), Some(base.borders()[0]));

    let event = doc.press_key(Key::Tab, KeyModifiers::NONE);
    assert!(event.default_prevented());
    doc.block_on(doc.idle());

    assert_eq!(base.focus_trap().state(), FocusTrapState::Active);
    assert_eq!(doc.focused(), base.cancel_button().button());
}

#[test]
fn test_trap_released_when_dialog_closes() {
    let doc = Document::new();
    let dialog = confirmation(&doc);
    assert_eq!(doc.listener_count(doc.root(), &EventType::KeyDown), 1);

    doc.click(dialog.base().cancel_button().host());
    doc.block_on(dialog.is_closed());
    assert_eq!(doc.listener_count(doc.root(), &EventType::KeyDown), 0);
    assert_eq!(dialog.base().focus_trap().state(), FocusTrapState::Idle);
}
