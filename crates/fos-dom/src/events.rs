//! DOM Events
//!
//! Event objects for composed dispatch: keyboard, mouse, transition and
//! custom component events.

use crate::NodeId;

/// Event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
    TransitionEnd,
    /// Component-defined event (e.g. `dialogClosed`)
    Custom(String),
}

impl EventType {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// DOM event name
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::TransitionEnd => "transitionend",
            Self::Custom(name) => name,
        }
    }
}

/// Keyboard key (the `key` property of a keyboard event)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Escape,
    Space,
    Character(char),
    Unidentified,
}

impl Key {
    /// Parse a DOM `key` string
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            " " | "Spacebar" => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified,
                }
            }
        }
    }

    /// DOM `key` string
    pub fn as_str(&self) -> String {
        match self {
            Self::ArrowUp => "ArrowUp".into(),
            Self::ArrowDown => "ArrowDown".into(),
            Self::ArrowLeft => "ArrowLeft".into(),
            Self::ArrowRight => "ArrowRight".into(),
            Self::Enter => "Enter".into(),
            Self::Tab => "Tab".into(),
            Self::Escape => "Escape".into(),
            Self::Space => " ".into(),
            Self::Character(c) => c.to_string(),
            Self::Unidentified => "Unidentified".into(),
        }
    }
}

/// Keyboard modifier state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false, meta: false };
}

/// Mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// Detail payload of custom events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    /// Confirmed text input
    Input(String),
    /// Selected option id
    Selection(Option<String>),
}

/// Event payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventData {
    #[default]
    None,
    Key { key: Key, modifiers: KeyModifiers },
    Mouse { button: MouseButton, x: f32, y: f32 },
    Detail(EventDetail),
}

#[derive(Debug, Clone, Copy, Default)]
struct EventFlags {
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_stopped: bool,
}

/// Event being dispatched
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub bubbles: bool,
    pub composed: bool,
    pub cancelable: bool,
    pub data: EventData,
    /// Target as seen by the current listener (retargeted across shadow roots)
    pub target: NodeId,
    /// Node whose listener is running
    pub current_target: Option<NodeId>,
    pub(crate) original_target: NodeId,
    pub(crate) path: Vec<NodeId>,
    flags: EventFlags,
}

impl Event {
    /// Create an event with explicit flags
    pub fn new(event_type: EventType, bubbles: bool, composed: bool, cancelable: bool) -> Self {
        Self {
            event_type,
            bubbles,
            composed,
            cancelable,
            data: EventData::None,
            target: NodeId::NONE,
            current_target: None,
            original_target: NodeId::NONE,
            path: Vec::new(),
            flags: EventFlags::default(),
        }
    }

    /// Keydown event (bubbles, composed, cancelable)
    pub fn key_down(key: Key, modifiers: KeyModifiers) -> Self {
        Self::new(EventType::KeyDown, true, true, true)
            .with_data(EventData::Key { key, modifiers })
    }

    /// Primary-button click (bubbles, composed, cancelable)
    pub fn click() -> Self {
        Self::new(EventType::Click, true, true, true)
            .with_data(EventData::Mouse { button: MouseButton::Primary, x: 0.0, y: 0.0 })
    }

    /// Transition end (bubbles, stays inside its shadow tree)
    pub fn transition_end() -> Self {
        Self::new(EventType::TransitionEnd, true, false, false)
    }

    /// Component event that bubbles and crosses shadow boundaries
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(EventType::custom(name), true, true, false)
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    pub fn with_detail(self, detail: EventDetail) -> Self {
        self.with_data(EventData::Detail(detail))
    }

    /// Keyboard key, if this is a keyboard event
    pub fn key(&self) -> Option<&Key> {
        match &self.data {
            EventData::Key { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> KeyModifiers {
        match &self.data {
            EventData::Key { modifiers, .. } => *modifiers,
            _ => KeyModifiers::NONE,
        }
    }

    pub fn mouse_button(&self) -> Option<MouseButton> {
        match &self.data {
            EventData::Mouse { button, .. } => Some(*button),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&EventDetail> {
        match &self.data {
            EventData::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    /// Node the event was dispatched at (`composedPath()[0]`)
    pub fn original_target(&self) -> NodeId {
        self.original_target
    }

    /// Propagation path, target first
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Cancel the default action (ignored for non-cancelable events)
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.flags.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.flags.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.flags.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.flags.propagation_stopped = true;
        self.flags.immediate_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.flags.propagation_stopped
    }

    pub(crate) fn immediate_stopped(&self) -> bool {
        self.flags.immediate_stopped
    }
}

/// Registered listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
