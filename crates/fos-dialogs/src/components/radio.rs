//! Radio group
//!
//! A controller renders one label per option, keeps exactly one of them
//! checked and moves the selection with arrow keys (circularly) or primary
//! clicks. Only the checked label's radio is in the tab order.

use fos_dom::{Document, DomResult, Event, EventType, MouseButton, NodeId, ShadowRootMode};

use crate::error::ConfigError;
use crate::keyboard::next_item;

const WRAPPER_CLASS: &str = "radio-button-wrapper";

/// A selectable option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// `my-radio-button-label`: one radio with its text
#[derive(Debug, Clone)]
pub struct RadioButtonLabel {
    doc: Document,
    host: NodeId,
}

impl RadioButtonLabel {
    pub const TAG: &'static str = "my-radio-button-label";

    pub fn mount(doc: &Document, parent: NodeId, option: &ChoiceOption, index: usize, size: usize) -> DomResult<Self> {
        let host = doc.build(Self::TAG).attr("id", option.id.as_str()).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        let option = option.clone();
        doc.schedule_update(host, move |doc| {
            if let Err(err) = Self::render(doc, host, shadow, &option, index, size) {
                tracing::warn!("Cannot render radio button label: {}", err);
            }
        });

        Ok(Self::from_host(doc, host))
    }

    fn from_host(doc: &Document, host: NodeId) -> Self {
        Self { doc: doc.clone(), host }
    }

    fn render(doc: &Document, host: NodeId, shadow: NodeId, option: &ChoiceOption, index: usize, size: usize) -> DomResult<()> {
        let checked = doc.attr(host, "checked").is_some();
        let label = doc.build("label")
            .class("label-container")
            .attr("id", option.id.as_str())
            .append_to(shadow)?;
        doc.build("div")
            .class(WRAPPER_CLASS)
            .attr("role", "radio")
            .attr("aria-checked", checked.to_string())
            .attr("aria-posinset", index.to_string())
            .attr("aria-setsize", size.to_string())
            .tab_index(if checked { 0 } else { -1 })
            .append_to(label)?;
        doc.build("span").class("label-text").text(option.text.as_str()).append_to(label)?;
        Ok(())
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Option id
    pub fn id(&self) -> String {
        self.doc.attr(self.host, "id").unwrap_or_default()
    }

    pub fn is_checked(&self) -> bool {
        self.doc.attr(self.host, "checked").is_some()
    }

    /// Check or uncheck; a checked radio joins the tab order
    pub fn set_checked(&self, checked: bool) {
        self.doc.with_element(self.host, |e| {
            if checked {
                e.set_attr("checked", "");
            } else {
                e.remove_attr("checked");
            }
        });
        if let Some(wrapper) = self.wrapper() {
            self.doc.with_element(wrapper, |e| {
                e.tab_index = Some(if checked { 0 } else { -1 });
                e.set_attr("aria-checked", checked.to_string());
            });
        }
    }

    /// The focusable radio, once rendered
    pub fn wrapper(&self) -> Option<NodeId> {
        let shadow = self.doc.shadow_root(self.host)?;
        self.doc.tree().query_class(shadow, WRAPPER_CLASS)
    }

    pub fn focus(&self) -> bool {
        self.wrapper().is_some_and(|wrapper| self.doc.focus(wrapper))
    }
}

/// `my-radio-button-controller`
#[derive(Debug, Clone)]
pub struct RadioButtonController {
    doc: Document,
    host: NodeId,
}

impl RadioButtonController {
    pub const TAG: &'static str = "my-radio-button-controller";

    /// Mount a radio group. The preselected option (or the first one) is
    /// checked once the group has rendered.
    pub fn mount(
        doc: &Document,
        parent: NodeId,
        options: Vec<ChoiceOption>,
        preselected: Option<String>,
    ) -> DomResult<Self> {
        let host = doc.build(Self::TAG)
            .class("radio-manager")
            .attr("role", "radiogroup")
            .append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        doc.schedule_update(host, move |doc| {
            match Self::render(doc, shadow, &options) {
                Ok(labels) => Self::select_initial(&labels, preselected.as_deref()),
                Err(err) => tracing::warn!("Cannot render radio group: {}", err),
            }
        });
        doc.add_event_listener(host, EventType::KeyDown, move |doc, event| {
            Self::handle_key_down(doc, shadow, event);
        });
        doc.add_event_listener(shadow, EventType::Click, move |doc, event| {
            Self::handle_click(doc, shadow, event);
        });

        Ok(Self { doc: doc.clone(), host })
    }

    fn render(doc: &Document, shadow: NodeId, options: &[ChoiceOption]) -> DomResult<Vec<RadioButtonLabel>> {
        let group = doc.build("div").attr("role", "presentation").append_to(shadow)?;
        options.iter()
            .enumerate()
            .map(|(index, option)| RadioButtonLabel::mount(doc, group, option, index, options.len()))
            .collect()
    }

    fn select_initial(labels: &[RadioButtonLabel], preselected: Option<&str>) {
        let Some(first) = labels.first() else { return };
        let radio = match preselected {
            None => first,
            Some(id) => match labels.iter().find(|label| label.id() == id) {
                Some(label) => label,
                None => {
                    ConfigError::UnknownPreselectedOption { id: id.to_string() }.report();
                    first
                }
            },
        };
        radio.set_checked(true);
    }

    fn labels_in(doc: &Document, shadow: NodeId) -> Vec<RadioButtonLabel> {
        let hosts: Vec<NodeId> = {
            let tree = doc.tree();
            tree.descendants(shadow, false)
                .into_iter()
                .filter(|&id| tree.element(id).is_some_and(|e| e.tag == RadioButtonLabel::TAG))
                .collect()
        };
        hosts.into_iter().map(|host| RadioButtonLabel::from_host(doc, host)).collect()
    }

    fn switch(labels: &[RadioButtonLabel], radio: &RadioButtonLabel) {
        for label in labels {
            label.set_checked(false);
        }
        radio.set_checked(true);
    }

    fn handle_key_down(doc: &Document, shadow: NodeId, event: &mut Event) {
        let Some(key) = event.key().cloned() else { return };
        let labels = Self::labels_in(doc, shadow);
        let hosts: Vec<NodeId> = labels.iter().map(RadioButtonLabel::host).collect();
        let current = labels.iter().find(|label| label.is_checked()).map(RadioButtonLabel::host);

        let Some(&next) = next_item(&key, &hosts, current.as_ref()) else { return };
        event.prevent_default();
        if let Some(radio) = labels.iter().find(|label| label.host() == next) {
            Self::switch(&labels, radio);
            radio.focus();
        }
    }

    fn handle_click(doc: &Document, shadow: NodeId, event: &mut Event) {
        if event.mouse_button() != Some(MouseButton::Primary) {
            return;
        }
        let labels = Self::labels_in(doc, shadow);
        if let Some(radio) = labels.iter().find(|label| label.host() == event.target) {
            Self::switch(&labels, radio);
        }
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn labels(&self) -> Vec<RadioButtonLabel> {
        match self.doc.shadow_root(self.host) {
            Some(shadow) => Self::labels_in(&self.doc, shadow),
            None => Vec::new(),
        }
    }

    /// Id of the checked option
    pub fn selected_option(&self) -> Option<String> {
        self.labels().into_iter().find(RadioButtonLabel::is_checked).map(|label| label.id())
    }
}
