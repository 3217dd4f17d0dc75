//! Dialog button

use fos_dom::{Document, DomResult, EventType, Key, NodeId, ShadowRootMode};

const BUTTON_CLASS: &str = "button";

/// `my-dialog-button`: a focusable button-like element with a label
#[derive(Debug, Clone)]
pub struct DialogButton {
    doc: Document,
    host: NodeId,
}

impl DialogButton {
    pub const TAG: &'static str = "my-dialog-button";

    pub fn mount(doc: &Document, parent: NodeId, label: &str) -> DomResult<Self> {
        let host = doc.build(Self::TAG).attr("labelText", label).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        let label = label.to_string();
        doc.schedule_update(host, move |doc| {
            if let Err(err) = Self::render(doc, shadow, &label) {
                tracing::warn!("Cannot render dialog button: {}", err);
            }
        });

        Ok(Self { doc: doc.clone(), host })
    }

    fn render(doc: &Document, shadow: NodeId, label: &str) -> DomResult<()> {
        let button = doc.build("div")
            .class(BUTTON_CLASS)
            .attr("part", "button")
            .tab_index(0)
            .append_to(shadow)?;
        doc.build("div").class("highlight").attr("part", "highlight").append_to(button)?;
        doc.build("div").class("focused").append_to(button)?;
        doc.build("span").class("text").attr("part", "text").text(label).append_to(button)?;

        // Enter acts like a click
        doc.add_event_listener(button, EventType::KeyDown, |doc, event| {
            if event.key() == Some(&Key::Enter) {
                event.prevent_default();
                if let Some(button) = event.current_target {
                    doc.click(button);
                }
            }
        });
        Ok(())
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// The focusable control, once rendered
    pub fn button(&self) -> Option<NodeId> {
        let shadow = self.doc.shadow_root(self.host)?;
        self.doc.tree().query_class(shadow, BUTTON_CLASS)
    }

    pub fn label(&self) -> String {
        self.doc.attr(self.host, "labelText").unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::KeyModifiers;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_enter_clicks_button() {
        let doc = Document::new();
        let button = DialogButton::mount(&doc, doc.root(), "ok").unwrap();
        doc.block_on(doc.idle());
        assert_eq!(button.label(), "ok");

        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        doc.add_event_listener(button.host(), EventType::Click, move |_, event| {
            assert_eq!(event.current_target, Some(event.target));
            c.set(c.get() + 1);
        });

        assert!(doc.focus(button.button().unwrap()));
        let event = doc.press_key(Key::Enter, KeyModifiers::NONE);
        assert!(event.default_prevented());
        doc.press_key(Key::Character('x'), KeyModifiers::NONE);
        assert_eq!(clicks.get(), 1);
    }
}
