//! Validated input
//!
//! Single-line text input with an inline validation message below it.

use fos_dom::{Document, DomResult, NodeId, ShadowRootMode};

const INPUT_CLASS: &str = "input-element";
const UNDERLINE_CLASS: &str = "underline--blue";
const VALIDATION_TEXT_CLASS: &str = "validation-text";
const RED_LINE_CLASS: &str = "red-line";

/// `my-validated-input`
#[derive(Debug, Clone)]
pub struct ValidatedInput {
    doc: Document,
    host: NodeId,
    validation_text: String,
}

impl ValidatedInput {
    pub const TAG: &'static str = "my-validated-input";

    pub fn mount(doc: &Document, parent: NodeId, value: &str, validation_text: &str) -> DomResult<Self> {
        let host = doc.build(Self::TAG).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        let value = value.to_string();
        doc.schedule_update(host, move |doc| {
            if let Err(err) = Self::render(doc, shadow, &value) {
                tracing::warn!("Cannot render validated input: {}", err);
            }
        });

        Ok(Self {
            doc: doc.clone(),
            host,
            validation_text: validation_text.to_string(),
        })
    }

    fn render(doc: &Document, shadow: NodeId, value: &str) -> DomResult<()> {
        let bx = doc.build("div").class("box").class("box--inline").append_to(shadow)?;
        let content = doc.build("div").class("content-flex").append_to(bx)?;
        let input_container = doc.build("div").class("input-container").append_to(content)?;
        doc.build("input")
            .attr("id", "input")
            .class(INPUT_CLASS)
            .attr("type", "text")
            .attr("value", value)
            .attr("autocomplete", "off")
            .tab_index(0)
            .append_to(input_container)?;
        doc.build("div").class("underline").append_to(content)?;
        doc.build("div").class("underline").class(UNDERLINE_CLASS).append_to(content)?;

        let validation = doc.build("div").class("validation-container").append_to(bx)?;
        doc.build("div").class(VALIDATION_TEXT_CLASS).append_to(validation)?;
        Ok(())
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    fn part(&self, class: &str) -> Option<NodeId> {
        let shadow = self.doc.shadow_root(self.host)?;
        self.doc.tree().query_class(shadow, class)
    }

    /// The `<input>` element, once rendered
    pub fn input_element(&self) -> Option<NodeId> {
        self.part(INPUT_CLASS)
    }

    /// Current (untrimmed) value
    pub fn value(&self) -> String {
        self.input_element()
            .and_then(|input| self.doc.attr(input, "value"))
            .unwrap_or_default()
    }

    /// Replace the value, as if typed by the user
    pub fn set_value(&self, value: &str) {
        if let Some(input) = self.input_element() {
            self.doc.set_attr(input, "value", value);
        }
    }

    /// Show the validation text and color the underline; does nothing if
    /// the message is already shown.
    pub fn show_validation_message(&self) {
        let Some(message) = self.part(VALIDATION_TEXT_CLASS) else { return };
        if !self.doc.text_content(message).is_empty() {
            return;
        }
        if let Err(err) = self.doc.set_text(message, &self.validation_text) {
            tracing::warn!("Cannot show validation message: {}", err);
        }
        if let Some(underline) = self.part(UNDERLINE_CLASS) {
            self.doc.set_class(underline, RED_LINE_CLASS, true);
        }
    }

    pub fn remove_validation_message(&self) {
        if let Some(message) = self.part(VALIDATION_TEXT_CLASS) {
            if let Err(err) = self.doc.set_text(message, "") {
                tracing::warn!("Cannot remove validation message: {}", err);
            }
        }
        if let Some(underline) = self.part(UNDERLINE_CLASS) {
            self.doc.set_class(underline, RED_LINE_CLASS, false);
        }
    }

    /// Validation text currently shown (empty if none)
    pub fn validation_message(&self) -> String {
        self.part(VALIDATION_TEXT_CLASS)
            .map(|message| self.doc.text_content(message))
            .unwrap_or_default()
    }

    pub fn has_error_underline(&self) -> bool {
        self.part(UNDERLINE_CLASS)
            .is_some_and(|underline| self.doc.has_class(underline, RED_LINE_CLASS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_idempotent() {
        let doc = Document::new();
        let input = ValidatedInput::mount(&doc, doc.root(), "draft", "required").unwrap();
        doc.block_on(doc.idle());
        assert_eq!(input.value(), "draft");

        input.show_validation_message();
        input.show_validation_message();
        assert_eq!(input.validation_message(), "required");
        assert!(input.has_error_underline());

        input.remove_validation_message();
        assert_eq!(input.validation_message(), "");
        assert!(!input.has_error_underline());
    }

    #[test]
    fn test_set_value() {
        let doc = Document::new();
        let input = ValidatedInput::mount(&doc, doc.root(), "", "required").unwrap();
        doc.block_on(doc.idle());

        input.set_value("  name ");
        assert_eq!(input.value(), "  name ");
    }
}
