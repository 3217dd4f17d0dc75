//! DOM Node
//!
//! Nodes live in the [`DomTree`](crate::DomTree) arena and reference each
//! other by [`NodeId`]. Shadow roots are ordinary nodes whose parent link
//! is replaced by a `host` link, so the light tree and every shadow tree
//! share one arena.

use crate::shadow::{ShadowRootMode, UpdateHandle};
use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or a shadow root)
    pub parent: NodeId,
    /// Children in tree order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a shadow root node for `host`
    pub fn shadow_root(host: NodeId, mode: ShadowRootMode) -> Self {
        Self::with_data(NodeData::ShadowRoot { host, mode })
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            children: Vec::new(),
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot { .. })
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Root of an encapsulated subtree owned by `host`
    ShadowRoot { host: NodeId, mode: ShadowRootMode },
}

/// Element-specific data
#[derive(Debug, Default)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Class list
    pub classes: Vec<String>,
    /// Explicit focus order; `None` means not focusable
    pub tab_index: Option<i32>,
    /// Disabled controls are skipped by sequential navigation
    pub disabled: bool,
    /// Shadow root hosted by this element
    pub shadow_root: Option<NodeId>,
    /// Pending-render signal, present on every shadow host
    pub update: Option<UpdateHandle>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            attr.1 = value;
            return;
        }
        self.attrs.push((name.to_string(), value));
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class (no duplicates)
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Add or remove a class
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Has a non-negative explicit focus order
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.tab_index.is_some_and(|i| i >= 0)
    }

    /// Reachable by keyboard: interactive and not disabled
    #[inline]
    pub fn is_focusable(&self) -> bool {
        self.is_interactive() && !self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attrs() {
        let mut el = ElementData::new("DIV");
        assert_eq!(el.tag, "div");

        el.set_attr("id", "first");
        el.set_attr("id", "second");
        assert_eq!(el.id(), Some("second"));
        assert_eq!(el.attrs.len(), 1);

        assert_eq!(el.remove_attr("id"), Some("second".to_string()));
        assert_eq!(el.id(), None);
    }

    #[test]
    fn test_class_list() {
        let mut el = ElementData::new("div");
        el.add_class("modal");
        el.add_class("modal");
        assert_eq!(el.classes.len(), 1);

        el.toggle_class("grey-background", true);
        assert!(el.has_class("grey-background"));
        el.toggle_class("grey-background", false);
        assert!(!el.has_class("grey-background"));
    }

    #[test]
    fn test_focusable() {
        let mut el = ElementData::new("div");
        assert!(!el.is_interactive());

        el.tab_index = Some(-1);
        assert!(!el.is_interactive());

        el.tab_index = Some(0);
        assert!(el.is_focusable());

        el.disabled = true;
        assert!(el.is_interactive());
        assert!(!el.is_focusable());
    }
}
