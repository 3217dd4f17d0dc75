//! DOM Tree (arena-based allocation)
//!
//! One arena holds the document and every shadow tree. Walking up from a
//! node stops at its tree root; the "composed" helpers additionally hop
//! from a shadow root to its host.

use crate::node::{ElementData, Node, NodeData};
use crate::shadow::{ShadowRootMode, UpdateHandle};
use crate::{DomError, DomResult, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// Focused element (NONE if nothing is focused)
    focused: NodeId,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            focused: NodeId::NONE,
        }
    }

    /// Document root
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes ever allocated (removed nodes stay in the arena)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Element data of `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::text(text))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`, moving it if it is already attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        let invalid = parent_node.as_text().is_some()
            || child_node.is_shadow_root()
            || matches!(child_node.data, NodeData::Document)
            || self.contains(child, parent);
        if invalid {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        self.nodes[child.index()].parent = parent;
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.nodes[id.index()].parent;
        if parent.is_valid() {
            self.nodes[parent.index()].children.retain(|&c| c != id);
            self.nodes[id.index()].parent = NodeId::NONE;
        }
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        if self.focused.is_valid() && self.contains(id, self.focused) {
            self.focused = NodeId::NONE;
        }
        self.detach(id);
        Ok(())
    }

    /// Attach a shadow root to `host`; the host also gets an [`UpdateHandle`]
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        match self.node(host)?.as_element() {
            None => return Err(DomError::NotAnElement(host)),
            Some(el) if el.shadow_root.is_some() => return Err(DomError::ShadowAlreadyAttached(host)),
            Some(_) => {}
        }

        let root = self.push(Node::shadow_root(host, mode));
        if let Some(el) = self.element_mut(host) {
            el.shadow_root = Some(root);
            el.update = Some(UpdateHandle::new());
        }
        Ok(root)
    }

    /// Shadow root of `host`, regardless of mode
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.shadow_root
    }

    /// Shadow root of `host` if it is open
    pub fn open_shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.shadow_root(host)?;
        match self.get(root)?.data {
            NodeData::ShadowRoot { mode: ShadowRootMode::Open, .. } => Some(root),
            _ => None,
        }
    }

    /// Host of a shadow root
    pub fn host_of(&self, id: NodeId) -> Option<NodeId> {
        match self.get(id)?.data {
            NodeData::ShadowRoot { host, .. } => Some(host),
            _ => None,
        }
    }

    /// Update signal of a shadow host
    pub fn update_handle(&self, host: NodeId) -> Option<UpdateHandle> {
        self.element(host)?.update.clone()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Children in tree order (empty for unknown IDs)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent, or the host when `id` is a shadow root
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).or_else(|| self.host_of(id))
    }

    /// Root of the tree `id` lives in (document, shadow root or detached node)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Reachable from the document root through parents and hosts
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Shadow-including inclusive ancestor check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.composed_parent(id);
        }
        false
    }

    /// Retarget `target` for a listener on `against`: climb out of shadow
    /// trees that `against` is not part of.
    pub fn retarget(&self, target: NodeId, against: NodeId) -> NodeId {
        let mut current = target;
        loop {
            let root = self.root_of(current);
            match self.host_of(root) {
                Some(host) if !self.contains(root, against) => current = host,
                _ => return current,
            }
        }
    }

    /// Propagation path from `target` upward. Non-composed paths stop at
    /// the first shadow root.
    pub fn event_path(&self, target: NodeId, composed: bool) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            path.push(id);
            current = match self.parent(id) {
                Some(parent) => Some(parent),
                None if composed => self.host_of(id),
                None => None,
            };
        }
        path
    }

    /// Currently focused element
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.is_valid().then_some(self.focused)
    }

    /// Focus an element. Only connected, enabled elements with a focus
    /// order (any `tab_index`) accept focus.
    pub fn set_focus(&mut self, id: NodeId) -> bool {
        let accepts = self.element(id)
            .is_some_and(|el| el.tab_index.is_some() && !el.disabled);
        if !accepts || !self.is_connected(id) {
            return false;
        }
        self.focused = id;
        true
    }

    /// Clear focus
    pub fn blur(&mut self) {
        self.focused = NodeId::NONE;
    }

    /// `:focus`-like state: the focused element itself, and every shadow
    /// host whose shadow tree contains it.
    pub fn matches_focus(&self, id: NodeId) -> bool {
        let Some(focused) = self.focused() else {
            return false;
        };
        if focused == id {
            return true;
        }
        self.shadow_root(id)
            .is_some_and(|root| self.contains(root, focused))
    }

    /// Concatenated text of the light subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id, false) {
            if let Some(text) = self.get(node).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Pre-order walk starting at `root` (inclusive). With `deep`, every
    /// shadow tree is visited right after its host, before the host's
    /// light children.
    pub fn descendants(&self, root: NodeId, deep: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
            if deep {
                if let Some(shadow) = node.as_element().and_then(|e| e.shadow_root) {
                    stack.extend(self.children(shadow).iter().rev().copied());
                }
            }
        }
        out
    }

    /// First element below `scope` with `class`, within one rendering context
    pub fn query_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope, false)
            .into_iter()
            .skip(1)
            .find(|&id| self.element(id).is_some_and(|e| e.has_class(class)))
    }

    /// All elements below `scope` with `class`, within one rendering context
    pub fn query_class_all(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope, false)
            .into_iter()
            .skip(1)
            .filter(|&id| self.element(id).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// Default Tab order of the document: positive `tab_index` ascending,
    /// then `tab_index == 0` in composed tree order.
    pub fn sequential_focus_order(&self) -> Vec<NodeId> {
        let focusable: Vec<(NodeId, i32)> = self.descendants(NodeId::ROOT, true)
            .into_iter()
            .filter_map(|id| {
                let el = self.element(id)?;
                el.is_focusable().then(|| (id, el.tab_index.unwrap_or(0)))
            })
            .collect();

        let mut positive: Vec<(NodeId, i32)> = focusable.iter()
            .copied()
            .filter(|&(_, index)| index > 0)
            .collect();
        positive.sort_by_key(|&(_, index)| index);

        positive.into_iter()
            .chain(focusable.into_iter().filter(|&(_, index)| index == 0))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focusable(tree: &mut DomTree, parent: NodeId) -> NodeId {
        let id = tree.create_element("div");
        tree.element_mut(id).unwrap().tab_index = Some(0);
        tree.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_append_and_remove() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        assert_eq!(tree.children(div), &[span]);
        assert_eq!(tree.parent(span), Some(div));
        assert!(tree.is_connected(span));

        tree.remove(div).unwrap();
        assert!(!tree.is_connected(span));
        assert_eq!(tree.children(tree.root()), &[] as &[NodeId]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        let err = tree.append_child(inner, outer).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: inner, child: outer });
        assert!(matches!(tree.append_child(outer, NodeId(99)), Err(DomError::NotFound(_))));
    }

    #[test]
    fn test_attach_shadow_once() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-widget");
        let root = tree.attach_shadow(host, ShadowRootMode::Open).unwrap();

        assert_eq!(tree.host_of(root), Some(host));
        assert_eq!(tree.open_shadow_root(host), Some(root));
        assert!(tree.update_handle(host).is_some());
        assert_eq!(
            tree.attach_shadow(host, ShadowRootMode::Open),
            Err(DomError::ShadowAlreadyAttached(host))
        );

        let closed_host = tree.create_element("my-widget");
        tree.attach_shadow(closed_host, ShadowRootMode::Closed).unwrap();
        assert!(tree.shadow_root(closed_host).is_some());
        assert_eq!(tree.open_shadow_root(closed_host), None);
    }

    #[test]
    fn test_event_path_and_retarget() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-widget");
        tree.append_child(tree.root(), host).unwrap();
        let shadow = tree.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = tree.create_element("div");
        tree.append_child(shadow, inner).unwrap();

        assert_eq!(tree.event_path(inner, true), vec![inner, shadow, host, NodeId::ROOT]);
        assert_eq!(tree.event_path(inner, false), vec![inner, shadow]);

        assert_eq!(tree.retarget(inner, host), host);
        assert_eq!(tree.retarget(inner, NodeId::ROOT), host);
        assert_eq!(tree.retarget(inner, shadow), inner);
        assert_eq!(tree.retarget(inner, inner), inner);
    }

    #[test]
    fn test_focus_matches_hosts() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-widget");
        tree.append_child(tree.root(), host).unwrap();
        let shadow = tree.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let button = focusable(&mut tree, shadow);
        let plain = tree.create_element("div");
        tree.append_child(tree.root(), plain).unwrap();

        assert!(!tree.set_focus(plain));
        assert!(tree.set_focus(button));
        assert!(tree.matches_focus(button));
        assert!(tree.matches_focus(host));
        assert!(!tree.matches_focus(plain));

        tree.remove(host).unwrap();
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn test_sequential_focus_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = focusable(&mut tree, root);
        let host = tree.create_element("my-widget");
        tree.append_child(root, host).unwrap();
        let shadow = tree.attach_shadow(host, ShadowRootMode::Closed).unwrap();
        let inner = focusable(&mut tree, shadow);
        let disabled = focusable(&mut tree, root);
        tree.element_mut(disabled).unwrap().disabled = true;
        let first = focusable(&mut tree, root);
        tree.element_mut(first).unwrap().tab_index = Some(2);

        assert_eq!(tree.sequential_focus_order(), vec![first, a, inner]);
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_text(div, "hello").unwrap();
        assert_eq!(tree.text_content(div), "hello");

        tree.set_text(div, "").unwrap();
        assert_eq!(tree.text_content(div), "");
        assert!(tree.children(div).is_empty());
    }

    #[test]
    fn test_query_class_stays_in_scope() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-widget");
        let shadow = tree.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let modal = tree.create_element("div");
        tree.element_mut(modal).unwrap().add_class("modal");
        tree.append_child(shadow, modal).unwrap();

        let outer = tree.create_element("div");
        tree.append_child(outer, host).unwrap();

        assert_eq!(tree.query_class(shadow, "modal"), Some(modal));
        assert_eq!(tree.query_class(outer, "modal"), None);
        assert_eq!(tree.query_class_all(shadow, "modal"), vec![modal]);
    }
}
