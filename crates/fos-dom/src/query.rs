//! Deep element queries
//!
//! Walks the light tree and every open shadow tree below a root, in
//! document order. Before a shadow host is entered, its pending render work
//! has to settle, so content rendered asynchronously is never missed. Each
//! call walks the tree afresh; nothing is cached between calls.
//!
//! A shadow tree is visited right after its host and before the host's
//! light children. Selectors never match across shadow boundaries: every
//! predicate sees one element at a time.

use crate::node::ElementData;
use crate::{Document, DomTree, NodeId};

/// How far a query descends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Enter every open shadow tree (after it settles)
    #[default]
    Deep,
    /// Stay in the rendering context of the root
    Shallow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collect {
    All,
    First,
}

async fn walk<F>(doc: &Document, root: NodeId, scope: Scope, predicate: &F, collect: Collect) -> Vec<NodeId>
where
    F: Fn(&DomTree, NodeId) -> bool + ?Sized,
{
    let mut found = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        let boundary = {
            let guard = doc.tree();
            let tree: &DomTree = &guard;
            let Some(node) = tree.get(id) else { continue };
            if node.is_element() && predicate(tree, id) {
                found.push(id);
                if collect == Collect::First {
                    return found;
                }
            }
            stack.extend(node.children.iter().rev().copied());
            match scope {
                Scope::Deep => tree.open_shadow_root(id).map(|shadow| (shadow, tree.update_handle(id))),
                Scope::Shallow => None,
            }
        };

        // Tree borrow is released before waiting: the render we wait for
        // mutates the tree.
        if let Some((shadow, handle)) = boundary {
            if let Some(handle) = handle {
                handle.settled().await;
            }
            stack.extend(doc.tree().children(shadow).iter().rev().copied());
        }
    }
    found
}

/// All elements below (and including) `root` matching `predicate`
pub async fn find_elements(
    doc: &Document,
    root: NodeId,
    scope: Scope,
    predicate: impl Fn(&DomTree, NodeId) -> bool,
) -> Vec<NodeId> {
    walk(doc, root, scope, &predicate, Collect::All).await
}

/// First matching element; stops walking at the first match
pub async fn find_first_element(
    doc: &Document,
    root: NodeId,
    scope: Scope,
    predicate: impl Fn(&DomTree, NodeId) -> bool,
) -> Option<NodeId> {
    walk(doc, root, scope, &predicate, Collect::First).await.pop()
}

/// Last matching element in document order
pub async fn find_last_element(
    doc: &Document,
    root: NodeId,
    scope: Scope,
    predicate: impl Fn(&DomTree, NodeId) -> bool,
) -> Option<NodeId> {
    find_elements(doc, root, scope, predicate).await.pop()
}

/// Elements with a non-negative explicit focus order.
///
/// Disabled elements are included: they are interactive but not focusable.
pub async fn find_interactive_elements(doc: &Document, root: NodeId, scope: Scope) -> Vec<NodeId> {
    find_elements(doc, root, scope, |tree, id| {
        tree.element(id).is_some_and(ElementData::is_interactive)
    })
    .await
}

fn has_class(class: &str) -> impl Fn(&DomTree, NodeId) -> bool + '_ {
    move |tree, id| tree.element(id).is_some_and(|e| e.has_class(class))
}

/// Like `querySelectorAll('.class')`, through every open shadow tree
pub async fn query_deep_all(doc: &Document, root: NodeId, class: &str) -> Vec<NodeId> {
    find_elements(doc, root, Scope::Deep, has_class(class)).await
}

/// Like `querySelector('.class')`, through every open shadow tree
pub async fn query_deep(doc: &Document, root: NodeId, class: &str) -> Option<NodeId> {
    find_first_element(doc, root, Scope::Deep, has_class(class)).await
}

pub async fn query_deep_last(doc: &Document, root: NodeId, class: &str) -> Option<NodeId> {
    find_last_element(doc, root, Scope::Deep, has_class(class)).await
}

/// The currently focused element as seen through the document.
///
/// Every shadow host on the way to the focused element also reports focus,
/// so this takes the last match in document order. With a closed shadow
/// root on the way, the closed host is the deepest visible match.
pub async fn focused_element(doc: &Document) -> Option<NodeId> {
    find_last_element(doc, NodeId::ROOT, Scope::Deep, |tree, id| tree.matches_focus(id)).await
}

/// All shadow hosts below `root`
pub async fn find_all_hosts(doc: &Document, root: NodeId) -> Vec<NodeId> {
    find_elements(doc, root, Scope::Deep, |tree, id| tree.shadow_root(id).is_some()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShadowRootMode;

    /// root > [div.a, my-host (shadow: div.a), div.a]
    fn layout(doc: &Document) -> (NodeId, NodeId, NodeId, NodeId) {
        let before = doc.build("div").class("a").append_to(doc.root()).unwrap();
        let host = doc.build("my-host").append_to(doc.root()).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inside = doc.build("div").class("a").append_to(shadow).unwrap();
        let after = doc.build("div").class("a").append_to(doc.root()).unwrap();
        (before, host, inside, after)
    }

    #[test]
    fn test_document_order_through_shadow() {
        let doc = Document::new();
        let (before, _, inside, after) = layout(&doc);

        let all = doc.block_on(query_deep_all(&doc, doc.root(), "a"));
        assert_eq!(all, vec![before, inside, after]);
        assert_eq!(doc.block_on(query_deep(&doc, doc.root(), "a")), Some(before));
        assert_eq!(doc.block_on(query_deep_last(&doc, doc.root(), "a")), Some(after));
    }

    #[test]
    fn test_shadow_before_light_children() {
        let doc = Document::new();
        let host = doc.build("my-host").append_to(doc.root()).unwrap();
        let light = doc.build("span").class("a").append_to(host).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inside = doc.build("span").class("a").append_to(shadow).unwrap();

        let all = doc.block_on(query_deep_all(&doc, doc.root(), "a"));
        assert_eq!(all, vec![inside, light]);
    }

    #[test]
    fn test_shallow_scope_skips_boundaries() {
        let doc = Document::new();
        let (before, host, _, after) = layout(&doc);

        let found = doc.block_on(find_elements(&doc, doc.root(), Scope::Shallow, |tree, id| {
            tree.element(id).is_some_and(|e| e.has_class("a"))
        }));
        assert_eq!(found, vec![before, after]);
        assert_eq!(doc.block_on(find_all_hosts(&doc, doc.root())), vec![host]);
    }

    #[test]
    fn test_waits_for_pending_render() {
        let doc = Document::new();
        let outer = doc.build("my-outer").append_to(doc.root()).unwrap();
        let outer_root = doc.attach_shadow(outer, ShadowRootMode::Open).unwrap();

        doc.schedule_update(outer, move |doc| {
            let inner = doc.build("my-inner").append_to(outer_root).unwrap();
            let inner_root = doc.attach_shadow(inner, ShadowRootMode::Open).unwrap();
            doc.schedule_update(inner, move |doc| {
                doc.build("div").class("late").tab_index(0).append_to(inner_root).unwrap();
            });
        });

        let late = doc.block_on(query_deep(&doc, doc.root(), "late"));
        assert!(late.is_some());
        let interactive = doc.block_on(find_interactive_elements(&doc, doc.root(), Scope::Deep));
        assert_eq!(interactive, vec![late.unwrap()]);
    }

    #[test]
    fn test_closed_roots_are_not_entered() {
        let doc = Document::new();
        let host = doc.build("my-host").append_to(doc.root()).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Closed).unwrap();
        doc.build("div").class("a").append_to(shadow).unwrap();

        assert!(doc.block_on(query_deep_all(&doc, doc.root(), "a")).is_empty());
    }

    #[test]
    fn test_focused_element_takes_last_match() {
        let doc = Document::new();
        let host = doc.build("my-host").append_to(doc.root()).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let button = doc.build("div").tab_index(0).append_to(shadow).unwrap();

        assert_eq!(doc.block_on(focused_element(&doc)), None);
        doc.focus(button);
        let matches = doc.block_on(find_elements(&doc, doc.root(), Scope::Deep, |tree, id| {
            tree.matches_focus(id)
        }));
        assert_eq!(matches, vec![host, button]);
        assert_eq!(doc.block_on(focused_element(&doc)), Some(button));
    }

    #[test]
    fn test_empty_result() {
        let doc = Document::new();
        assert!(doc.block_on(query_deep_all(&doc, doc.root(), "missing")).is_empty());
        assert_eq!(doc.block_on(query_deep(&doc, NodeId(42), "missing")), None);
    }
}
