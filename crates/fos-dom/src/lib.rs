//! fOS DOM - Document Object Model
//!
//! Arena DOM for encapsulated components: shadow roots with async
//! "settled" signals, composed event dispatch, focus state and a deep
//! query engine that waits for nested components before entering them.

mod node;
mod tree;
mod shadow;
mod events;
mod document;
mod transition;
pub mod query;

pub use node::{Node, NodeData, ElementData};
pub use tree::DomTree;
pub use shadow::{ShadowRootMode, UpdateHandle};
pub use events::{Event, EventData, EventDetail, EventType, Key, KeyModifiers, ListenerId, MouseButton};
pub use document::{Document, DocumentConfig, ElementBuilder};
pub use transition::{transition_end, TransitionPolicy};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
///
/// These signal programming errors (stale IDs, impossible tree shapes),
/// never expected runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Hierarchy request error: {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0:?} already hosts a shadow root")]
    ShadowAlreadyAttached(NodeId),
}
