//! Transitions
//!
//! Completion of CSS-like transitions as a single-fire future.

use smol::future::{BoxedLocal, FutureExt};

use crate::events::EventType;
use crate::{Document, NodeId};

/// How a document reports the end of a started transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Transition end fires on the next event-loop turn
    #[default]
    Immediate,
    /// Transition end fires after `DocumentConfig::transition_duration`
    Timed,
    /// Transition end fires only when the host calls
    /// [`Document::finish_transitions`] or [`Document::fire_transition_end`]
    Manual,
}

/// Wait for `node` itself to finish a transition.
///
/// The listener is registered before this returns, so a transition started
/// right afterwards is never missed. Transition ends bubbling up from
/// descendants are ignored. If `node` never finishes a transition the
/// future stays pending forever.
pub fn transition_end(doc: &Document, node: NodeId) -> BoxedLocal<()> {
    let ended = doc.next_event(node, EventType::TransitionEnd);
    async move {
        ended.await;
    }
    .boxed_local()
}
