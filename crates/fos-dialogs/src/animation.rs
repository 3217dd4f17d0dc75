//! Exit animations
//!
//! Visual collaborators of a dialog play a reverse transition when the
//! dialog closes and report a fixed result once their own element has
//! finished transitioning.

use std::fmt;

use fos_dom::{transition_end, Document, NodeId};
use smol::future::{BoxedLocal, FutureExt};

/// Result reported by a finished exit animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitResult {
    /// Dialog container slid out
    SlidOut,
    /// Modal background faded out
    FadedOut,
}

impl ExitResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlidOut => "slided out!",
            Self::FadedOut => "fadedOut",
        }
    }
}

impl fmt::Display for ExitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component that can animate itself away.
///
/// `play_exit` starts the reverse transition once the returned future is
/// first polled and resolves exactly once, when the animated element itself
/// reports the end of its transition. There is no timeout: a transition
/// that never ends leaves the future pending.
pub trait ExitAnimation {
    fn play_exit(&self) -> BoxedLocal<ExitResult>;
}

/// Wait for `host` to settle, find `.element_class` in its shadow root,
/// apply `reverse` to it and wait for that element's transition end.
pub(crate) fn reverse_transition(
    doc: &Document,
    host: NodeId,
    element_class: &'static str,
    result: ExitResult,
    reverse: impl FnOnce(&Document, NodeId) + 'static,
) -> BoxedLocal<ExitResult> {
    let doc = doc.clone();
    async move {
        if let Some(handle) = doc.update_handle(host) {
            handle.settled().await;
        }
        let element = doc.shadow_root(host)
            .and_then(|root| doc.tree().query_class(root, element_class));
        match element {
            Some(element) => {
                let ended = transition_end(&doc, element);
                reverse(&doc, element);
                doc.start_transition(element);
                ended.await;
            }
            None => tracing::warn!("{:?} has no .{} to animate", host, element_class),
        }
        tracing::debug!("Exit animation finished: {}", result);
        result
    }
    .boxed_local()
}
