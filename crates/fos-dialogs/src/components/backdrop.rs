//! Modal background
//!
//! Covers the page behind a dialog. The grey background fades in on a
//! later update (unless `no_fade_in`) and fades out as the exit animation.

use fos_dom::{Document, DomResult, EventType, NodeId, ShadowRootMode};
use smol::future::BoxedLocal;

use crate::animation::{reverse_transition, ExitAnimation, ExitResult};
use crate::BACKGROUND_CLASS;

pub(crate) const MODAL_CLASS: &str = "modal";
pub(crate) const GREY_BACKGROUND_CLASS: &str = "grey-background";

/// `my-modal-background`
#[derive(Debug, Clone)]
pub struct ModalBackground {
    doc: Document,
    host: NodeId,
}

impl ModalBackground {
    pub const TAG: &'static str = "my-modal-background";

    /// Mount a background under `parent`; dialog content goes into its light
    /// children.
    pub fn mount(doc: &Document, parent: NodeId, no_fade_in: bool) -> DomResult<Self> {
        let host = doc.build(Self::TAG).class(BACKGROUND_CLASS).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;
        if no_fade_in {
            doc.set_attr(host, "nofadein", "");
        }

        // Clicks never leak to the page behind the dialog
        doc.add_event_listener(host, EventType::Click, |_, event| event.stop_propagation());
        doc.add_event_listener(host, EventType::custom("close"), move |doc, _| {
            let fading = Self::fade_out(doc, host);
            doc.spawn(async move {
                fading.await;
            });
        });

        doc.schedule_update(host, move |doc| {
            let modal = doc.build("div").class(MODAL_CLASS).attr("aria-hidden", "true");
            let modal = if no_fade_in { modal.class(GREY_BACKGROUND_CLASS) } else { modal };
            match modal.append_to(shadow) {
                Ok(modal) if !no_fade_in => {
                    doc.schedule_update(host, move |doc| doc.set_class(modal, GREY_BACKGROUND_CLASS, true));
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("Cannot render modal background: {}", err),
            }
        });

        Ok(Self { doc: doc.clone(), host })
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// The animated `.modal` element, once rendered
    pub fn modal(&self) -> Option<NodeId> {
        let shadow = self.doc.shadow_root(self.host)?;
        self.doc.tree().query_class(shadow, MODAL_CLASS)
    }

    /// Background color currently shown
    pub fn is_grey(&self) -> bool {
        self.modal().is_some_and(|modal| self.doc.has_class(modal, GREY_BACKGROUND_CLASS))
    }

    fn fade_out(doc: &Document, host: NodeId) -> BoxedLocal<ExitResult> {
        reverse_transition(doc, host, MODAL_CLASS, ExitResult::FadedOut, |doc, modal| {
            doc.set_class(modal, GREY_BACKGROUND_CLASS, false);
        })
    }
}

impl ExitAnimation for ModalBackground {
    fn play_exit(&self) -> BoxedLocal<ExitResult> {
        Self::fade_out(&self.doc, self.host)
    }
}
