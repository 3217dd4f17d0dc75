//! Dialog container
//!
//! Centered dialog box with heading, content and footer sections. It slides
//! in from a configurable origin and slides out towards a configurable
//! target as its exit animation.

use fos_dom::{Document, DomResult, NodeId, ShadowRootMode};
use smol::future::BoxedLocal;

use crate::animation::{reverse_transition, ExitAnimation, ExitResult};
use crate::DIALOG_CONTAINER_CLASS;

const DIALOG_CLASS: &str = "dialog";
const SLIDE_IN_CLASS: &str = "slide-in";
const NO_SCALE_CLASS: &str = "noscale";

/// Where the dialog slides in from (or out to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideOrigin {
    Top,
    Bottom,
    Left,
    Right,
    /// The click point that opened the dialog
    Click,
    #[default]
    Center,
}

impl SlideOrigin {
    /// CSS `translate` value for this origin, `None` for the center
    pub fn translate(self, point: ClickPoint) -> Option<String> {
        let (x, y) = match self {
            Self::Top => ("0".to_string(), "-100vh".to_string()),
            Self::Bottom => ("0".to_string(), "100vh".to_string()),
            Self::Left => ("-100vw".to_string(), "0".to_string()),
            Self::Right => ("100vw".to_string(), "0".to_string()),
            Self::Click => (
                format!("calc(-50vw + {}px)", point.x),
                format!("calc(-50vh + {}px)", point.y),
            ),
            Self::Center => return None,
        };
        Some(format!("translate: {} {}", x, y))
    }
}

/// Client coordinates of the click that opened a dialog
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickPoint {
    pub x: f32,
    pub y: f32,
}

/// Container animation options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerOptions {
    pub slide_in_origin: SlideOrigin,
    pub slide_out_target: SlideOrigin,
    pub click_point: ClickPoint,
    pub no_scale_in: bool,
    pub no_scale_out: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            slide_in_origin: SlideOrigin::Center,
            slide_out_target: SlideOrigin::Click,
            click_point: ClickPoint::default(),
            no_scale_in: false,
            no_scale_out: false,
        }
    }
}

/// `my-dialog-container`
#[derive(Debug, Clone)]
pub struct DialogContainer {
    doc: Document,
    host: NodeId,
    options: ContainerOptions,
}

impl DialogContainer {
    pub const TAG: &'static str = "my-dialog-container";

    pub fn mount(doc: &Document, parent: NodeId, options: ContainerOptions) -> DomResult<Self> {
        let host = doc.build(Self::TAG).class(DIALOG_CONTAINER_CLASS).append_to(parent)?;
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open)?;

        doc.schedule_update(host, move |doc| {
            if let Err(err) = Self::render(doc, host, shadow, options) {
                tracing::warn!("Cannot render dialog container: {}", err);
            }
        });

        Ok(Self { doc: doc.clone(), host, options })
    }

    fn render(doc: &Document, host: NodeId, shadow: NodeId, options: ContainerOptions) -> DomResult<()> {
        let container = doc.build("div").attr("id", "dialog").class("container").append_to(shadow)?;
        doc.build("div").class("center-vertically-box").append_to(container)?;

        let mut dialog = doc.build("div")
            .class(DIALOG_CLASS)
            .class("dialog-size")
            .attr("role", "dialog");
        if options.no_scale_in {
            dialog = dialog.class(NO_SCALE_CLASS);
        }
        if let Some(style) = options.slide_in_origin.translate(options.click_point) {
            dialog = dialog.attr("style", style);
        }
        let dialog = dialog.append_to(container)?;

        doc.build("div").class("heading-container").append_to(dialog)?;
        doc.build("span").class("content-container").append_to(dialog)?;
        doc.build("div").class("footer-container").append_to(dialog)?;
        doc.build("div").class("center-vertically-box").append_to(container)?;

        doc.schedule_update(host, move |doc| doc.set_class(dialog, SLIDE_IN_CLASS, true));
        Ok(())
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    /// The animated `.dialog` box, once rendered
    pub fn dialog(&self) -> Option<NodeId> {
        let shadow = self.doc.shadow_root(self.host)?;
        self.doc.tree().query_class(shadow, DIALOG_CLASS)
    }

    pub fn is_slid_in(&self) -> bool {
        self.dialog().is_some_and(|dialog| self.doc.has_class(dialog, SLIDE_IN_CLASS))
    }
}

impl ExitAnimation for DialogContainer {
    fn play_exit(&self) -> BoxedLocal<ExitResult> {
        let options = self.options;
        reverse_transition(&self.doc, self.host, DIALOG_CLASS, ExitResult::SlidOut, move |doc, dialog| {
            match options.slide_out_target.translate(options.click_point) {
                Some(style) => doc.set_attr(dialog, "style", style),
                None => {
                    doc.with_element(dialog, |e| e.remove_attr("style"));
                }
            }
            doc.set_class(dialog, NO_SCALE_CLASS, options.no_scale_out);
            doc.set_class(dialog, SLIDE_IN_CLASS, false);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let point = ClickPoint { x: 10.0, y: 20.0 };
        assert_eq!(SlideOrigin::Center.translate(point), None);
        assert_eq!(SlideOrigin::Top.translate(point).as_deref(), Some("translate: 0 -100vh"));
        assert_eq!(
            SlideOrigin::Click.translate(point).as_deref(),
            Some("translate: calc(-50vw + 10px) calc(-50vh + 20px)")
        );
    }

    #[test]
    fn test_slides_in_and_out() {
        let doc = Document::new();
        let options = ContainerOptions {
            click_point: ClickPoint { x: 5.0, y: 7.0 },
            no_scale_out: true,
            ..Default::default()
        };
        let container = DialogContainer::mount(&doc, doc.root(), options).unwrap();

        doc.block_on(doc.idle());
        assert!(container.is_slid_in());
        let dialog = container.dialog().unwrap();
        assert_eq!(doc.attr(dialog, "style"), None);

        assert_eq!(doc.block_on(container.play_exit()), ExitResult::SlidOut);
        assert!(!container.is_slid_in());
        assert!(doc.has_class(dialog, NO_SCALE_CLASS));
        assert_eq!(
            doc.attr(dialog, "style").as_deref(),
            Some("translate: calc(-50vw + 5px) calc(-50vh + 7px)")
        );
    }
}
