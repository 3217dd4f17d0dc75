//! Dialog building blocks
//!
//! Each component is a shadow host that renders its content on a later
//! turn of the event loop, like any other asynchronously updating custom
//! element. Handles are cheap to clone and only refer to the document by
//! node id.

mod backdrop;
mod container;
mod button;
mod validated_input;
mod radio;

pub use backdrop::ModalBackground;
pub use container::{ClickPoint, ContainerOptions, DialogContainer, SlideOrigin};
pub use button::DialogButton;
pub use validated_input::ValidatedInput;
pub use radio::{ChoiceOption, RadioButtonController, RadioButtonLabel};
