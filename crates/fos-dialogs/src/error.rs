//! Configuration errors
//!
//! None of these abort anything: they are logged and the component falls
//! back to a degraded but working state.

/// Component misconfiguration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Cannot find focus borders! Expected 2 focusable elements with class \"js-focus-border\", found {found}. Unable to manage focus."
    )]
    MissingFocusBorders { found: usize },

    #[error("Cannot preselect option \"{id}\": no option with this id. Selecting the first option instead.")]
    UnknownPreselectedOption { id: String },
}

impl ConfigError {
    /// Log the error and hand it back
    pub(crate) fn report(self) -> Self {
        tracing::error!("{}", self);
        self
    }
}
