#![forbid(unsafe_code)]

use roller_backend::TargetError;
use roller_core::css::CssError;

/// Errors raised by widget operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// A selector given to Focus or Hover matched nothing.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// A style table could not be serialized.
    #[error(transparent)]
    Css(#[from] CssError),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
