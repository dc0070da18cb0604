#![forbid(unsafe_code)]

//! Polymorphic element input: a node handle or a selector.
//!
//! Focus and Hover both accept either form. Selectors resolve once, at
//! highlight/attach time, through [`Target::resolve`].

use std::fmt;

use crate::{NodeId, Page};

/// An element given directly or by selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Node(NodeId),
    Selector(String),
}

/// A selector matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("no element matches selector {selector:?}")]
    NotFound { selector: String },
}

impl Target {
    /// Resolve against the page's current document.
    pub fn resolve<P: Page>(&self, page: &P) -> Result<NodeId, TargetError> {
        match self {
            Self::Node(node) => Ok(*node),
            Self::Selector(selector) => page.query_selector(selector).ok_or_else(|| {
                tracing::debug!(selector = %selector, "target selector matched nothing");
                TargetError::NotFound {
                    selector: selector.clone(),
                }
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => write!(f, "node#{}", node.raw()),
            Self::Selector(selector) => f.write_str(selector),
        }
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}
