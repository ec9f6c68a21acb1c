//! Routing types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the page number is appended to a taxonomy term URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorPolicy {
    /// Append the page number directly: `/category/news/` + `2`.
    /// A URI without a trailing slash yields `/category/news2`.
    #[default]
    Verbatim,
    /// Insert `/` before the page number unless the URI already ends with one
    EnsureSlash,
}

/// Describes how the paths of an archive collection are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// The default blog collection: `/`, `/blog/2`, ...
    Root,
    /// Any other post-type collection: `/{name}`, `/{name}/2`, ...
    Namespaced(String),
    /// A taxonomy term listing rooted at the term's URI
    Term {
        /// The term URI, used verbatim for page 1
        uri: String,
        /// Separator policy for pages after the first
        separator: SeparatorPolicy,
    },
}

impl RouteKind {
    /// Create a namespaced route kind
    pub fn namespaced(name: impl Into<String>) -> Self {
        Self::Namespaced(name.into())
    }

    /// Create a term route kind with the verbatim separator policy
    pub fn term(uri: impl Into<String>) -> Self {
        Self::Term {
            uri: uri.into(),
            separator: SeparatorPolicy::Verbatim,
        }
    }

    /// Create a term route kind with an explicit separator policy
    pub fn term_with(uri: impl Into<String>, separator: SeparatorPolicy) -> Self {
        Self::Term {
            uri: uri.into(),
            separator,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Root => write!(f, "root"),
            RouteKind::Namespaced(name) => write!(f, "ns:{name}"),
            RouteKind::Term { uri, .. } => write!(f, "term:{uri}"),
        }
    }
}

/// Parses the `Display` form: `root`, `ns:NAME` or `term:URI`.
///
/// Term kinds parse with the verbatim separator policy.
impl FromStr for RouteKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "root" {
            return Ok(RouteKind::Root);
        }
        match s.split_once(':') {
            Some(("ns", name)) if !name.is_empty() => Ok(RouteKind::namespaced(name)),
            Some(("term", uri)) if !uri.is_empty() => Ok(RouteKind::term(uri)),
            _ => Err(Error::invalid_argument(
                "kind",
                format!("expected root, ns:NAME or term:URI, got '{s}'"),
            )),
        }
    }
}
