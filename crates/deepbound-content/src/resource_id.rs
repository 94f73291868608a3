//! Namespaced resource identifiers (`namespace:path`).
//!
//! Identifiers are parsed once when content is loaded and stored on the
//! definitions that reference them, so lookups never format strings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace assumed when an identifier string carries no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "deepbound";

/// Errors produced when parsing a [`ResourceId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    /// The path component is empty (`""` or `"deepbound:"`).
    #[error("resource id has an empty path: {0:?}")]
    EmptyPath(String),
    /// The namespace component is empty (`":stone"`).
    #[error("resource id has an empty namespace: {0:?}")]
    EmptyNamespace(String),
    /// More than one `:` separator.
    #[error("resource id has more than one ':' separator: {0:?}")]
    TooManySeparators(String),
}

/// A typed `namespace:path` identifier, e.g. `deepbound:rock-granite`.
///
/// Both parts are reference counted, so cloning an id is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    namespace: Arc<str>,
    path: Arc<str>,
}

impl ResourceId {
    /// Builds an id from already-separated parts.
    pub fn new(namespace: &str, path: &str) -> Self {
        Self {
            namespace: Arc::from(namespace),
            path: Arc::from(path),
        }
    }

    /// Builds an id in the [`DEFAULT_NAMESPACE`].
    pub fn deepbound(path: &str) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Parses `namespace:path`, or a bare `path` in the default namespace.
    ///
    /// # Errors
    ///
    /// Returns a [`ResourceIdError`] if either part is empty or the string
    /// contains more than one separator.
    pub fn parse(text: &str) -> Result<Self, ResourceIdError> {
        let mut parts = text.split(':');
        let first = parts.next().unwrap_or_default();
        let (namespace, path) = match (parts.next(), parts.next()) {
            (None, _) => (DEFAULT_NAMESPACE, first),
            (Some(path), None) => (first, path),
            (Some(_), Some(_)) => return Err(ResourceIdError::TooManySeparators(text.into())),
        };
        if namespace.is_empty() {
            return Err(ResourceIdError::EmptyNamespace(text.into()));
        }
        if path.is_empty() {
            return Err(ResourceIdError::EmptyPath(text.into()));
        }
        Ok(Self::new(namespace, path))
    }

    /// The namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path part.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({self})")
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = ResourceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.to_string()
    }
}
