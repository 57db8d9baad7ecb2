//! Error kinds.

use std::borrow::Cow;

/// Category of an error.
///
/// Kinds let callers branch on what an error *means* instead of on its
/// concrete type or a set of sentinel values. Two kinds are equal when
/// their names are equal.
///
/// # Examples
///
/// ```
/// use errkit::Kind;
///
/// const NOT_FOUND: Kind = Kind::new("not found");
///
/// let err = errkit::new!("user 42 missing", NOT_FOUND);
/// assert!(NOT_FOUND.matches(&err));
/// assert!(!Kind::new("invalid").matches(&err));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    serde::Serialize,
)]
#[display("error kind: {}", _0)]
#[serde(transparent)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Create a kind from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The kind's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty. An empty kind counts as no kind.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `err` carries this kind as its own kind.
    ///
    /// Only the error itself is inspected. Use [`crate::is`] to search a
    /// whole chain.
    pub fn matches(&self, err: &(dyn std::error::Error + 'static)) -> bool {
        err.downcast_ref::<crate::Error>()
            .is_some_and(|e| e.is(self))
    }
}

impl From<&'static str> for Kind {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl AsRef<str> for Kind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
