//! The error type and its single-predecessor node.

use crate::join::Join;
use crate::options::Resolved;
use crate::{FieldValue, Fields, Frame, KV, Kind, Opt, StackFrames, frame};
use serde_json::Value as JsonValue;
use std::fmt;
use std::panic::Location;

/// Type-erased error, the currency of predecessors and joined children.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error carrying a message, an optional predecessor, a [`Kind`], metadata
/// and the frame it was created at.
///
/// Built by [`new`], [`wrap`] and [`crate::join`]. Values are immutable once
/// built.
///
/// Renderings:
/// - `{}` is the message followed by `": "` and the predecessor's text.
/// - `{:#}` adds the chain's stack trace inline.
/// - `{:?}` is the quoted message.
///
/// # Examples
///
/// ```
/// use errkit::{Kind, KV, NO_FRAME};
///
/// let inner = errkit::new!("connection reset", NO_FRAME);
/// let err = errkit::wrap!(inner, "load user", Kind::new("io"), KV::new("user", 42), NO_FRAME);
///
/// assert_eq!(err.to_string(), "load user: connection reset");
/// assert_eq!(format!("{err:#}"), "load user: connection reset []");
/// assert_eq!(format!("{err:?}"), "\"load user: connection reset\"");
/// assert_eq!(err.v("user"), Some(&serde_json::json!(42)));
/// ```
pub struct Error(pub(crate) Box<Repr>);

pub(crate) enum Repr {
    Node(Node),
    Join(Join),
}

pub(crate) struct Node {
    msg: String,
    source: Option<BoxError>,
    kind: Option<Kind>,
    kvs: Vec<KV>,
    frame: Option<Frame>,
}

impl Error {
    pub(crate) fn from_resolved(resolved: Resolved, location: &'static Location<'static>) -> Self {
        let frame = frame::capture(location, resolved.skip);
        Self(Box::new(Repr::Node(Node {
            msg: resolved.msg,
            source: resolved.source,
            kind: resolved.kind,
            kvs: resolved.kvs,
            frame,
        })))
    }

    /// The error's own message, without its predecessor's text.
    pub fn message(&self) -> &str {
        match &*self.0 {
            Repr::Node(node) => &node.msg,
            Repr::Join(join) => join.msg(),
        }
    }

    /// The error's own kind.
    pub fn kind(&self) -> Option<&Kind> {
        match &*self.0 {
            Repr::Node(node) => node.kind.as_ref(),
            Repr::Join(join) => join.kind(),
        }
    }

    /// The error's own metadata, in insertion order.
    pub fn kvs(&self) -> &[KV] {
        match &*self.0 {
            Repr::Node(node) => &node.kvs,
            Repr::Join(join) => join.kvs(),
        }
    }

    /// The frame captured when the error was built.
    pub fn frame(&self) -> Option<&Frame> {
        match &*self.0 {
            Repr::Node(node) => node.frame.as_ref(),
            Repr::Join(join) => join.frame(),
        }
    }

    /// Whether this error's own kind is `kind`. The chain is not searched.
    pub fn is(&self, kind: &Kind) -> bool {
        self.kind() == Some(kind)
    }

    /// Whether this error aggregates several errors.
    pub fn is_join(&self) -> bool {
        matches!(&*self.0, Repr::Join(_))
    }

    /// The joined errors, in the order they were given.
    pub fn errors(&self) -> Option<&[crate::BoxError]> {
        match &*self.0 {
            Repr::Node(_) => None,
            Repr::Join(join) => Some(join.errors()),
        }
    }

    /// Look up metadata by key, starting at this error and walking its
    /// predecessors. The outermost match wins.
    pub fn v(&self, key: &str) -> Option<&JsonValue> {
        crate::v(self, key)
    }

    /// Frames of this error and its predecessors, outermost first.
    ///
    /// A joined error contributes its own frame and ends the walk.
    pub fn stack_trace(&self) -> StackFrames {
        let mut frames = StackFrames::default();
        for err in crate::chain(self) {
            let Some(err) = err.downcast_ref::<Error>() else {
                continue;
            };
            if let Some(frame) = err.frame() {
                frames.push(frame.clone());
            }
            if err.is_join() {
                break;
            }
        }
        frames
    }

    /// Logging fields for this error and its chain.
    ///
    /// Metadata of every error on the chain comes first, outermost first,
    /// followed by `err_kind` (the first kind found) and `stack_trace`.
    /// A joined error on the chain adds its children's fields under
    /// `multi_err` and ends the walk.
    pub fn fields(&self) -> Fields {
        match &*self.0 {
            Repr::Node(_) => self.chain_fields(),
            Repr::Join(join) => join.fields(),
        }
    }

    fn chain_fields(&self) -> Fields {
        let mut out = Fields::default();
        let mut kind = None;
        for err in crate::chain(self) {
            let Some(err) = err.downcast_ref::<Error>() else {
                continue;
            };
            out.extend_kvs(err.kvs());
            kind = kind.or(err.kind());
            if let Repr::Join(join) = &*err.0 {
                let (inner_kind, children) = join.child_fields();
                kind = kind.or(inner_kind);
                if !children.is_empty() {
                    out.push("multi_err", FieldValue::Nested(children));
                }
                break;
            }
        }

        if let Some(kind) = kind {
            out.push("err_kind", FieldValue::from(kind));
        }
        let frames = self.stack_trace();
        if !frames.is_empty() {
            out.push("stack_trace", FieldValue::StackTrace(frames.to_strings()));
        }
        out
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Repr::Node(node) => {
                f.write_str(&node.msg)?;
                if let Some(source) = &node.source {
                    if !node.msg.is_empty() {
                        f.write_str(": ")?;
                    }
                    write!(f, "{source}")?;
                }
                if f.alternate() {
                    write!(f, " {}", self.stack_trace())?;
                }
                Ok(())
            }
            Repr::Join(join) => {
                f.write_str(&join.render())?;
                if f.alternate() {
                    write!(f, "{}", self.stack_trace())?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.0 {
            Repr::Node(node) => match &node.source {
                Some(source) => Some(&**source),
                None => None,
            },
            Repr::Join(join) => join.unwrap(),
        }
    }
}

/// Create an error with a message.
///
/// The frame of the caller is captured unless an option says otherwise.
/// See [`crate::new!`] for the variadic form.
///
/// ```
/// use errkit::{Kind, Opt};
///
/// let err = errkit::new("quota exceeded", [Opt::from(Kind::new("limit"))]);
/// assert!(err.is(&Kind::new("limit")));
/// assert_eq!(err.stack_trace().len(), 1);
/// ```
#[track_caller]
pub fn new(msg: impl Into<String>, opts: impl IntoIterator<Item = Opt>) -> Error {
    let location = Location::caller();
    let opts = std::iter::once(Opt::Msg(msg.into())).chain(opts);
    Error::from_resolved(Resolved::resolve(opts), location)
}

/// Wrap an error, capturing a new frame. A message is optional.
///
/// See [`crate::wrap!`] for the variadic form and [`wrap_opt`] for the
/// form that passes absent errors through.
#[track_caller]
pub fn wrap(err: impl Into<BoxError>, opts: impl IntoIterator<Item = Opt>) -> Error {
    let location = Location::caller();
    let opts = std::iter::once(Opt::Source(err.into())).chain(opts);
    Error::from_resolved(Resolved::resolve(opts), location)
}

/// Wrap an error if there is one.
///
/// ```
/// let none = errkit::wrap_opt(None::<errkit::Error>, Vec::<errkit::Opt>::new());
/// assert!(none.is_none());
/// ```
#[track_caller]
pub fn wrap_opt<E>(err: Option<E>, opts: impl IntoIterator<Item = Opt>) -> Option<Error>
where
    E: Into<BoxError>,
{
    let location = Location::caller();
    let err = err?;
    let opts = std::iter::once(Opt::Source(err.into())).chain(opts);
    Some(Error::from_resolved(Resolved::resolve(opts), location))
}
