//! Chain walking over any `std::error::Error`.
//!
//! Stepping goes through [`std::error::Error::source`]. Joined errors step
//! through an adapter that stands for one child at a time; matching and
//! type recovery look through the adapter into that child's own chain.

use crate::join::Chain;
use crate::{BoxError, Error, Fields, Kind, StackFrames};
use serde_json::Value as JsonValue;
use std::error::Error as StdError;

/// Iterate an error and its predecessors.
///
/// ```
/// use errkit::NO_FRAME;
///
/// let err = errkit::wrap!(errkit::new!("inner", NO_FRAME), "outer", NO_FRAME);
/// let texts: Vec<String> = errkit::chain(&err).map(|e| e.to_string()).collect();
/// assert_eq!(texts, ["outer: inner", "inner"]);
/// ```
pub fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&err| err.source())
}

/// Step to the predecessor of `err`.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Whether any error on the chain has `kind` as its own kind.
///
/// ```
/// use errkit::{Kind, NO_FRAME};
///
/// const INVALID: Kind = Kind::new("invalid");
///
/// let err = errkit::wrap!(errkit::new!("bad email", INVALID, NO_FRAME), "signup", NO_FRAME);
/// assert!(!INVALID.matches(&err));
/// assert!(errkit::is(&err, &INVALID));
/// ```
pub fn is(err: &(dyn StdError + 'static), kind: &Kind) -> bool {
    chain(err).any(|err| {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.is(kind);
        }
        err.downcast_ref::<Chain>()
            .is_some_and(|chain| is(chain.head(), kind))
    })
}

/// The first error of type `T` on the chain.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    for err in chain(err) {
        if let Some(found) = err.downcast_ref::<T>() {
            return Some(found);
        }
        if let Some(found) = err
            .downcast_ref::<Chain>()
            .and_then(|chain| find::<T>(chain.head()))
        {
            return Some(found);
        }
    }
    None
}

/// The first non-empty kind on the chain.
pub fn kind_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Kind> {
    chain(err)
        .filter_map(|err| err.downcast_ref::<Error>())
        .find_map(Error::kind)
}

/// Logging fields for `err`, or `None` for errors that carry none.
///
/// ```
/// use errkit::{KV, NO_FRAME};
///
/// let err = errkit::new!("denied", KV::new("user", "ada"), NO_FRAME);
/// let fields = errkit::fields(&err).expect("errkit error");
/// assert_eq!(fields.keys().collect::<Vec<_>>(), ["user"]);
///
/// let io = std::io::Error::other("disk");
/// assert!(errkit::fields(&io).is_none());
/// ```
pub fn fields(err: &(dyn StdError + 'static)) -> Option<Fields> {
    if let Some(err) = err.downcast_ref::<Error>() {
        return Some(err.fields());
    }
    err.downcast_ref::<Chain>()
        .and_then(|chain| fields(chain.head()))
}

/// Frames of `err` and its predecessors, or `None` for foreign errors.
pub fn stack_trace(err: &(dyn StdError + 'static)) -> Option<StackFrames> {
    if let Some(err) = err.downcast_ref::<Error>() {
        return Some(err.stack_trace());
    }
    err.downcast_ref::<Chain>()
        .and_then(|chain| stack_trace(chain.head()))
}

/// Metadata lookup along the chain; the outermost match wins.
pub fn v<'a>(err: &'a (dyn StdError + 'static), key: &str) -> Option<&'a JsonValue> {
    chain(err)
        .filter_map(|err| err.downcast_ref::<Error>())
        .flat_map(Error::kvs)
        .find(|kv| kv.key == key)
        .map(|kv| &kv.value)
}

/// Errors that aggregate other errors.
///
/// Implement this for foreign multi-errors so [`disjoin`] can take them
/// apart like joined errors.
pub trait Disjoin {
    /// The aggregated errors in order, or `None` if this is not an
    /// aggregate.
    fn disjoin(&self) -> Option<&[BoxError]>;
}

impl Disjoin for Error {
    fn disjoin(&self) -> Option<&[BoxError]> {
        self.errors()
    }
}

impl Disjoin for dyn StdError + 'static {
    fn disjoin(&self) -> Option<&[BoxError]> {
        self.downcast_ref::<Error>().and_then(Error::errors)
    }
}

impl Disjoin for dyn StdError + Send + Sync + 'static {
    fn disjoin(&self) -> Option<&[BoxError]> {
        self.downcast_ref::<Error>().and_then(Error::errors)
    }
}

/// The errors a joined error was built from, one level deep.
///
/// ```
/// use errkit::NO_FRAME;
///
/// let err = errkit::join!(errkit::new!("a", NO_FRAME), errkit::new!("b", NO_FRAME)).expect("two");
/// let parts = errkit::disjoin(&err).expect("joined");
/// assert_eq!(parts.iter().map(|e| e.to_string()).collect::<Vec<_>>(), ["a", "b"]);
///
/// assert!(errkit::disjoin(&errkit::new!("single", NO_FRAME)).is_none());
/// ```
pub fn disjoin<E: Disjoin + ?Sized>(err: &E) -> Option<&[BoxError]> {
    err.disjoin()
}
