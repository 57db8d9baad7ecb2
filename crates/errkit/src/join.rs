//! Joined errors and the adapter that walks their children.

use crate::error::Repr;
use crate::options::{JoinParts, Resolved};
use crate::{BoxError, Error, FieldValue, Fields, Frame, JoinOpt, KV, Kind, frame};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

type RenderFn = dyn Fn(&str, &[BoxError]) -> String + Send + Sync;

/// Rendering strategy for joined errors, given the join's message and
/// children. Defaults to [`list_render`].
///
/// ```
/// use errkit::{NO_FRAME, Render};
///
/// let render = Render::new(|msg, errs| format!("{msg} ({} failed)", errs.len()));
/// let err = errkit::join!(
///     errkit::new!("a", NO_FRAME),
///     errkit::new!("b", NO_FRAME),
///     "sync",
///     render,
/// )
/// .expect("two children");
/// assert_eq!(err.to_string(), "sync (2 failed)");
/// ```
#[derive(Clone)]
pub struct Render(Arc<RenderFn>);

impl Render {
    /// Wrap a render function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&str, &[BoxError]) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    fn call(&self, msg: &str, errs: &[BoxError]) -> String {
        (self.0)(msg, errs)
    }
}

impl Default for Render {
    fn default() -> Self {
        Self::new(list_render)
    }
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Render(..)")
    }
}

/// Render joined errors as a bulleted list.
///
/// Without a message the header counts the errors; a message is used
/// verbatim as the header and should carry its own separator.
///
/// ```
/// use errkit::{BoxError, list_render};
///
/// let errs: Vec<BoxError> = vec!["disk full".into(), "timeout".into()];
/// assert_eq!(list_render("", &errs), "2 errors occurred:\n\t* disk full\n\t* timeout\n");
/// assert_eq!(
///     list_render("sync failed:\n\t", &errs),
///     "sync failed:\n\t* disk full\n\t* timeout\n"
/// );
/// assert_eq!(list_render("", &errs[..1]), "1 error occurred:\n\t* disk full\n");
/// ```
pub fn list_render(msg: &str, errs: &[BoxError]) -> String {
    if msg.is_empty() && errs.len() == 1 {
        return format!("1 error occurred:\n\t* {}\n", errs[0]);
    }

    let points: Vec<String> = errs.iter().map(|err| format!("* {err}")).collect();
    let header = if msg.is_empty() {
        format!("{} errors occurred:\n\t", errs.len())
    } else {
        msg.to_string()
    };
    format!("{header}{}\n", points.join("\n\t"))
}

pub(crate) struct Join {
    msg: String,
    errs: Arc<[BoxError]>,
    chain: Option<Box<Chain>>,
    kind: Option<Kind>,
    kvs: Vec<KV>,
    frame: Option<Frame>,
    render: Render,
}

impl Join {
    pub(crate) fn msg(&self) -> &str {
        &self.msg
    }

    pub(crate) fn kind(&self) -> Option<&Kind> {
        self.kind.as_ref()
    }

    pub(crate) fn kvs(&self) -> &[KV] {
        &self.kvs
    }

    pub(crate) fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub(crate) fn errors(&self) -> &[BoxError] {
        &self.errs
    }

    pub(crate) fn render(&self) -> String {
        self.render.call(&self.msg, &self.errs)
    }

    /// The sole child, or an adapter that yields every child in order.
    pub(crate) fn unwrap(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.errs.len() {
            0 => None,
            1 => Some(&*self.errs[0]),
            _ => match &self.chain {
                Some(chain) => Some(&**chain),
                None => None,
            },
        }
    }

    /// Own metadata, kind (own, else the first child kind), own frame, then
    /// one `err_<i>` entry per child that has fields.
    pub(crate) fn fields(&self) -> Fields {
        let mut out = Fields::default();
        out.extend_kvs(&self.kvs);

        let (inner_kind, children) = self.child_fields();
        if let Some(kind) = self.kind.as_ref().or(inner_kind) {
            out.push("err_kind", FieldValue::from(kind));
        }
        if let Some(frame) = &self.frame {
            out.push("stack_trace", FieldValue::StackTrace(vec![frame.to_string()]));
        }
        out.extend(children);
        out
    }

    /// First kind found among the children and their `err_<i>` fields.
    pub(crate) fn child_fields(&self) -> (Option<&Kind>, Fields) {
        let mut kind = None;
        let mut out = Fields::default();
        for (i, err) in self.errs.iter().enumerate() {
            let err: &(dyn std::error::Error + 'static) = &**err;
            if let Some(err) = err.downcast_ref::<Error>() {
                let fields = err.fields();
                if !fields.is_empty() {
                    out.push(format!("err_{i}"), FieldValue::Nested(fields));
                }
            }
            if kind.is_none() {
                kind = crate::kind_of(err);
            }
        }
        (kind, out)
    }
}

/// The not yet visited children of a joined error.
///
/// Each adapter presents its first child as itself and steps to an adapter
/// over the rest, so `source()` visits every child once, in order. Adapters
/// share the join's child list and are built with the join.
pub(crate) struct Chain {
    errs: Arc<[BoxError]>,
    pos: usize,
    next: Option<Box<Chain>>,
}

impl Chain {
    /// Adapters for two or more children; `None` otherwise.
    fn build(errs: &Arc<[BoxError]>) -> Option<Box<Self>> {
        if errs.len() < 2 {
            return None;
        }
        (0..errs.len()).rev().fold(None, |next, pos| {
            Some(Box::new(Self {
                errs: Arc::clone(errs),
                pos,
                next,
            }))
        })
    }

    pub(crate) fn head(&self) -> &(dyn std::error::Error + 'static) {
        &*self.errs[self.pos]
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("pos", &self.pos)
            .field("head", &self.head())
            .finish()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.head(), f)
    }
}

impl std::error::Error for Chain {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.next {
            Some(next) => Some(&**next),
            None => None,
        }
    }
}

/// Join errors into one.
///
/// `None` entries are dropped; with no errors left the result is `None`.
/// See [`crate::join!`] for the variadic form.
///
/// ```
/// use errkit::{JoinOpt, NO_FRAME};
///
/// assert!(errkit::join([JoinOpt::from(None::<errkit::Error>)]).is_none());
///
/// let err = errkit::join([JoinOpt::from(errkit::new!("disk full", NO_FRAME))])
///     .expect("one child");
/// assert_eq!(err.to_string(), "1 error occurred:\n\t* disk full\n");
/// ```
#[track_caller]
pub fn join(opts: impl IntoIterator<Item = JoinOpt>) -> Option<Error> {
    let location = Location::caller();
    let JoinParts { errs, render, opts } = JoinParts::split(opts);
    if errs.is_empty() {
        return None;
    }

    let resolved = Resolved::resolve(opts);
    let frame = frame::capture(location, resolved.skip);
    let errs: Arc<[BoxError]> = Arc::from(errs);
    let chain = Chain::build(&errs);
    Some(Error(Box::new(Repr::Join(Join {
        msg: resolved.msg,
        errs,
        chain,
        kind: resolved.kind,
        kvs: resolved.kvs,
        frame,
        render: render.unwrap_or_default(),
    }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_FRAME;

    fn leaf(msg: &'static str) -> BoxError {
        Box::new(crate::new(msg, [crate::Opt::from(NO_FRAME)]))
    }

    #[test]
    fn chain_walks_every_child_once() {
        let errs: Arc<[BoxError]> = Arc::from(vec![leaf("a"), leaf("b"), leaf("c")]);
        let chain = Chain::build(&errs).expect("three children");

        let seen: Vec<String> = crate::chain(&*chain).map(|err| err.to_string()).collect();
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn chain_is_not_built_for_a_single_child() {
        let errs: Arc<[BoxError]> = Arc::from(vec![leaf("a")]);
        assert!(Chain::build(&errs).is_none());
    }

    #[test]
    fn chain_debug_shows_only_its_head() {
        let errs: Arc<[BoxError]> = Arc::from(vec![leaf("a"), leaf("b"), leaf("c")]);
        let chain = Chain::build(&errs).expect("three children");
        assert_eq!(format!("{chain:?}"), r#"Chain { pos: 0, head: "a" }"#);

        let next = chain.next.as_deref().expect("second adapter");
        assert_eq!(format!("{next:?}"), r#"Chain { pos: 1, head: "b" }"#);
    }

    #[test]
    fn chain_shares_the_child_list() {
        let errs: Arc<[BoxError]> = Arc::from(vec![leaf("a"), leaf("b")]);
        let _chain = Chain::build(&errs);
        assert_eq!(Arc::strong_count(&errs), 3);
    }
}
