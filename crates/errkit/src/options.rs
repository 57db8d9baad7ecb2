//! Construction options and their resolution.

use crate::{BoxError, Error, KV, Kind, Render};

/// Frame-skip directive.
///
/// Skips accumulate across options, so a helper that builds errors for its
/// caller can add [`SKIP_CALLER`] while its own caller adds more.
/// [`FrameSkips::NoFrame`] wins over everything else in the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSkips {
    /// Do not capture a frame.
    NoFrame,
    /// Attribute the frame this many levels above the direct caller.
    Skip(usize),
}

/// Do not capture a frame for this error.
pub const NO_FRAME: FrameSkips = FrameSkips::NoFrame;

/// Attribute the frame to the caller of the function building the error.
pub const SKIP_CALLER: FrameSkips = FrameSkips::Skip(1);

/// Option for [`crate::new`] and [`crate::wrap`].
///
/// Usually built through `From` conversions by the constructor macros.
#[derive(Debug, derive_more::From)]
pub enum Opt {
    /// Message; the last one wins.
    #[from(ignore)]
    Msg(String),
    /// Kind; the last one wins.
    Kind(Kind),
    /// Metadata pair, appended.
    Kv(KV),
    /// Metadata pairs, appended in order.
    Kvs(Vec<KV>),
    /// Predecessor error; the last one wins.
    Source(BoxError),
    /// Frame-skip directive.
    Frame(FrameSkips),
    /// Absent entry, ignored.
    #[from(ignore)]
    Empty,
}

impl Opt {
    /// Predecessor option from any error.
    pub fn source(err: impl Into<BoxError>) -> Self {
        Self::Source(err.into())
    }
}

impl From<&'static str> for Opt {
    fn from(msg: &'static str) -> Self {
        Self::Msg(msg.to_string())
    }
}

impl From<String> for Opt {
    fn from(msg: String) -> Self {
        Self::Msg(msg)
    }
}

impl From<Error> for Opt {
    fn from(err: Error) -> Self {
        Self::Source(Box::new(err))
    }
}

impl<T: Into<Opt>> From<Option<T>> for Opt {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Empty, Into::into)
    }
}

/// Option for [`crate::join`].
///
/// Errors become children; everything else configures the join itself.
#[derive(Debug)]
pub enum JoinOpt {
    /// Child error.
    Err(BoxError),
    /// Child errors, appended in order.
    Errs(Vec<BoxError>),
    /// Render strategy replacing [`crate::list_render`].
    Render(Render),
    /// Any option accepted by [`crate::new`].
    Opt(Opt),
}

impl JoinOpt {
    /// Child option from any error.
    pub fn err(err: impl Into<BoxError>) -> Self {
        Self::Err(err.into())
    }
}

impl From<Error> for JoinOpt {
    fn from(err: Error) -> Self {
        Self::Err(Box::new(err))
    }
}

impl From<BoxError> for JoinOpt {
    fn from(err: BoxError) -> Self {
        Self::Err(err)
    }
}

impl From<Vec<BoxError>> for JoinOpt {
    fn from(errs: Vec<BoxError>) -> Self {
        Self::Errs(errs)
    }
}

impl From<Vec<Error>> for JoinOpt {
    fn from(errs: Vec<Error>) -> Self {
        Self::Errs(errs.into_iter().map(|e| Box::new(e) as BoxError).collect())
    }
}

impl From<Render> for JoinOpt {
    fn from(render: Render) -> Self {
        Self::Render(render)
    }
}

impl From<Opt> for JoinOpt {
    fn from(opt: Opt) -> Self {
        Self::Opt(opt)
    }
}

impl<T: Into<JoinOpt>> From<Option<T>> for JoinOpt {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Opt(Opt::Empty), Into::into)
    }
}

macro_rules! join_opt_via_opt {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for JoinOpt {
                fn from(value: $ty) -> Self {
                    Self::Opt(Opt::from(value))
                }
            }
        )*
    };
}

join_opt_via_opt!(&'static str, String, Kind, KV, Vec<KV>, FrameSkips);

/// Normalized attributes of an error under construction.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub msg: String,
    pub kind: Option<Kind>,
    pub kvs: Vec<KV>,
    pub source: Option<BoxError>,
    /// `None` disables frame capture.
    pub skip: Option<usize>,
}

impl Default for Resolved {
    fn default() -> Self {
        Self {
            msg: String::new(),
            kind: None,
            kvs: Vec::new(),
            source: None,
            skip: Some(0),
        }
    }
}

impl Resolved {
    /// Apply options in order.
    pub(crate) fn resolve(opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut out = Self::default();
        for opt in opts {
            out.apply(opt);
        }
        out
    }

    fn apply(&mut self, opt: Opt) {
        match opt {
            Opt::Msg(msg) => self.msg = msg,
            Opt::Kind(kind) => self.kind = (!kind.is_empty()).then_some(kind),
            Opt::Kv(kv) => self.kvs.push(kv),
            Opt::Kvs(kvs) => self.kvs.extend(kvs),
            Opt::Source(err) => self.source = Some(err),
            Opt::Frame(FrameSkips::NoFrame) => self.skip = None,
            Opt::Frame(FrameSkips::Skip(n)) => {
                if let Some(skip) = self.skip.as_mut() {
                    *skip += n;
                }
            }
            Opt::Empty => {}
        }
    }
}

/// Join options split into children, render strategy and node options.
pub(crate) struct JoinParts {
    pub errs: Vec<BoxError>,
    pub render: Option<Render>,
    pub opts: Vec<Opt>,
}

impl JoinParts {
    pub(crate) fn split(opts: impl IntoIterator<Item = JoinOpt>) -> Self {
        let mut parts = Self {
            errs: Vec::new(),
            render: None,
            opts: Vec::new(),
        };
        for opt in opts {
            match opt {
                JoinOpt::Err(err) | JoinOpt::Opt(Opt::Source(err)) => parts.errs.push(err),
                JoinOpt::Errs(errs) => parts.errs.extend(errs),
                JoinOpt::Render(render) => parts.render = Some(render),
                JoinOpt::Opt(opt) => parts.opts.push(opt),
            }
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_message_wins() {
        let resolved = Resolved::resolve([Opt::from("first"), Opt::from("second".to_string())]);
        assert_eq!(resolved.msg, "second");
    }

    #[test]
    fn last_kind_wins_and_empty_kind_clears() {
        let resolved = Resolved::resolve([Opt::from(Kind::new("a")), Opt::from(Kind::new("b"))]);
        assert_eq!(resolved.kind, Some(Kind::new("b")));

        let resolved = Resolved::resolve([Opt::from(Kind::new("a")), Opt::from(Kind::new(""))]);
        assert_eq!(resolved.kind, None);
    }

    #[test]
    fn metadata_accumulates_in_order() {
        let resolved = Resolved::resolve([
            Opt::from(KV::new("a", 1)),
            Opt::from(crate::kvs!("b" => 2, "a" => 3)),
        ]);
        let keys: Vec<_> = resolved.kvs.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "a"]);
        assert_eq!(resolved.kvs[2].value, json!(3));
    }

    #[test]
    fn skips_accumulate() {
        let resolved = Resolved::resolve([Opt::from(SKIP_CALLER), Opt::from(FrameSkips::Skip(2))]);
        assert_eq!(resolved.skip, Some(3));
    }

    #[test]
    fn no_frame_is_sticky() {
        let resolved = Resolved::resolve([
            Opt::from(SKIP_CALLER),
            Opt::from(NO_FRAME),
            Opt::from(SKIP_CALLER),
        ]);
        assert_eq!(resolved.skip, None);
    }

    #[test]
    fn absent_entries_are_ignored() {
        let resolved = Resolved::resolve([
            Opt::from("msg"),
            Opt::from(None::<Kind>),
            Opt::from(Some(KV::new("k", "v"))),
        ]);
        assert_eq!(resolved.msg, "msg");
        assert_eq!(resolved.kind, None);
        assert_eq!(resolved.kvs.len(), 1);
        assert_eq!(resolved.skip, Some(0));
    }

    #[test]
    fn last_source_wins() {
        let resolved = Resolved::resolve([
            Opt::from(crate::new("one", [Opt::from(NO_FRAME)])),
            Opt::from(crate::new("two", [Opt::from(NO_FRAME)])),
        ]);
        assert_eq!(resolved.source.map(|e| e.to_string()).as_deref(), Some("two"));
    }

    #[test]
    fn join_options_split_children_from_node_options() {
        let parts = JoinParts::split([
            JoinOpt::from("header"),
            JoinOpt::from(crate::new("a", [Opt::from(NO_FRAME)])),
            JoinOpt::from(None::<Error>),
            JoinOpt::from(Opt::source(crate::new("b", [Opt::from(NO_FRAME)]))),
            JoinOpt::from(Kind::new("k")),
        ]);
        assert_eq!(parts.errs.len(), 2);
        assert!(parts.render.is_none());
        assert_eq!(parts.opts.len(), 3);
    }
}
