//! Variadic constructor macros.

/// Create an error from a message and any number of options.
///
/// Options are anything convertible into [`crate::Opt`]: messages, kinds,
/// metadata, errors to wrap and frame-skip directives.
///
/// ```
/// use errkit::{KV, Kind};
///
/// let err = errkit::new!("payment declined", Kind::new("payment"), KV::new("order", 7));
/// assert_eq!(err.to_string(), "payment declined");
/// assert_eq!(err.stack_trace().len(), 1);
/// ```
#[macro_export]
macro_rules! new {
    ($msg:expr $(, $opt:expr)* $(,)?) => {
        $crate::new($msg, {
            let opts: ::std::vec::Vec<$crate::Opt> = ::std::vec![$($crate::Opt::from($opt)),*];
            opts
        })
    };
}

/// Wrap an error with any number of options.
///
/// ```
/// let err = errkit::wrap!(std::io::Error::other("eof"), "read header");
/// assert_eq!(err.to_string(), "read header: eof");
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr $(, $opt:expr)* $(,)?) => {
        $crate::wrap($err, {
            let opts: ::std::vec::Vec<$crate::Opt> = ::std::vec![$($crate::Opt::from($opt)),*];
            opts
        })
    };
}

/// Join errors and options into one error.
///
/// Arguments are anything convertible into [`crate::JoinOpt`]. Errors and
/// `Option`s of errors become children; the rest configures the join.
/// Evaluates to `None` when no child errors remain.
///
/// ```
/// let err = errkit::join!(errkit::new!("a"), None::<errkit::Error>, errkit::new!("b"))
///     .expect("two");
/// assert_eq!(errkit::disjoin(&err).map(<[_]>::len), Some(2));
/// ```
#[macro_export]
macro_rules! join {
    ($($opt:expr),* $(,)?) => {
        $crate::join({
            let opts: ::std::vec::Vec<$crate::JoinOpt> =
                ::std::vec![$($crate::JoinOpt::from($opt)),*];
            opts
        })
    };
}
