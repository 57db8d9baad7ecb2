//! Extension traits for `Result` and `Option`.

use crate::{BoxError, Error, Opt};

/// Wrap the error of a `Result` at the call site.
///
/// ```
/// use errkit::{Kind, Opt, ResultExt};
///
/// fn read() -> Result<String, std::io::Error> {
///     Err(std::io::Error::other("disk gone"))
/// }
///
/// let err = read()
///     .wrap_err([Opt::from("load config"), Opt::from(Kind::new("io"))])
///     .unwrap_err();
/// assert_eq!(err.to_string(), "load config: disk gone");
/// assert!(errkit::is(&err, &Kind::new("io")));
/// ```
pub trait ResultExt<T> {
    /// Wrap the error, capturing the caller's frame. `Ok` passes through.
    fn wrap_err(self, opts: impl IntoIterator<Item = Opt>) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    fn wrap_err(self, opts: impl IntoIterator<Item = Opt>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(crate::wrap(err, opts)),
        }
    }
}

/// Turn a missing value into an error at the call site.
///
/// ```
/// use errkit::{Kind, Opt, OptionExt};
///
/// let user: Option<u32> = None;
/// let err = user
///     .ok_or_new("user missing", [Opt::from(Kind::new("not found"))])
///     .unwrap_err();
/// assert_eq!(err.to_string(), "user missing");
/// ```
pub trait OptionExt<T> {
    /// Build a new error when the value is `None`.
    fn ok_or_new(
        self,
        msg: impl Into<String>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Result<T, Error>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn ok_or_new(
        self,
        msg: impl Into<String>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Result<T, Error> {
        match self {
            Some(value) => Ok(value),
            None => Err(crate::new(msg, opts)),
        }
    }
}
