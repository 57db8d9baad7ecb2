//! Error chains with call-site frames, kinds, metadata and joined errors.
//!
//! # Building errors
//!
//! - [`new`] creates an error with a message.
//! - [`wrap`] wraps an existing error and captures a new frame.
//! - [`join`] aggregates several errors into one.
//!
//! Each takes a list of options ([`Opt`], [`JoinOpt`]): a message, a
//! [`Kind`], [`KV`] metadata, a predecessor error and [`FrameSkips`]
//! directives. The [`new!`], [`wrap!`] and [`join!`] macros accept the
//! options as plain arguments.
//!
//! # Inspecting errors
//!
//! Chains are walked through `std::error::Error::source`. A joined error
//! steps through each of its children in order, so the generic walkers in
//! this crate ([`chain`], [`is`], [`find`]) see every child.
//!
//! [`fields`] flattens metadata, kind and frames of a chain into ordered
//! key/value pairs for structured logging, and [`report::emit`] hands an
//! error to `tracing`.
//!
//! # Examples
//!
//! ```
//! use errkit::{KV, Kind};
//!
//! const NOT_FOUND: Kind = Kind::new("not found");
//!
//! fn load(id: u32) -> Result<(), errkit::Error> {
//!     Err(errkit::new!("no such user", NOT_FOUND, KV::new("user_id", id)))
//! }
//!
//! let err = load(7).map_err(|e| errkit::wrap!(e, "render profile")).unwrap_err();
//! assert_eq!(err.to_string(), "render profile: no such user");
//! assert!(errkit::is(&err, &NOT_FOUND));
//! assert_eq!(err.v("user_id"), Some(&serde_json::json!(7)));
//! assert_eq!(err.stack_trace().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ext;
mod fields;
mod frame;
mod join;
mod kind;
mod kv;
mod macros;
mod options;
pub mod report;
mod walk;

pub use error::{BoxError, Error, new, wrap, wrap_opt};
pub use ext::{OptionExt, ResultExt};
pub use fields::{FieldValue, Fields};
pub use frame::{Frame, StackFrames};
pub use join::{Render, join, list_render};
pub use kind::Kind;
pub use kv::KV;
pub use options::{FrameSkips, JoinOpt, NO_FRAME, Opt, SKIP_CALLER};
pub use walk::{Disjoin, chain, disjoin, fields, find, is, kind_of, stack_trace, unwrap, v};
