//! Call-site frames and their capture.

use derive_getters::Getters;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// A single captured call site.
///
/// `{}` renders `file.rs:12[function]` using the file's base name and the
/// function's last path segment. `{:#}` renders the qualified function
/// name and the full path separated by a newline and a tab.
///
/// ```
/// use errkit::Frame;
///
/// let frame = Frame::new("src/store/users.rs", "app::store::Users::load", 88);
/// assert_eq!(frame.to_string(), "users.rs:88[load]");
/// assert_eq!(format!("{frame:#}"), "app::store::Users::load\n\tsrc/store/users.rs:88");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, serde::Serialize)]
pub struct Frame {
    /// Source file path
    file: String,
    /// Qualified function name, empty when it could not be resolved
    function: String,
    /// Line number
    line: u32,
}

impl Frame {
    /// Create a frame.
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// Whether this frame is empty. Frames without a file are never attached.
    pub fn is_empty(&self) -> bool {
        self.file.is_empty()
    }

    /// The base name of the file.
    pub fn file_name(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }

    /// The function name without module or type qualifiers.
    pub fn bare_function(&self) -> &str {
        bare_name(&self.function)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}\n\t{}:{}", self.function, self.file, self.line)
        } else {
            write!(f, "{}:{}[{}]", self.file_name(), self.line, self.bare_function())
        }
    }
}

// Closures show up as `{{closure}}` segments; report the enclosing function.
fn bare_name(name: &str) -> &str {
    name.rsplit("::")
        .find(|segment| !segment.starts_with("{{"))
        .unwrap_or(name)
}

/// Frames of an error chain, outermost first.
///
/// Renders inline as `[ a.rs:1[f], b.rs:2[g] ]`, or `[]` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct StackFrames(Vec<Frame>);

impl StackFrames {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no frames were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the frames, outermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.0.iter()
    }

    /// Default renderings of every frame, as used in logging fields.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(Frame::to_string).collect()
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }
}

impl From<Vec<Frame>> for StackFrames {
    fn from(frames: Vec<Frame>) -> Self {
        Self(frames)
    }
}

impl std::ops::Index<usize> for StackFrames {
    type Output = Frame;

    fn index(&self, index: usize) -> &Frame {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a StackFrames {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for StackFrames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("[]");
        }
        f.write_str("[ ")?;
        for (i, frame) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if f.alternate() {
                write!(f, "{frame:#}")?;
            } else {
                write!(f, "{frame}")?;
            }
        }
        f.write_str(" ]")
    }
}

/// Capture the frame `skip` levels above `location`.
///
/// `location` comes from a `#[track_caller]` constructor and is always the
/// direct caller. `None` as skip disables capture.
pub(crate) fn capture(location: &'static Location<'static>, skip: Option<usize>) -> Option<Frame> {
    let skip = skip?;

    #[cfg(feature = "symbols")]
    {
        if let Some(frame) = symbols::resolve(location, skip) {
            return Some(frame);
        }
    }

    if skip == 0 {
        return Some(Frame::new(location.file(), "", location.line()));
    }

    tracing::trace!(
        file = location.file(),
        line = location.line(),
        skip,
        "Caller frame could not be resolved"
    );
    None
}

#[cfg(feature = "symbols")]
mod symbols {
    use super::Frame;
    use backtrace::Symbol;
    use std::panic::Location;

    /// Raw frames walked before giving up on finding the anchor.
    const MAX_FRAMES: usize = 128;

    /// Walk the stack, anchor on `location` and step `skip` logical frames
    /// outward. Inlined functions count as frames.
    ///
    /// Frames are symbolized one at a time and the walk stops as soon as the
    /// wanted frame is resolved. The anchor must match both file and line;
    /// debug info that places the call on another line leaves the function
    /// name unresolved.
    pub(super) fn resolve(location: &'static Location<'static>, skip: usize) -> Option<Frame> {
        walk(location, skip).found
    }

    pub(super) struct Walk {
        location: &'static Location<'static>,
        skip: usize,
        /// Symbols seen since the anchor
        since_anchor: Option<usize>,
        done: bool,
        pub(super) found: Option<Frame>,
        pub(super) frames: usize,
    }

    impl Walk {
        fn visit(&mut self, symbol: &Symbol) {
            if self.done {
                return;
            }
            match self.since_anchor {
                None if is_anchor(symbol, self.location) => {
                    if self.skip == 0 {
                        self.finish(Some(Frame::new(
                            self.location.file(),
                            function_name(symbol),
                            self.location.line(),
                        )));
                    } else {
                        self.since_anchor = Some(0);
                    }
                }
                None => {}
                Some(seen) if seen + 1 == self.skip => {
                    let frame = symbol.filename().map(|file| {
                        Frame::new(
                            file.display().to_string(),
                            function_name(symbol),
                            symbol.lineno().unwrap_or_default(),
                        )
                    });
                    self.finish(frame);
                }
                Some(seen) => self.since_anchor = Some(seen + 1),
            }
        }

        fn finish(&mut self, frame: Option<Frame>) {
            self.found = frame;
            self.done = true;
        }
    }

    pub(super) fn walk(location: &'static Location<'static>, skip: usize) -> Walk {
        let mut walk = Walk {
            location,
            skip,
            since_anchor: None,
            done: false,
            found: None,
            frames: 0,
        };
        backtrace::trace(|frame| {
            walk.frames += 1;
            backtrace::resolve_frame(frame, |symbol| walk.visit(symbol));
            !walk.done && walk.frames < MAX_FRAMES
        });
        walk
    }

    fn is_anchor(symbol: &Symbol, location: &Location<'_>) -> bool {
        symbol.lineno() == Some(location.line())
            && symbol
                .filename()
                .is_some_and(|file| file.ends_with(location.file()))
    }

    fn function_name(symbol: &Symbol) -> String {
        symbol
            .name()
            .map(|name| format!("{name:#}"))
            .unwrap_or_default()
    }
}
