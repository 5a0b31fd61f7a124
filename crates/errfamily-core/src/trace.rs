//! Caller-site anchored traces.
//!
//! Construction machinery must never be the visible origin of an error.
//! Two mechanisms cooperate to keep the trace pointed at user code:
//!
//! - every public construction entry point is `#[track_caller]`, so the
//!   recorded [`Location`] is the exact file/line/column of the invoking
//!   call-site, immune to inlining and symbol stripping;
//! - a backtrace is captured eagerly and rendered to text with the leading
//!   frames of std's capture plumbing and of this crate stripped, so the
//!   first remaining frame belongs to the caller.
//!
//! Frame stripping is textual and best-effort; the [`Location`] anchor is
//! the authoritative origin.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

/// Anchored trace of one error construction.
///
/// Capture is eager and unconditional, independent of `RUST_BACKTRACE`;
/// building an error is priced like constructing a [`Backtrace`].
pub struct CallerTrace {
    origin: &'static Location<'static>,
    frames: String,
}

impl CallerTrace {
    pub(crate) fn capture(origin: &'static Location<'static>) -> Self {
        let backtrace = Backtrace::force_capture();
        Self {
            origin,
            frames: strip_machinery(&backtrace.to_string()),
        }
    }

    /// Exact file/line/column of the constructing call-site.
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    /// Captured frames at and below the call-site, machinery stripped
    /// and renumbered from zero.
    pub fn frames(&self) -> &str {
        &self.frames
    }
}

impl fmt::Display for CallerTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "at {}:{}:{}",
            self.origin.file(),
            self.origin.line(),
            self.origin.column()
        )?;
        f.write_str(&self.frames)
    }
}

impl fmt::Debug for CallerTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CallerTrace({}:{})",
            self.origin.file(),
            self.origin.line()
        )
    }
}

/// Symbol prefixes of capture plumbing. Everything from the top of the
/// trace down to the first frame outside these prefixes is dropped.
fn is_machinery(symbol: &str) -> bool {
    const MACHINERY: &[&str] = &[
        "std::backtrace",
        "backtrace::",
        "errfamily_core::",
        "<errfamily_core::",
    ];
    MACHINERY.iter().any(|prefix| symbol.starts_with(prefix))
}

/// Frame header lines look like `   4: module::function`; continuation
/// lines (`at src/file.rs:10:5`) carry no index.
fn frame_symbol(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let digits = trimmed
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[digits..].strip_prefix(": ")
}

/// Drop the leading machinery frames of a rendered backtrace and renumber
/// the rest from zero. Unparseable input passes through unchanged, and a
/// trace consisting only of machinery is kept whole rather than emptied.
fn strip_machinery(raw: &str) -> String {
    struct Frame<'a> {
        symbol: &'a str,
        continuations: Vec<&'a str>,
    }

    let mut frames: Vec<Frame<'_>> = Vec::new();
    for line in raw.lines() {
        match frame_symbol(line) {
            Some(symbol) => frames.push(Frame {
                symbol,
                continuations: Vec::new(),
            }),
            None => match frames.last_mut() {
                Some(frame) => frame.continuations.push(line),
                None => return raw.trim_end().to_owned(),
            },
        }
    }
    if frames.is_empty() {
        return raw.trim_end().to_owned();
    }

    let first_kept = frames
        .iter()
        .position(|frame| !is_machinery(frame.symbol))
        .unwrap_or(0);

    let mut out = String::new();
    for (index, frame) in frames[first_kept..].iter().enumerate() {
        out.push_str(&format!("{index:4}: {}\n", frame.symbol));
        for continuation in &frame.continuations {
            out.push_str(continuation);
            out.push('\n');
        }
    }
    out
}
