//! Build outcome types.

use std::fmt;
use std::time::SystemTime;

/// Outcome of one bundler invocation. Exactly one of the two holds.
#[derive(Debug, Clone)]
pub enum BuildResult {
    Success(Bundle),
    /// Ordered as reported by the bundler; never empty.
    Failure(Vec<Diagnostic>),
}

impl BuildResult {
    /// Failure with a single diagnostic.
    pub fn fail(diagnostic: Diagnostic) -> Self {
        Self::Failure(vec![diagnostic])
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        match self {
            Self::Success(bundle) => Some(bundle),
            Self::Failure(_) => None,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(diagnostics) => diagnostics,
        }
    }
}

/// A complete bundle as produced by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub bytes: Vec<u8>,
    pub built_at: SystemTime,
}

impl Bundle {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            built_at: SystemTime::now(),
        }
    }

    /// Bundle source as text (bundles are UTF-8 JavaScript).
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One build problem, normalized for display.
///
/// Bundler compile errors, bundler crashes and output I/O failures all end
/// up in this shape before reaching the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Source excerpt, location or error chain. May be empty.
    pub trace: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(message, String::new())
    }

    /// Wrap an error, keeping its whole `source()` chain as the trace.
    pub fn from_error(message: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message, trace)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for line in self.trace.lines() {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}

/// Render a diagnostic list as one block (blank line between entries).
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Human-readable byte size: `512 B`, `12.4 KiB`, `1.2 MiB`.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    #[allow(clippy::cast_precision_loss)]
    let size = bytes as f64;
    if size < KIB {
        format!("{bytes} B")
    } else if size < KIB * KIB {
        format!("{:.1} KiB", size / KIB)
    } else {
        format!("{:.1} MiB", size / (KIB * KIB))
    }
}
