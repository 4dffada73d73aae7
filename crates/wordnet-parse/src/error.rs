use thiserror::Error;

/// A single malformed line. Carries the offending text so the caller can
/// decide whether to skip it or propagate, per spec: a data source's
/// iterator skips comment lines unconditionally but never silently skips a
/// misformatted data line.
#[derive(Debug, Error, Clone)]
#[error("misformatted line: {reason} ({line:?})")]
pub struct MisformattedLine {
    pub line: String,
    pub reason: String,
}

impl MisformattedLine {
    pub fn new(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MisformattedLine>;
