use std::fmt;

/// Bytes of a driver log shown by default when a diagnostic is printed.
pub const DEFAULT_DISPLAY_LIMIT: usize = 512;

const EMPTY_LOG: &str = "driver reported a failure without an info log";

/// Full diagnostic text returned by the driver for a failed compile or link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLog(String);

impl InfoLog {
    /// Wraps a driver log. Drivers are allowed to fail with an empty log, in
    /// which case a placeholder message is kept so the diagnostic is never blank.
    pub fn from_driver(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self(EMPTY_LOG.to_owned())
        } else {
            Self(trimmed.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View of the log limited to `limit` bytes for printing.
    pub fn capped(&self, limit: usize) -> CappedLog<'_> {
        CappedLog {
            text: &self.0,
            limit,
        }
    }
}

impl fmt::Display for InfoLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display adapter that cuts a log at a byte limit and says how much it hid.
#[derive(Debug, Clone, Copy)]
pub struct CappedLog<'a> {
    text: &'a str,
    limit: usize,
}

impl CappedLog<'_> {
    pub fn is_truncated(&self) -> bool {
        self.text.len() > self.limit
    }

    fn head(&self) -> &str {
        if !self.is_truncated() {
            return self.text;
        }
        let mut end = self.limit;
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        &self.text[..end]
    }
}

impl fmt::Display for CappedLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.head();
        f.write_str(head)?;
        if self.is_truncated() {
            let hidden = self.text.len() - head.len();
            write!(f, "\n... [{} more bytes truncated]", hidden)?;
        }
        Ok(())
    }
}
