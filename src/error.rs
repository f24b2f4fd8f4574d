use thiserror::Error;

/// Record bytes quoted in a "record too long" diagnostic.
const RECORD_PREVIEW: usize = 30;
/// Separator bytes quoted in a "separator too long" diagnostic.
const SEP_PREVIEW: usize = 10;

/// All error types for awkcore.
///
/// Every variant is fatal to the processing session: the engine never
/// retries or substitutes a default after returning one of these. Callers
/// are expected to propagate them to the session boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("can't open file {0}")]
    CannotOpenFile(String),

    #[error("input record `{0}...' too long")]
    RecordTooLong(String),

    #[error("field separator {0}... is too long")]
    FieldSepTooLong(String),

    #[error("trying to access out of range field {0}")]
    FieldIndex(i64),

    #[error("out of space creating {0} fields")]
    FieldTableOverflow(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn cannot_open(file: impl Into<String>) -> Self {
        Self::CannotOpenFile(file.into())
    }

    pub(crate) fn record_too_long(data: &[u8]) -> Self {
        Self::RecordTooLong(preview(&String::from_utf8_lossy(data), RECORD_PREVIEW))
    }

    pub(crate) fn field_sep_too_long(sep: &str) -> Self {
        Self::FieldSepTooLong(preview(sep, SEP_PREVIEW))
    }
}

/// Truncate `s` to at most `limit` characters, escaping control characters
/// so the diagnostic stays on one line.
fn preview(s: &str, limit: usize) -> String {
    let mut out = String::with_capacity(limit + 2);
    for c in s.chars().take(limit) {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Result type alias for awkcore operations
pub type Result<T> = std::result::Result<T, Error>;
