use std::fmt::{Debug, Display};

/// Category of an [`Error`].
///
/// The core only ever produces one of these four; I/O collaborators and
/// storage backends surface their own failures as [`ErrorKind::Io`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied argument violates a construction invariant, or a
    /// value was requested before it is available (e.g. `footer_size()`
    /// before `close()`).
    InvalidArgument,
    /// Bytes read from a source do not conform to the Puffin file format:
    /// missing magic, truncated trailer, undecodable JSON, unknown codec
    /// name, failed decompression.
    InvalidFormat,
    /// Operation attempted in a state that forbids it: write after close,
    /// double-close on a writer that failed.
    InvalidState,
    /// The underlying sink/source failed.
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::InvalidState => "InvalidState",
            ErrorKind::Io => "Io",
        };
        write!(f, "{s}")
    }
}

/// The error type returned by every fallible operation in this crate.
///
/// Carries a [`ErrorKind`], a human-readable message, zero or more
/// `(key, value)` context pairs attached along the way with
/// [`Error::with_context`], and an optional source error.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attach a `(key, value)` pair of diagnostic context. Pairs are kept
    /// in the order they were attached and rendered in `Display`.
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = f.debug_struct("Error");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if !self.context.is_empty() {
            builder.field("context", &self.context);
        }
        if let Some(source) = &self.source {
            builder.field("source", &source.to_string());
        }
        builder.finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} => {}", self.kind, self.message)?;
        for (key, value) in &self.context {
            write!(f, ", {key}: {value}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, value.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Error::new(ErrorKind::InvalidArgument, value.to_string())
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(value: std::num::TryFromIntError) -> Self {
        Error::new(ErrorKind::InvalidArgument, value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
