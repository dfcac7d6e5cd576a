/// Errors generated by this crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A stream names a technique (or a combination of techniques) that is not supported.
    #[error("unsupported technique: {0}")]
    UnsupportedTechnique(String),
    /// The data is valid but the feature needed to process it is not implemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),
    /// A read went past the end of the buffer or of a declared byte range.
    #[error("out of bounds: needed {needed} bytes at offset {offset} but only {len} are available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },
    /// When the data is known to be structurally inconsistent.
    #[error("{0}")]
    OutOfSpec(String),
}

impl Error {
    pub(crate) fn oos<I: Into<String>>(message: I) -> Self {
        Self::OutOfSpec(message.into())
    }

    pub(crate) fn unsupported<I: Into<String>>(message: I) -> Self {
        Self::UnsupportedTechnique(message.into())
    }
}

/// A specialized `Result` for codec errors.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! oos {
    ($fmt:expr) => ($crate::error::Error::oos($fmt));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::oos(format!($fmt, $($args),*)));
}
