//! Typed error kinds for loading, preprocessing and serving.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// An input file is absent.
    InputMissing(PathBuf),

    /// Short read, wrong record size or otherwise unreadable input.
    InputCorrupt(String),

    /// The graph has no usable edges after loading.
    EmptyGraph,

    /// Speed-profile evaluation failed during preprocessing.
    ProfileError(String),

    /// The server could not bind its listening socket.
    BindFailed(String),

    /// A client request did not parse; rendered as HTTP 400.
    MalformedRequest(usize),

    /// Anything that should surface as HTTP 500.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputMissing(path) => {
                write!(f, "input file {} does not exist", path.display())
            }
            Error::InputCorrupt(msg) => write!(f, "corrupt input: {msg}"),
            Error::EmptyGraph => write!(f, "the input data is empty"),
            Error::ProfileError(msg) => write!(f, "profile error: {msg}"),
            Error::BindFailed(msg) => write!(f, "could not bind listening socket: {msg}"),
            Error::MalformedRequest(position) => {
                write!(f, "query string malformed close to position {position}")
            }
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Error::InputMissing(PathBuf::new())
        } else {
            Error::InputCorrupt(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
