use std::io;

use thiserror::Error;

/// Which half of the catalog failed to enumerate
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Source {
    /// The read-only asset store packaged with the application
    Bundled,
    /// The writable model directory on external storage
    External,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to enumerate {source_kind:?} models: {source}")]
    Enumeration {
        source_kind: Source,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    pub(crate) fn bundled(source: io::Error) -> Self {
        CatalogError::Enumeration {
            source_kind: Source::Bundled,
            source,
        }
    }

    pub(crate) fn external(source: io::Error) -> Self {
        CatalogError::Enumeration {
            source_kind: Source::External,
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("Selection {index} is out of range for a catalog of {len} entries")]
    OutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Java VM or JNI error, including Java exceptions: {0}")]
    Java(String),

    #[error("Viewer session could not be started: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to load native library \"{name}\": {reason}")]
    Load { name: String, reason: String },

    #[error("Native library \"{name}\" has not been loaded")]
    NotLoaded { name: String },

    #[error("Symbol \"{symbol}\" not found in \"{name}\": {reason}")]
    Symbol {
        name: String,
        symbol: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to open model \"{reference}\": {source}")]
    Open {
        reference: String,
        #[source]
        source: io::Error,
    },

    #[error("Model \"{reference}\" is empty")]
    Empty { reference: String },
}

impl ModelError {
    pub(crate) fn open(reference: impl Into<String>, source: io::Error) -> Self {
        ModelError::Open {
            reference: reference.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

// XXX: we don't want to expose jni-rs in the public API so the Android
// backend uses this internal error type and strips it down to a
// `LaunchError` at the edge.
#[cfg(target_os = "android")]
#[derive(Error, Debug)]
pub(crate) enum InternalError {
    #[error("A JNI error")]
    JniError(jni::errors::JniError),
    #[error("A Java Exception was thrown via a JNI method call")]
    JniException(String),
    #[error("A Java VM error")]
    JvmError(jni::errors::Error),
}

#[cfg(target_os = "android")]
pub(crate) type InternalResult<T> = std::result::Result<T, InternalError>;

#[cfg(target_os = "android")]
impl From<jni::errors::Error> for InternalError {
    fn from(value: jni::errors::Error) -> Self {
        InternalError::JvmError(value)
    }
}

#[cfg(target_os = "android")]
impl From<jni::errors::JniError> for InternalError {
    fn from(value: jni::errors::JniError) -> Self {
        InternalError::JniError(value)
    }
}

#[cfg(target_os = "android")]
impl From<InternalError> for LaunchError {
    fn from(value: InternalError) -> Self {
        match value {
            InternalError::JniError(err) => LaunchError::Java(err.to_string()),
            InternalError::JniException(msg) => LaunchError::Java(msg),
            InternalError::JvmError(err) => LaunchError::Java(err.to_string()),
        }
    }
}

