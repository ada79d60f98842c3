use std::path::PathBuf;
use thiserror::Error;

pub type RelcopyResult<T> = Result<T, RelcopyError>;

#[derive(Error, Debug)]
pub enum RelcopyError {
    /// Reading or writing a staged file (or the staging directory itself) failed.
    #[error("Failed to access {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosting API answered 404 for the requested resource.
    #[error("Not found: {what}")]
    NotFound { what: String, body: Option<String> },

    /// The hosting API answered with a non-success status other than 404.
    #[error("{message} (HTTP {status})")]
    Transport {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// Wraps another error with the tag or asset it was raised for.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RelcopyError>,
    },
}

impl RelcopyError {
    /// A missing resource with no response payload.
    pub fn not_found(what: impl Into<String>) -> Self {
        RelcopyError::NotFound {
            what: what.into(),
            body: None,
        }
    }

    /// Wrap this error with a short description of the unit of work that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        RelcopyError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any `Context` wrappers.
    pub fn root(&self) -> &RelcopyError {
        let mut current = self;
        while let RelcopyError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// HTTP status code reported by the remote, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            RelcopyError::NotFound { .. } => Some(404),
            RelcopyError::Transport { status, .. } => Some(*status),
            RelcopyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response payload returned by the remote, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self.root() {
            RelcopyError::Transport { body, .. } | RelcopyError::NotFound { body, .. } => {
                body.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Attach context to the error side of a `RelcopyResult`.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> RelcopyResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for RelcopyResult<T> {
    fn with_context<F, S>(self, f: F) -> RelcopyResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
