use mongodb::bson;
use std::fmt;
use std::time::Duration;

/// Lifecycle step bounded by `MongoConfig::timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Ping,
    Disconnect,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Phase::Connect => "connect to MongoDB",
            Phase::Ping => "ping MongoDB",
            Phase::Disconnect => "disconnect from MongoDB",
        };
        f.write_str(phase)
    }
}

/// Coarse classification of a [`MongoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client could not be opened or verified
    Connection,
    /// A collection, index or admin command call failed
    Operation,
    /// A reply could not be decoded into the requested shape
    Decode,
}

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("failed to ping MongoDB: {0}")]
    Ping(#[source] mongodb::error::Error),

    #[error("failed to {phase}: timed out after {timeout:?}")]
    Timeout { phase: Phase, timeout: Duration },

    #[error("failed to {operation}: {source}")]
    Operation {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to decode {target}: {source}")]
    Decode {
        target: String,
        #[source]
        source: bson::de::Error,
    },
}

impl MongoError {
    pub(crate) fn operation(operation: impl Into<String>, source: mongodb::error::Error) -> Self {
        MongoError::Operation {
            operation: operation.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MongoError::Connect(_) | MongoError::Ping(_) => ErrorKind::Connection,
            MongoError::Timeout { phase, .. } => match phase {
                Phase::Connect | Phase::Ping => ErrorKind::Connection,
                Phase::Disconnect => ErrorKind::Operation,
            },
            MongoError::Operation { .. } => ErrorKind::Operation,
            MongoError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn is_connection_failure(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

/// Result type alias for MongoDB operations
pub type MongoResult<T> = Result<T, MongoError>;
