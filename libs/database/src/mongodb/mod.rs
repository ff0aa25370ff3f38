//! MongoDB client façade and utilities
//!
//! [`MongoConfig`] resolves the connection string and pool/timeout settings,
//! [`MongoClient`] opens and verifies the connection and wraps collection,
//! index and admin-command calls of the driver.

mod collections;
mod config;
mod connector;
mod error;
mod health;
mod indexes;
mod stats;

pub use config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_URI, MongoConfig};
pub use connector::MongoClient;
pub use error::{ErrorKind, MongoError, MongoResult, Phase};
pub use health::HealthStatus;

// Re-export MongoDB types for convenience
pub use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
};
