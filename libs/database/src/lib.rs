//! MongoDB connection library
//!
//! Builds a pooled MongoDB client from a [`mongodb::MongoConfig`], verifies it
//! with a ping and exposes thin helpers over the driver for collections,
//! indexes and admin statistics.
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb::{IndexModel, MongoClient, MongoConfig, doc};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = MongoClient::new(Some(config)).await?;
//!
//! if !client.has_collection("users").await? {
//!     client.create_collection("users").await?;
//! }
//! client
//!     .create_index("users", IndexModel::builder().keys(doc! { "email": 1 }).build())
//!     .await?;
//!
//! let stats = client.collection_stats("users").await?;
//! client.close().await?;
//! ```

pub mod mongodb;
