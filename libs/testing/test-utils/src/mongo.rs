//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a MongoDB container for testing.

use mongodb::Client;
use mongodb::bson::doc;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let uri = mongo.connection_string();
/// // Build your client config from `mongo.host()` / `mongo.port()` or `uri`
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    host: String,
    port: u16,
    pub connection_string: String,
}

impl TestMongo {
    /// Create a new standalone MongoDB instance and wait until it answers a ping
    ///
    /// Uses the MongoDB 7.0 image by default.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let host = "127.0.0.1".to_string();
        let connection_string = format!("mongodb://{}:{}/?directConnection=true", host, port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .expect("Failed to ping MongoDB");

        tracing::info!(port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            host,
            port,
            connection_string,
        }
    }

    /// Host the container is reachable on
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Host port mapped to the container's 27017
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

// Container is automatically cleaned up when TestMongo is dropped
impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
