use std::time::Instant;

use super::MongoClient;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Optional message (e.g., error details)
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl MongoClient {
    /// Check MongoDB health with a primary ping
    ///
    /// # Example
    /// ```ignore
    /// let client = MongoClient::new(None).await?;
    /// if !client.check_health().await {
    ///     tracing::warn!("MongoDB is not reachable");
    /// }
    /// ```
    pub async fn check_health(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Check MongoDB health with timing information and the error message, if any
    pub async fn check_health_detailed(&self) -> HealthStatus {
        let start = Instant::now();
        let result = self.ping().await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthStatus {
                healthy: true,
                message: None,
                response_time_ms,
            },
            Err(e) => HealthStatus {
                healthy: false,
                message: Some(e.to_string()),
                response_time_ms,
            },
        }
    }
}
