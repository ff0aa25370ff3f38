use mongodb::{
    Client, Collection, Database,
    bson::doc,
    options::{ClientOptions, ReadPreference, SelectionCriteria},
};
use std::future::IntoFuture;
use std::time::Duration;
use tracing::{info, instrument};

use super::{MongoConfig, MongoError, MongoResult, Phase};

/// MongoDB client bound to one database
///
/// Owns the driver [`Client`] (itself a pooled, internally synchronized handle),
/// the selected [`Database`] and the configuration it was built from. Share it
/// between tasks by reference or behind an `Arc`.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoClient, MongoConfig};
///
/// let client = MongoClient::new(Some(MongoConfig::with_database(
///     "mongodb://localhost:27017",
///     "orders",
/// )))
/// .await?;
///
/// let names = client.list_collections().await?;
/// client.close().await?;
/// ```
#[derive(Debug)]
pub struct MongoClient {
    client: Client,
    database: Database,
    config: MongoConfig,
}

impl MongoClient {
    /// Open a client and verify it with a primary ping.
    ///
    /// `None` uses [`MongoConfig::default`]. Opening and pinging are each bounded
    /// by `config.timeout`. Nothing is returned unless both succeed.
    pub async fn new(config: Option<MongoConfig>) -> MongoResult<Self> {
        let config = config.unwrap_or_default();
        let database_name = config.database.clone();

        info!(
            uri = %config.redacted_uri(),
            database = %database_name,
            "Attempting to connect to MongoDB"
        );

        let client = bounded(Phase::Connect, config.timeout, open_client(&config)).await??;
        bounded(Phase::Ping, config.timeout, ping_primary(&client)).await??;

        let database = client.database(&database_name);

        info!(database = %database_name, "Successfully connected to MongoDB");
        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Get the underlying driver client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the selected database
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Get a typed handle to a collection of the selected database
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection::<T>(name)
    }

    /// Get the configuration this client was built from
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// Ping the primary within `config.timeout`
    #[instrument(skip(self))]
    pub async fn ping(&self) -> MongoResult<()> {
        bounded(Phase::Ping, self.config.timeout, ping_primary(&self.client)).await?
    }

    /// Shut the client down within `config.timeout`.
    ///
    /// Consumes the client. Shutdown waits for outstanding cursors and sessions
    /// created from it, so drop those first.
    pub async fn close(self) -> MongoResult<()> {
        let timeout = self.config.timeout;
        bounded(Phase::Disconnect, timeout, self.client.shutdown()).await?;
        info!(database = %self.config.database, "MongoDB client closed");
        Ok(())
    }
}

/// Build driver options from the config
///
/// Settings from the config take precedence over the same options in the URI.
/// `compress_level` is not applied.
async fn client_options(config: &MongoConfig) -> MongoResult<ClientOptions> {
    let mut options = ClientOptions::parse(config.connection_uri())
        .await
        .map_err(MongoError::Connect)?;
    apply_config(&mut options, config);
    Ok(options)
}

fn apply_config(options: &mut ClientOptions, config: &MongoConfig) {
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.max_idle_time = Some(config.max_conn_idle);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_timeout);

    if !config.replica_set.is_empty() {
        options.repl_set_name = Some(config.replica_set.clone());
    }
}

async fn open_client(config: &MongoConfig) -> MongoResult<Client> {
    let options = client_options(config).await?;
    Client::with_options(options).map_err(MongoError::Connect)
}

async fn ping_primary(client: &Client) -> MongoResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
        .await
        .map(|_| ())
        .map_err(MongoError::Ping)
}

/// Run `fut` under a deadline, reporting an elapsed deadline as a timeout in `phase`
async fn bounded<F, T>(phase: Phase, timeout: Duration, fut: F) -> MongoResult<T>
where
    F: IntoFuture<Output = T>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| MongoError::Timeout { phase, timeout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mongodb::ErrorKind;

    #[tokio::test]
    async fn test_client_options_from_default_config() {
        let config = MongoConfig::default();
        let options = client_options(&config).await.unwrap();

        assert_eq!(options.max_pool_size, Some(100));
        assert_eq!(options.min_pool_size, Some(10));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(300)));
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.repl_set_name, None);
    }

    #[tokio::test]
    async fn test_client_options_replica_set_and_overrides() {
        let mut config = MongoConfig::new("mongodb://db-0:27017,db-1:27017/?maxPoolSize=7")
            .with_replica_set("rs0");
        config.max_pool_size = 25;

        let options = client_options(&config).await.unwrap();
        assert_eq!(options.hosts.len(), 2);
        assert_eq!(options.repl_set_name.as_deref(), Some("rs0"));
        assert_eq!(options.max_pool_size, Some(25));
    }

    #[tokio::test]
    async fn test_client_options_rejects_bad_uri() {
        let config = MongoConfig::new("postgres://localhost:5432");
        let err = client_options(&config).await.unwrap_err();
        assert!(matches!(err, MongoError::Connect(_)));
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[tokio::test]
    async fn test_bounded_reports_phase_on_timeout() {
        let result = bounded(
            Phase::Ping,
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;

        match result {
            Err(MongoError::Timeout { phase, timeout }) => {
                assert_eq!(phase, Phase::Ping);
                assert_eq!(timeout, Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_passes_value_through() {
        let value = bounded(Phase::Connect, Duration::from_secs(1), async { 42 })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_new_fails_fast_on_unreachable_server() {
        let mut config = MongoConfig::new("mongodb://127.0.0.1:1/?directConnection=true");
        config.server_timeout = Duration::from_millis(200);
        config.connect_timeout = Duration::from_millis(200);
        config.timeout = Duration::from_secs(5);

        let err = MongoClient::new(Some(config)).await.unwrap_err();
        assert!(err.is_connection_failure());
        assert!(matches!(err, MongoError::Ping(_)));
        assert!(err.to_string().starts_with("failed to ping MongoDB"));
    }
}
