use futures::{Stream, StreamExt};
use mongodb::{IndexModel, bson::Document, error::ErrorKind as DriverErrorKind};
use tracing::{debug, instrument};

use super::{MongoClient, MongoError, MongoResult};

impl MongoClient {
    #[instrument(skip(self, index))]
    pub async fn create_index(&self, collection: &str, index: IndexModel) -> MongoResult<()> {
        self.collection::<Document>(collection)
            .create_index(index)
            .await
            .map(|_| ())
            .map_err(|e| MongoError::operation(format!("create index on '{}'", collection), e))
    }

    #[instrument(skip(self, indexes), fields(count = indexes.len()))]
    pub async fn create_indexes(
        &self,
        collection: &str,
        indexes: Vec<IndexModel>,
    ) -> MongoResult<()> {
        self.collection::<Document>(collection)
            .create_indexes(indexes)
            .await
            .map(|_| ())
            .map_err(|e| MongoError::operation(format!("create indexes on '{}'", collection), e))
    }

    #[instrument(skip(self))]
    pub async fn drop_index(&self, collection: &str, index_name: &str) -> MongoResult<()> {
        self.collection::<Document>(collection)
            .drop_index(index_name)
            .await
            .map_err(|e| {
                MongoError::operation(
                    format!("drop index '{}' on '{}'", index_name, collection),
                    e,
                )
            })
    }

    /// List index names in server order.
    ///
    /// Index documents that fail to decode, or carry no string `name`, are
    /// skipped. The cursor is released before this returns.
    #[instrument(skip(self))]
    pub async fn list_indexes(&self, collection: &str) -> MongoResult<Vec<String>> {
        let operation = format!("list indexes on '{}'", collection);
        let cursor = self
            .collection::<Document>(collection)
            .list_indexes()
            .await
            .map_err(|e| MongoError::operation(operation.clone(), e))?
            .with_type::<Document>();

        collect_index_names(cursor, &operation).await
    }
}

/// Drain a stream of index documents into their names.
///
/// Decode failures are skipped; any other error ends the listing. The stream is
/// dropped on return, which for a driver cursor kills it server-side.
async fn collect_index_names<S>(mut indexes: S, operation: &str) -> MongoResult<Vec<String>>
where
    S: Stream<Item = mongodb::error::Result<Document>> + Unpin,
{
    let mut names = Vec::new();

    while let Some(next) = indexes.next().await {
        match next {
            Ok(index) => match index.get_str("name") {
                Ok(name) => names.push(name.to_string()),
                Err(_) => debug!(?index, "Skipping index document without a name"),
            },
            Err(e) if matches!(*e.kind, DriverErrorKind::BsonDeserialization { .. }) => {
                debug!(error = %e, "Skipping undecodable index document");
            }
            Err(e) => return Err(MongoError::operation(operation, e)),
        }
    }

    Ok(names)
}
