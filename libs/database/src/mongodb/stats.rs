use mongodb::bson::{self, Document, doc};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{MongoClient, MongoError, MongoResult};

impl MongoClient {
    /// `serverStatus` reply as an untyped document
    #[instrument(skip(self))]
    pub async fn server_status(&self) -> MongoResult<Document> {
        self.run_command_as(doc! { "serverStatus": 1 }, "serverStatus")
            .await
    }

    /// `dbStats` reply for the selected database
    #[instrument(skip(self))]
    pub async fn database_stats(&self) -> MongoResult<Document> {
        self.run_command_as(doc! { "dbStats": 1 }, "dbStats").await
    }

    /// `collStats` reply for one collection
    #[instrument(skip(self))]
    pub async fn collection_stats(&self, collection: &str) -> MongoResult<Document> {
        self.run_command_as(doc! { "collStats": collection }, "collStats")
            .await
    }

    /// Run a command against the selected database and decode its reply into `T`.
    ///
    /// `name` labels the command in errors.
    pub async fn run_command_as<T: DeserializeOwned>(
        &self,
        command: Document,
        name: &str,
    ) -> MongoResult<T> {
        let reply = self
            .database()
            .run_command(command)
            .await
            .map_err(|e| MongoError::operation(format!("run {}", name), e))?;

        decode_reply(reply, name)
    }
}

fn decode_reply<T: DeserializeOwned>(reply: Document, name: &str) -> MongoResult<T> {
    bson::from_document(reply).map_err(|source| MongoError::Decode {
        target: format!("{} reply", name),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mongodb::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct DbStats {
        db: String,
        collections: i64,
        ok: f64,
    }

    #[test]
    fn test_decode_reply_untyped_keeps_order() {
        let reply = doc! { "db": "orders", "collections": 3_i64, "ok": 1.0 };
        let decoded: Document = decode_reply(reply.clone(), "dbStats").unwrap();
        let keys: Vec<&String> = decoded.keys().collect();
        assert_eq!(keys, vec!["db", "collections", "ok"]);
        assert_eq!(decoded, reply);
    }

    #[test]
    fn test_decode_reply_typed() {
        let reply = doc! { "db": "orders", "collections": 3_i64, "ok": 1.0 };
        let stats: DbStats = decode_reply(reply, "dbStats").unwrap();
        assert_eq!(stats.db, "orders");
        assert_eq!(stats.collections, 3);
        assert_eq!(stats.ok, 1.0);
    }

    #[test]
    fn test_decode_reply_shape_mismatch() {
        let reply = doc! { "db": 42, "ok": 1.0 };
        let err = decode_reply::<DbStats>(reply, "dbStats").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("failed to decode dbStats reply"));
    }
}
