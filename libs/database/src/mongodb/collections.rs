use mongodb::bson::{Document, doc};
use tracing::instrument;

use super::{MongoClient, MongoError, MongoResult};

impl MongoClient {
    /// List the collection names of the selected database
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> MongoResult<Vec<String>> {
        self.database()
            .list_collection_names()
            .await
            .map_err(|e| MongoError::operation("list collections", e))
    }

    /// Create a collection, failing if it already exists
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> MongoResult<()> {
        self.database()
            .create_collection(name)
            .await
            .map_err(|e| MongoError::operation(format!("create collection '{}'", name), e))
    }

    #[instrument(skip(self))]
    pub async fn drop_collection(&self, name: &str) -> MongoResult<()> {
        self.collection::<Document>(name)
            .drop()
            .await
            .map_err(|e| MongoError::operation(format!("drop collection '{}'", name), e))
    }

    /// Whether a collection with exactly this name exists.
    ///
    /// Returns `Ok(false)` when it does not.
    #[instrument(skip(self))]
    pub async fn has_collection(&self, name: &str) -> MongoResult<bool> {
        let names = self
            .database()
            .list_collection_names()
            .filter(doc! { "name": name })
            .await
            .map_err(|e| MongoError::operation(format!("look up collection '{}'", name), e))?;

        Ok(contains_exact(&names, name))
    }
}

fn contains_exact(names: &[String], name: &str) -> bool {
    names.iter().any(|candidate| candidate == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_exact() {
        let names = vec!["users".to_string(), "users_archive".to_string()];
        assert!(contains_exact(&names, "users"));
        assert!(!contains_exact(&names, "user"));
        assert!(!contains_exact(&names, "Users"));
        assert!(!contains_exact(&[], "users"));
    }
}
