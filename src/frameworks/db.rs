use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Database};

use crate::domain::ports::DatabaseLifecycle;

// MongoDB-backed implementation of the connection lifecycle. The driver
// resolves servers lazily, so `open` only parses the URI; `connect` performs
// a ping to prove the deployment is actually reachable before the server
// reports ready.
pub struct MongoDatabase {
    client: Option<Client>,
    database: Database,
}

impl MongoDatabase {
    pub async fn open(url: &str, name: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(name);
        Ok(MongoDatabase {
            client: Some(client),
            database,
        })
    }

    // Clone-cheap handle for handler state.
    pub fn handle(&self) -> Database {
        self.database.clone()
    }
}

#[async_trait]
impl DatabaseLifecycle for MongoDatabase {
    async fn connect(&mut self) -> Result<(), String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| "connection already closed".to_string())?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|err| err.to_string())
    }

    async fn close(&mut self) -> Result<(), String> {
        let client = self
            .client
            .take()
            .ok_or_else(|| "connection already closed".to_string())?;

        client.shutdown().await;
        Ok(())
    }
}
