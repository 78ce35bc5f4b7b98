// SPDX-License-Identifier: Apache-2.0
//! SurrealDB-backed message store

use crate::{config::StoreConfig, models::Message};
use serde::Deserialize;
use std::future::Future;
use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    sql::{Datetime, Thing},
    Surreal,
};
use thiserror::Error;
use tracing::{debug, info};

/// Message store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),

    #[error("Store returned no record for {0}")]
    Missing(&'static str),
}

/// Storage seam between the API and the document database.
pub trait MessageStore: Send + Sync + 'static {
    /// Most recent `limit` messages, oldest first.
    fn list(&self, limit: usize) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Append a message; the store assigns its id and timestamp.
    fn append(
        &self,
        author: &str,
        content: &str,
    ) -> impl Future<Output = Result<Message, StoreError>> + Send;
}

/// Row shape as returned by SurrealDB
#[derive(Debug, Deserialize)]
struct MessageRecord {
    id: Thing,
    author: String,
    content: String,
    timestamp: Datetime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id.id.to_raw(),
            author: record.author,
            content: record.content,
            timestamp: record.timestamp.0,
        }
    }
}

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    db: Surreal<Any>,
}

impl Database {
    /// Connect to SurrealDB
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let db = any::connect(config.endpoint.as_str()).await?;

        if let Some((username, password)) = config.credentials() {
            db.signin(Root { username, password }).await?;
            debug!(username, "Signed in to SurrealDB");
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        let database = Self { db };
        database.init_schema().await?;
        info!(
            endpoint = %config.endpoint,
            namespace = %config.namespace,
            database = %config.database,
            "Connected to SurrealDB"
        );

        Ok(database)
    }

    /// Connect to a fresh in-memory engine
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect(&StoreConfig::default()).await
    }

    /// Initialize database schema
    ///
    /// `DEFINE` statements overwrite existing definitions, so this is safe
    /// to run against a database that already holds messages.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        self.db.query(
            r#"
            DEFINE TABLE messages SCHEMAFULL;
            DEFINE FIELD author ON messages TYPE string;
            DEFINE FIELD content ON messages TYPE string;
            DEFINE FIELD timestamp ON messages TYPE datetime;

            DEFINE INDEX timestamp_idx ON messages COLUMNS timestamp;
        "#,
        )
        .await?
        .check()?;

        Ok(())
    }
}

impl MessageStore for Database {
    async fn list(&self, limit: usize) -> Result<Vec<Message>, StoreError> {
        let mut result = self
            .db
            .query("SELECT * FROM messages ORDER BY timestamp DESC LIMIT $limit")
            .bind(("limit", limit as i64))
            .await?;

        let records: Vec<MessageRecord> = result.take(0)?;

        // Newest-first from the query, oldest-first to callers
        Ok(records.into_iter().rev().map(Message::from).collect())
    }

    async fn append(&self, author: &str, content: &str) -> Result<Message, StoreError> {
        let mut result = self
            .db
            .query("CREATE messages CONTENT { author: $author, content: $content, timestamp: time::now() }")
            .bind(("author", author.to_string()))
            .bind(("content", content.to_string()))
            .await?;

        let created: Vec<MessageRecord> = result.take(0)?;
        created
            .into_iter()
            .next()
            .map(Message::from)
            .ok_or(StoreError::Missing("messages"))
    }
}
