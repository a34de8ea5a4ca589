//! Collection de documents stockée dans PostgreSQL
//!
//! Une collection est une table `{schema}.{collection}` dont chaque ligne porte
//! un document `JSONB`. L'ordre d'insertion est conservé par `row_id`.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use deadpool_postgres::{Object, Pool};
use futures::SinkExt;
use serde_json::Value;
use tracing::{debug, info};

use super::sink::DocumentSink;

/// Nombre de documents par chunk envoyé au COPY
pub const COPY_CHUNK_SIZE: usize = 5_000;

/// Collection `JSONB` sur une connexion dédiée du pool
pub struct PgCollection {
    client: Object,
    schema: String,
    collection: String,
}

impl PgCollection {
    /// Réserve une connexion et crée schéma, table et index si besoin
    pub async fn open(pool: &Pool, schema: &str, collection: &str) -> Result<Self> {
        validate_identifier(schema)?;
        validate_identifier(collection)?;

        let client = pool
            .get()
            .await
            .context("Failed to get connection from pool")?;

        let coll = Self {
            client,
            schema: schema.to_string(),
            collection: collection.to_string(),
        };
        coll.ensure().await?;
        Ok(coll)
    }

    /// Nom qualifié `schema.collection`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.collection)
    }

    async fn ensure(&self) -> Result<()> {
        let table = self.qualified();
        let sql = format!(
            r#"
            CREATE SCHEMA IF NOT EXISTS {schema};
            CREATE TABLE IF NOT EXISTS {table} (
                row_id BIGSERIAL PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_{collection}_doc ON {table} USING GIN (doc);
            "#,
            schema = self.schema,
            collection = self.collection,
        );

        self.client
            .batch_execute(&sql)
            .await
            .with_context(|| format!("Failed to create collection {}", table))?;

        debug!(collection = %table, "Collection ready");
        Ok(())
    }

    /// Nombre de documents présents
    pub async fn count(&self) -> Result<i64> {
        let row = self
            .client
            .query_one(&format!("SELECT COUNT(*) FROM {}", self.qualified()), &[])
            .await
            .context("Failed to count documents")?;
        Ok(row.get(0))
    }

    /// Documents dans l'ordre d'insertion
    pub async fn documents(&self) -> Result<Vec<Value>> {
        let rows = self
            .client
            .query(
                &format!("SELECT doc::text FROM {} ORDER BY row_id", self.qualified()),
                &[],
            )
            .await
            .context("Failed to read documents")?;

        rows.iter()
            .map(|row| {
                let text: String = row.get(0);
                serde_json::from_str(&text).context("Invalid JSONB document")
            })
            .collect()
    }
}

#[async_trait]
impl DocumentSink for PgCollection {
    fn name(&self) -> String {
        self.qualified()
    }

    async fn delete_all(&mut self) -> Result<u64> {
        let deleted = self
            .client
            .execute(&format!("DELETE FROM {}", self.qualified()), &[])
            .await
            .with_context(|| format!("Failed to purge {}", self.qualified()))?;

        info!(collection = %self.qualified(), deleted, "Collection purged");
        Ok(deleted)
    }

    async fn insert_many(&mut self, documents: &[Value]) -> Result<u64> {
        if documents.is_empty() {
            return Ok(0);
        }

        let copy_sql = format!(
            "COPY {} (doc) FROM STDIN WITH (FORMAT csv, QUOTE '\"', ESCAPE '\"')",
            self.qualified()
        );

        let copy_in = self
            .client
            .copy_in(&copy_sql)
            .await
            .context("Failed to start COPY")?;
        let mut pinned = std::pin::pin!(copy_in);

        let mut buf = BytesMut::with_capacity(64 * 1024);
        for chunk in documents.chunks(COPY_CHUNK_SIZE) {
            for doc in chunk {
                push_csv_document(&mut buf, doc)?;
            }
            let data: Bytes = buf.split().freeze();
            pinned
                .as_mut()
                .send(data)
                .await
                .context("Failed to send COPY chunk")?;
            debug!(rows = chunk.len(), "COPY chunk sent");
        }

        let inserted = pinned
            .as_mut()
            .finish()
            .await
            .context("Failed to finish COPY")?;

        info!(collection = %self.qualified(), inserted, "Documents inserted");
        Ok(inserted)
    }

    async fn begin(&mut self) -> Result<()> {
        self.client
            .batch_execute("BEGIN")
            .await
            .context("Failed to begin transaction")
    }

    async fn commit(&mut self) -> Result<()> {
        self.client
            .batch_execute("COMMIT")
            .await
            .context("Failed to commit transaction")
    }

    async fn rollback(&mut self) -> Result<()> {
        self.client
            .batch_execute("ROLLBACK")
            .await
            .context("Failed to rollback transaction")
    }
}

/// Refuse tout identifiant SQL autre que `[A-Za-z_][A-Za-z0-9_]*`
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid {
        bail!("Invalid SQL identifier: {:?}", name);
    }
    Ok(())
}

/// Écrit un document comme champ CSV unique (guillemets doublés)
fn push_csv_document(buf: &mut BytesMut, doc: &Value) -> Result<()> {
    let json = serde_json::to_string(doc).context("Failed to serialize document")?;

    buf.extend_from_slice(b"\"");
    for (i, text) in json.split('"').enumerate() {
        if i > 0 {
            buf.extend_from_slice(b"\"\"");
        }
        buf.extend_from_slice(text.as_bytes());
    }
    buf.extend_from_slice(b"\"\n");
    Ok(())
}
