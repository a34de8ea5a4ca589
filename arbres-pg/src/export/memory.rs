//! Collection en mémoire
//!
//! Sert au mode `--dry-run` et aux tests du rechargement.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::sink::DocumentSink;

/// Collection de documents conservée dans un `Vec`
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    name: String,
    documents: Vec<Value>,
    snapshot: Option<Vec<Value>>,
    /// Nombre d'insertions acceptées avant échec (tests uniquement)
    insert_limit: Option<usize>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Crée une collection déjà peuplée
    pub fn with_documents(name: impl Into<String>, documents: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            documents,
            ..Default::default()
        }
    }

    /// Fait échouer `insert_many` après `limit` documents insérés
    #[cfg(test)]
    pub fn fail_after(mut self, limit: usize) -> Self {
        self.insert_limit = Some(limit);
        self
    }

    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[async_trait]
impl DocumentSink for MemoryCollection {
    fn name(&self) -> String {
        format!("memory:{}", self.name)
    }

    async fn delete_all(&mut self) -> Result<u64> {
        let deleted = self.documents.len() as u64;
        self.documents.clear();
        Ok(deleted)
    }

    async fn insert_many(&mut self, documents: &[Value]) -> Result<u64> {
        if let Some(limit) = self.insert_limit {
            if documents.len() > limit {
                self.documents.extend_from_slice(&documents[..limit]);
                bail!(
                    "Insert failed after {} of {} documents",
                    limit,
                    documents.len()
                );
            }
        }
        self.documents.extend_from_slice(documents);
        debug!(collection = %self.name, inserted = documents.len(), "Documents inserted");
        Ok(documents.len() as u64)
    }

    async fn begin(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            bail!("Transaction already started on {}", self.name);
        }
        self.snapshot = Some(self.documents.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.snapshot.take().is_none() {
            bail!("No transaction to commit on {}", self.name);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        match self.snapshot.take() {
            Some(previous) => {
                self.documents = previous;
                Ok(())
            }
            None => bail!("No transaction to roll back on {}", self.name),
        }
    }
}
