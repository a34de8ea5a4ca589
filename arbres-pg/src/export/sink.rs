//! Abstraction d'une collection de documents cible
//!
//! Le rechargement ne connaît que cette interface: la collection PostgreSQL
//! en production, la collection mémoire pour `--dry-run` et les tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Collection de documents JSON supportant purge, insertion en masse et transaction
#[async_trait]
pub trait DocumentSink: Send {
    /// Nom qualifié de la collection (logs, rapport)
    fn name(&self) -> String;

    /// Supprime tous les documents, retourne le nombre supprimé
    async fn delete_all(&mut self) -> Result<u64>;

    /// Insère les documents dans l'ordre, retourne le nombre inséré
    async fn insert_many(&mut self, documents: &[Value]) -> Result<u64>;

    async fn begin(&mut self) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;
}
