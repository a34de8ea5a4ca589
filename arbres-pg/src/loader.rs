//! Rechargement complet d'une collection
//!
//! Purge la collection puis insère tous les enregistrements canoniques.
//! En mode `Replace` les deux étapes sont indépendantes: une insertion qui
//! échoue laisse la collection vide ou partielle. Le mode `Atomic` les
//! encadre d'une transaction.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use arbres::TreeRecord;

use crate::export::DocumentSink;
use crate::report::LoadReport;

/// Stratégie de rechargement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadMode {
    /// Purge puis insertion, sans garantie tout-ou-rien
    #[default]
    Replace,
    /// Purge et insertion dans une même transaction
    Atomic,
}

/// Remplace le contenu de `sink` par `records`, dans l'ordre
pub async fn reload<S: DocumentSink>(
    sink: &mut S,
    records: &[TreeRecord],
    mode: ReloadMode,
) -> Result<LoadReport> {
    let started = Instant::now();
    let mut report = LoadReport::new(&sink.name(), mode);

    let documents = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .context("Failed to serialize records")?;
    for record in records {
        report.record_document(record.source);
    }

    info!(
        collection = %report.collection,
        documents = documents.len(),
        mode = ?mode,
        "Reloading collection"
    );

    match mode {
        ReloadMode::Replace => replace(sink, &documents, &mut report).await?,
        ReloadMode::Atomic => {
            sink.begin().await?;
            if let Err(e) = replace(sink, &documents, &mut report).await {
                if let Err(rb) = sink.rollback().await {
                    error!(error = %rb, "Rollback failed");
                }
                warn!(collection = %report.collection, "Reload rolled back");
                return Err(e.context("Reload rolled back"));
            }
            sink.commit().await?;
        }
    }

    report.set_duration(started.elapsed());
    report.finalize();

    info!(
        collection = %report.collection,
        deleted = report.deleted,
        inserted = report.inserted,
        duration_secs = report.duration_secs,
        "Reload complete"
    );

    Ok(report)
}

async fn replace<S: DocumentSink>(
    sink: &mut S,
    documents: &[Value],
    report: &mut LoadReport,
) -> Result<()> {
    report.deleted = sink
        .delete_all()
        .await
        .with_context(|| format!("Failed to purge {}", report.collection))?;
    report.inserted = sink
        .insert_many(documents)
        .await
        .with_context(|| format!("Failed to insert into {}", report.collection))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemoryCollection;
    use crate::report::LoadStatus;
    use arbres::Source;
    use serde_json::json;

    fn records() -> Vec<TreeRecord> {
        let mut paris = TreeRecord::empty(Source::Paris);
        paris.id_source = Some("2002".into());
        let mut hds = TreeRecord::empty(Source::HautsDeSeine);
        hds.commune = Some("Sceaux".into());
        vec![paris, hds]
    }

    #[tokio::test]
    async fn test_reload_replaces_content() {
        let mut coll = MemoryCollection::with_documents("arbres", vec![json!({"stale": true}); 3]);

        let report = reload(&mut coll, &records(), ReloadMode::Replace)
            .await
            .unwrap();

        assert_eq!(report.deleted, 3);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.status, LoadStatus::Success);
        assert_eq!(coll.len(), 2);
        assert_eq!(coll.documents()[0]["source"], "paris");
        assert_eq!(coll.documents()[1]["commune"], "Sceaux");
    }

    #[tokio::test]
    async fn test_documents_keep_null_fields() {
        let mut coll = MemoryCollection::new("arbres");
        reload(&mut coll, &records(), ReloadMode::Replace)
            .await
            .unwrap();

        let doc = coll.documents()[0].as_object().unwrap();
        assert!(doc.contains_key("hauteur"));
        assert_eq!(doc["hauteur"], Value::Null);
    }

    #[tokio::test]
    async fn test_reload_empty_input_empties_collection() {
        let mut coll = MemoryCollection::with_documents("arbres", vec![json!(1)]);

        let report = reload(&mut coll, &[], ReloadMode::Replace).await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.inserted, 0);
        assert!(coll.is_empty());
    }

    #[tokio::test]
    async fn test_replace_failure_leaves_partial_collection() {
        let mut coll =
            MemoryCollection::with_documents("arbres", vec![json!("old"); 4]).fail_after(1);

        let err = reload(&mut coll, &records(), ReloadMode::Replace)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to insert"));
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.documents()[0]["source"], "paris");
    }

    #[tokio::test]
    async fn test_atomic_failure_rolls_back() {
        let mut coll =
            MemoryCollection::with_documents("arbres", vec![json!("old"); 4]).fail_after(1);

        let err = reload(&mut coll, &records(), ReloadMode::Atomic)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("rolled back"));
        assert_eq!(coll.documents(), vec![json!("old"); 4].as_slice());
        assert!(!coll.in_transaction());
    }

    #[tokio::test]
    async fn test_atomic_success_commits() {
        let mut coll = MemoryCollection::new("arbres");

        let report = reload(&mut coll, &records(), ReloadMode::Atomic)
            .await
            .unwrap();

        assert_eq!(report.mode, ReloadMode::Atomic);
        assert_eq!(report.by_source.get("hauts-de-seine"), Some(&1));
        assert_eq!(coll.len(), 2);
        assert!(!coll.in_transaction());
    }
}
