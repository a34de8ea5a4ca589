//! Rapport de rechargement d'une collection
//!
//! Collecte les compteurs d'un rechargement (purge, insertion, répartition
//! par source) pour affichage console ou sauvegarde JSON.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use arbres::Source;

use crate::loader::ReloadMode;

/// Statut global du rechargement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    /// Tous les documents ont été insérés
    Success,
    /// Le nombre inséré diffère du nombre de documents préparés
    Incomplete,
}

/// Rapport complet de rechargement
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Collection cible
    pub collection: String,
    pub mode: ReloadMode,
    /// Fichier d'échange chargé
    pub input: Option<String>,
    /// Empreinte blake3 du fichier d'échange
    pub checksum: Option<String>,
    /// Collection en mémoire, rien n'a été envoyé en base
    pub dry_run: bool,
    pub duration_secs: f64,
    pub status: LoadStatus,

    /// Nombre de documents préparés
    pub documents: usize,
    /// Nombre de documents supprimés par la purge
    pub deleted: u64,
    /// Nombre de documents insérés
    pub inserted: u64,
    /// Documents préparés par source
    pub by_source: BTreeMap<String, usize>,
}

impl Default for LoadReport {
    fn default() -> Self {
        Self {
            collection: String::new(),
            mode: ReloadMode::default(),
            input: None,
            checksum: None,
            dry_run: false,
            duration_secs: 0.0,
            status: LoadStatus::Success,
            documents: 0,
            deleted: 0,
            inserted: 0,
            by_source: BTreeMap::new(),
        }
    }
}

impl LoadReport {
    /// Crée un nouveau rapport pour une collection
    pub fn new(collection: &str, mode: ReloadMode) -> Self {
        Self {
            collection: collection.to_string(),
            mode,
            ..Default::default()
        }
    }

    /// Enregistre un document préparé
    pub fn record_document(&mut self, source: Source) {
        self.documents += 1;
        *self.by_source.entry(source.as_str().to_string()).or_default() += 1;
    }

    /// Renseigne le fichier d'échange et son empreinte
    pub fn set_input(&mut self, path: &Path, checksum: String) {
        self.input = Some(path.display().to_string());
        self.checksum = Some(checksum);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = if self.inserted == self.documents as u64 {
            LoadStatus::Success
        } else {
            LoadStatus::Incomplete
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("LOAD REPORT - {}", self.collection);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Mode: {:?}{}", self.mode, if self.dry_run { " (dry run)" } else { "" });
        println!("Duration: {:.2}s", self.duration_secs);
        if let Some(input) = &self.input {
            println!("Input: {}", input);
        }
        if let Some(checksum) = &self.checksum {
            println!("Checksum (blake3): {}", checksum);
        }

        println!("\n--- SUMMARY ---");
        println!(
            "Documents: {} prepared, {} deleted, {} inserted",
            self.documents, self.deleted, self.inserted
        );

        if !self.by_source.is_empty() {
            println!("\n--- BY SOURCE ---");
            for (source, count) in &self.by_source {
                println!("  {}: {}", source, count);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} deleted, {} inserted",
            self.collection, self.deleted, self.inserted
        )
    }
}
