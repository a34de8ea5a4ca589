//! # arbres
//!
//! Normalisation des inventaires d'arbres municipaux (Ville de Paris,
//! Hauts-de-Seine) vers un enregistrement canonique unique.
//!
//! ## Features
//!
//! - Lecture CSV tolérante: `;` ou `,`, UTF-8 ou latin-1 (détection `simdutf8`)
//! - Colonnes résolues par listes de candidats, insensibles à la casse
//! - Unités normalisées (circonférence en mètres), coordonnées WGS84 désambiguïsées
//! - Code INSEE dérivé des arrondissements parisiens
//! - Fichier d'échange JSON indenté
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbres::{unify, InputTable, Source};
//!
//! let result = unify(&[
//!     InputTable::new(Source::Paris, "data-raw/les-arbres.csv"),
//!     InputTable::new(Source::HautsDeSeine, "data-raw/arbres-hds.csv"),
//! ])?;
//! arbres::interchange::write("data/arbres.json".as_ref(), &result.records)?;
//! ```

pub mod error;
pub mod interchange;
pub mod mapping;
pub mod parser;
pub mod table;
pub mod types;

pub use error::ArbresError;
pub use table::{ReadOptions, Row, Table};
pub use types::{Localisation, Source, TreeRecord};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Une table source déclarée
#[derive(Debug, Clone)]
pub struct InputTable {
    pub source: Source,
    pub path: PathBuf,
    pub options: ReadOptions,
}

impl InputTable {
    /// Table avec détection automatique de l'encodage et du délimiteur
    pub fn new(source: Source, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
            options: ReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }
}

/// Statistiques de normalisation d'une source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStats {
    pub source: Source,
    pub path: Option<PathBuf>,
    pub encoding: &'static str,
    pub delimiter: char,
    /// Lignes lues dans le fichier
    pub rows_read: usize,
    /// Lignes émises
    pub rows_kept: usize,
    /// Lignes écartées par le filtre "remarquable"
    pub rows_filtered: usize,
    /// Valeurs non interprétables (champ mis à null)
    pub invalid_values: usize,
}

/// Résultat de la normalisation
#[derive(Debug, Default)]
pub struct UnifyResult {
    /// Enregistrements, source par source dans l'ordre de déclaration
    pub records: Vec<TreeRecord>,

    pub stats: Vec<SourceStats>,
}

/// Normalise toutes les tables déclarées.
///
/// # Errors
///
/// Retourne `ArbresError::MissingInput` si un des fichiers n'existe pas,
/// avant toute lecture. Les erreurs de lecture CSV sont fatales; les valeurs
/// non interprétables ne le sont jamais.
pub fn unify(inputs: &[InputTable]) -> Result<UnifyResult, ArbresError> {
    // 1. Fail-fast: tous les fichiers doivent exister
    if let Some(missing) = inputs.iter().find(|input| !input.path.exists()) {
        return Err(ArbresError::MissingInput(missing.path.clone()));
    }

    // 2. Lire et normaliser dans l'ordre de déclaration
    let mut result = UnifyResult::default();
    for input in inputs {
        let table = Table::open(&input.path, &input.options)?;
        let mut stats = normalize_table(&table, input.source, &mut result.records);
        stats.path = Some(input.path.clone());
        log_stats(&stats);
        result.stats.push(stats);
    }

    Ok(result)
}

/// Normalise des tables déjà chargées
pub fn unify_tables(tables: &[(Source, &Table)]) -> UnifyResult {
    let mut result = UnifyResult::default();
    for (source, table) in tables {
        let stats = normalize_table(table, *source, &mut result.records);
        log_stats(&stats);
        result.stats.push(stats);
    }
    result
}

fn normalize_table(table: &Table, source: Source, out: &mut Vec<TreeRecord>) -> SourceStats {
    let mut stats = SourceStats {
        source,
        path: None,
        encoding: table.encoding().name(),
        delimiter: table.delimiter() as char,
        rows_read: table.len(),
        rows_kept: 0,
        rows_filtered: 0,
        invalid_values: 0,
    };

    out.reserve(table.len());
    for (line, row) in table.rows().enumerate() {
        if !mapping::keep_row(&row, source) {
            stats.rows_filtered += 1;
            continue;
        }

        let mapped = mapping::map_row(&row, source);
        if !mapped.invalid.is_empty() {
            debug!(
                source = %source,
                // +2: en-tête et numérotation à partir de 1
                line = line + 2,
                fields = ?mapped.invalid,
                "Unparseable values set to null"
            );
            stats.invalid_values += mapped.invalid.len();
        }

        out.push(mapped.record);
        stats.rows_kept += 1;
    }

    stats
}

fn log_stats(stats: &SourceStats) {
    info!(
        source = %stats.source,
        path = %stats.path.as_deref().unwrap_or(Path::new("<memory>")).display(),
        encoding = stats.encoding,
        delimiter = %stats.delimiter,
        read = stats.rows_read,
        kept = stats.rows_kept,
        filtered = stats.rows_filtered,
        invalid_values = stats.invalid_values,
        "Source normalized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify_fails_fast_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("paris.csv");
        std::fs::write(&present, "IDBASE\n1\n").unwrap();

        let result = unify(&[
            InputTable::new(Source::Paris, &present),
            InputTable::new(Source::HautsDeSeine, dir.path().join("absent.csv")),
        ]);

        match result {
            Err(ArbresError::MissingInput(path)) => assert!(path.ends_with("absent.csv")),
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unify_tables_preserves_order() {
        let paris = Table::from_bytes(
            b"IDBASE;REMARQUABLE\np1;OUI\np2;NON\np3;OUI\n",
            &ReadOptions::default(),
        )
        .unwrap();
        let hds = Table::from_bytes(b"ID,COMMUNE\nh1,Sceaux\nh2,Antony\n", &ReadOptions::default())
            .unwrap();

        let result = unify_tables(&[(Source::Paris, &paris), (Source::HautsDeSeine, &hds)]);

        let ids: Vec<_> = result
            .records
            .iter()
            .map(|r| r.id_source.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["p1", "p3", "h1", "h2"]);

        assert_eq!(result.stats[0].rows_read, 3);
        assert_eq!(result.stats[0].rows_kept, 2);
        assert_eq!(result.stats[0].rows_filtered, 1);
        assert_eq!(result.stats[1].delimiter, ',');
        assert_eq!(result.stats[1].rows_kept, 2);
    }
}
