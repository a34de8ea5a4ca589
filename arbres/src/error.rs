//! Types d'erreurs pour le crate arbres

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs fatales pouvant survenir lors de la normalisation
///
/// Les erreurs de parsing de champ ne remontent jamais ici: elles dégradent
/// le champ concerné à `null` (voir [`crate::parser::Field`]).
#[derive(Debug, Error)]
pub enum ArbresError {
    /// Erreur d'I/O lors de la lecture ou de l'écriture d'un fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fichier source ou fichier d'échange introuvable
    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    /// Erreur de lecture CSV
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Erreur de (dé)sérialisation du fichier d'échange
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encodage non supporté
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Délimiteur invalide (un seul caractère attendu)
    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    /// Source inconnue
    #[error("Unknown source: {0}. Use: paris, hauts-de-seine")]
    UnknownSource(String),
}

impl ArbresError {
    /// Crée une erreur CSV avec le chemin du fichier en contexte
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
