//! Configuration des sources à unifier

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use arbres::{InputTable, ReadOptions, Source};

/// Presets embarqués
pub const PRESETS: &[&str] = &["default", "paris"];

/// Configuration principale
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Fichier d'échange produit par `unify`
    pub output: PathBuf,

    /// Sources déclarées, dans l'ordre de concaténation
    pub sources: Vec<SourceConfig>,
}

/// Configuration d'une source
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    pub source: Source,

    /// Chemin du CSV brut
    pub path: PathBuf,

    /// Libellé d'encodage (`latin-1`, `utf-8`...); détecté si absent
    #[serde(default)]
    pub encoding: Option<String>,

    /// Séparateur (`;`, `,`, `tab`); détecté si absent
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "paris" => Self::load_embedded(include_str!("presets/paris.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: {}", preset, PRESETS.join(", ")),
        }
    }

    /// Preset embarqué ou chemin vers un fichier JSON
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if PRESETS.contains(&name_or_path) {
            Self::from_preset(name_or_path)
        } else {
            Self::load(Path::new(name_or_path))
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Entrées du normaliseur, chemins relatifs résolus depuis `base_dir`
    pub fn inputs(&self, base_dir: &Path) -> Result<Vec<InputTable>> {
        self.sources
            .iter()
            .map(|s| {
                let options =
                    ReadOptions::from_labels(s.encoding.as_deref(), s.delimiter.as_deref())
                        .with_context(|| format!("Invalid read options for {}", s.source))?;
                Ok(InputTable::new(s.source, base_dir.join(&s.path)).with_options(options))
            })
            .collect()
    }
}
