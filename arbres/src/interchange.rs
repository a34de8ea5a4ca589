//! Fichier d'échange JSON entre `unify` et `import`

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::{ArbresError, TreeRecord};

/// Écrit les enregistrements dans un tableau JSON indenté (UTF-8)
///
/// Le répertoire parent est créé si besoin. Le fichier est réécrit en entier.
pub fn write(path: &Path, records: &[TreeRecord]) -> Result<(), ArbresError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(path = %path.display(), records = records.len(), "Interchange file written");
    Ok(())
}

/// Relit le fichier d'échange
pub fn read(path: &Path) -> Result<Vec<TreeRecord>, ArbresError> {
    if !path.exists() {
        return Err(ArbresError::MissingInput(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let records: Vec<TreeRecord> = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}
