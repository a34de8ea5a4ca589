//! Lecture des fichiers tabulaires (CSV `;` ou `,`, UTF-8 ou latin-1)

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::Encoding;
use tracing::debug;

use crate::ArbresError;

/// Délimiteurs reconnus, par ordre de préférence en cas d'égalité
const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];

/// Options de lecture d'une table
///
/// `None` = détection automatique.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub encoding: Option<&'static Encoding>,
    pub delimiter: Option<u8>,
}

impl ReadOptions {
    /// Options à partir de libellés texte (ex: `latin-1`, `;`)
    pub fn from_labels(encoding: Option<&str>, delimiter: Option<&str>) -> Result<Self, ArbresError> {
        let encoding = encoding.map(encoding_for_label).transpose()?;
        let delimiter = match delimiter {
            None => None,
            Some("\\t") | Some("tab") => Some(b'\t'),
            Some(d) if d.len() == 1 => Some(d.as_bytes()[0]),
            Some(d) => return Err(ArbresError::InvalidDelimiter(d.to_string())),
        };
        Ok(Self {
            encoding,
            delimiter,
        })
    }
}

/// Mappe un libellé d'encodage vers `encoding_rs`
///
/// `latin-1` / `iso-8859-1` donnent windows-1252 (sur-ensemble WHATWG).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, ArbresError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ArbresError::UnsupportedEncoding(label.to_string()))
}

/// Table décodée: en-têtes et lignes brutes
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<StringRecord>,
    encoding: &'static Encoding,
    delimiter: u8,
}

impl Table {
    /// Lit une table depuis un fichier
    pub fn open(path: &Path, options: &ReadOptions) -> Result<Self, ArbresError> {
        if !path.exists() {
            return Err(ArbresError::MissingInput(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes, options, path)
    }

    /// Lit une table depuis un buffer en mémoire
    pub fn from_bytes(bytes: &[u8], options: &ReadOptions) -> Result<Self, ArbresError> {
        Self::parse(bytes, options, Path::new("<memory>"))
    }

    fn parse(bytes: &[u8], options: &ReadOptions, origin: &Path) -> Result<Self, ArbresError> {
        let encoding = options.encoding.unwrap_or_else(|| detect_encoding(bytes));
        // decode() retire un éventuel BOM et peut basculer sur l'encodage qu'il annonce
        let (text, encoding, had_errors) = encoding.decode(bytes);
        if had_errors {
            debug!(file = %origin.display(), encoding = encoding.name(), "Malformed sequences replaced while decoding");
        }

        let delimiter = options
            .delimiter
            .unwrap_or_else(|| sniff_delimiter(text.as_bytes()));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ArbresError::csv(origin, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut index = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            index.entry(normalize_header(name)).or_insert(i);
        }

        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ArbresError::csv(origin, e))?;

        debug!(
            file = %origin.display(),
            encoding = encoding.name(),
            delimiter = %(delimiter as char),
            columns = headers.len(),
            rows = rows.len(),
            "Table loaded"
        );

        Ok(Self {
            headers,
            index,
            rows,
            encoding,
            delimiter,
        })
    }

    /// La colonne est déclarée dans l'en-tête, quelles que soient les lignes
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_header(name))
    }

    /// Une des colonnes candidates est déclarée dans l'en-tête
    pub fn has_any(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|c| self.has_column(c))
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Itère sur les lignes, dans l'ordre du fichier
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |record| Row {
            table: self,
            record,
        })
    }
}

/// Vue sur une ligne avec accès insensible à la casse par nom de colonne
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    fn cell(&self, name: &str) -> Option<&'a str> {
        let idx = *self.table.index.get(&normalize_header(name))?;
        self.record.get(idx)
    }

    /// Table d'origine de la ligne
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Valeur non vide (après trim) d'une colonne
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.cell(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Première valeur non vide parmi les candidats, dans l'ordre
    pub fn first(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates.iter().find_map(|c| self.get(c))
    }

    /// Copie littérale de la ligne, indexée par les en-têtes d'origine
    pub fn raw(&self) -> BTreeMap<String, String> {
        self.table
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect()
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// UTF-8 si le contenu est valide (ou porte un BOM), windows-1252 sinon
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if simdutf8::basic::from_utf8(bytes).is_ok() {
        encoding_rs::UTF_8
    } else {
        encoding_rs::WINDOWS_1252
    }
}

/// Devine le délimiteur en comptant les candidats sur la ligne d'en-tête
pub fn sniff_delimiter(data: &[u8]) -> u8 {
    let header_end = memchr::memchr(b'\n', data).unwrap_or(data.len());
    let header = &data[..header_end];

    let mut best = DELIMITERS[0];
    let mut best_count = 0;
    for &candidate in &DELIMITERS {
        let count = memchr::memchr_iter(candidate, header).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
