//! Tests d'intégration sur les fixtures Paris (latin-1, `;`) et Hauts-de-Seine (UTF-8, `,`)

use std::path::{Path, PathBuf};

use arbres::{interchange, unify, ArbresError, InputTable, ReadOptions, Source};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn inputs() -> Vec<InputTable> {
    vec![
        InputTable::new(Source::Paris, fixture("paris.csv")),
        InputTable::new(Source::HautsDeSeine, fixture("hauts-de-seine.csv")),
    ]
}

#[test]
fn test_unify_fixtures() {
    let result = unify(&inputs()).expect("fixtures should normalize");

    // Paris: 3 lignes dont 1 non remarquable; HDS: 3 lignes
    assert_eq!(result.records.len(), 5);

    let sources: Vec<Source> = result.records.iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        vec![
            Source::Paris,
            Source::Paris,
            Source::HautsDeSeine,
            Source::HautsDeSeine,
            Source::HautsDeSeine,
        ]
    );

    let paris = &result.stats[0];
    assert_eq!(paris.encoding, "windows-1252");
    assert_eq!(paris.delimiter, ';');
    assert_eq!(paris.rows_read, 3);
    assert_eq!(paris.rows_filtered, 1);
    assert_eq!(paris.invalid_values, 1);

    let hds = &result.stats[1];
    assert_eq!(hds.encoding, "UTF-8");
    assert_eq!(hds.delimiter, ',');
    assert_eq!(hds.rows_kept, 3);
    assert_eq!(hds.invalid_values, 1);
}

#[test]
fn test_paris_records() {
    let result = unify(&inputs()).unwrap();

    let montsouris = &result.records[0];
    assert_eq!(montsouris.id_source.as_deref(), Some("2002"));
    assert_eq!(montsouris.nom.as_deref(), Some("Cyprès chauve"));
    assert_eq!(montsouris.code_insee.as_deref(), Some("75114"));
    assert_eq!(montsouris.circonference, Some(3.05));
    assert_eq!(montsouris.remarquable, Some(true));

    let vincennes = &result.records[1];
    assert_eq!(vincennes.id_source.as_deref(), Some("2003"));
    assert_eq!(vincennes.nom.as_deref(), Some("Chêne pédonculé"));
    assert_eq!(vincennes.commune.as_deref(), Some("BOIS DE VINCENNES"));
    assert_eq!(vincennes.code_insee, None);
    // "n/a" → null, l'enregistrement est conservé
    assert_eq!(vincennes.circonference, None);
    assert_eq!(vincennes.hauteur, Some(22.0));
    // "2.4110, 48.8330" → inversé
    assert_eq!(vincennes.localisation.lat, Some(48.833));
    assert_eq!(vincennes.localisation.lon, Some(2.411));
    assert_eq!(
        vincennes.raw.get("CIRCONFERENCE (cm)").map(String::as_str),
        Some("n/a")
    );
}

#[test]
fn test_hds_records() {
    let result = unify(&inputs()).unwrap();

    let sceaux = &result.records[2];
    assert_eq!(sceaux.commune.as_deref(), Some("Sceaux"));
    assert_eq!(sceaux.code_insee.as_deref(), Some("92071"));
    assert_eq!(sceaux.adresse.as_deref(), Some("Allée de Diane"));
    assert_eq!(sceaux.hauteur, Some(32.5));
    assert_eq!(sceaux.circonference, Some(4.2));
    assert_eq!(sceaux.localisation.lat, Some(48.7745));
    assert_eq!(sceaux.localisation.lon, Some(2.2975));

    let rueil = &result.records[4];
    assert_eq!(rueil.nom.as_deref(), Some("Hêtre pourpre"));
    assert_eq!(rueil.adresse, None);
    assert_eq!(rueil.hauteur, None);
    assert_eq!(rueil.circonference, Some(3.1));
    assert!(rueil.localisation.is_empty());
}

#[test]
fn test_explicit_options_override_detection() {
    // Forcer UTF-8 sur le fichier latin-1: caractères de remplacement, pas d'erreur
    let options = ReadOptions::from_labels(Some("utf-8"), Some(";")).unwrap();
    let result = unify(&[InputTable::new(Source::Paris, fixture("paris.csv")).with_options(options)])
        .unwrap();

    assert_eq!(result.stats[0].encoding, "UTF-8");
    assert!(result.records[0].nom.as_deref().unwrap().contains('\u{FFFD}'));
}

#[test]
fn test_missing_source_file() {
    let mut declared = inputs();
    declared.push(InputTable::new(Source::Paris, fixture("absent.csv")));

    let err = unify(&declared).unwrap_err();
    assert!(matches!(err, ArbresError::MissingInput(_)));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn test_interchange_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    interchange::write(&first, &unify(&inputs()).unwrap().records).unwrap();
    interchange::write(&second, &unify(&inputs()).unwrap().records).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );

    let back = interchange::read(&first).unwrap();
    assert_eq!(back.len(), 5);
    assert_eq!(back[0].source, Source::Paris);
}
