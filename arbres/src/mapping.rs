//! Mapping d'une ligne source vers l'enregistrement canonique
//!
//! Chaque champ canonique a une liste ordonnée de colonnes candidates
//! (en minuscules); la première colonne présente et non vide gagne.
//! Les en-têtes des exports dérivent d'une année à l'autre, d'où les
//! variantes d'orthographe.

use crate::parser::flag::{is_affirmative, parse_flag};
use crate::parser::geo::{from_columns, parse_combined};
use crate::parser::insee::insee_from_arrondissement;
use crate::parser::number::{parse_girth, parse_height, parse_number};
use crate::parser::Field;
use crate::table::Row;
use crate::types::{Localisation, Source, TreeRecord};

/// Colonnes candidates par champ canonique
pub mod columns {
    pub const ID_SOURCE: &[&str] = &["idbase", "id", "identifiant", "objectid", "id_arbre"];
    pub const COMMUNE: &[&str] = &["commune", "arrondissement", "ville"];
    pub const PARIS_COMMUNE: &[&str] = &["arrondissement", "commune"];
    pub const ARRONDISSEMENT: &[&str] = &["arrondissement", "commune"];
    pub const CODE_INSEE: &[&str] = &["code_insee", "code insee", "insee", "code_commune"];
    pub const ADRESSE: &[&str] = &["lieu / adresse", "adresse", "lieu"];
    pub const NOM: &[&str] = &[
        "libelle francais",
        "libellé français",
        "nom_francais",
        "nom français",
        "nom_commun",
        "nom",
        "essence",
    ];
    pub const LATIN: &[&str] = &["nom_latin", "nom latin", "latin"];
    pub const GENRE: &[&str] = &["genre"];
    pub const ESPECE: &[&str] = &["espece", "espèce"];
    pub const HAUTEUR: &[&str] = &["hauteur (m)", "hauteur_m", "hauteur", "hauteur_arbre"];
    pub const CIRCONFERENCE: &[&str] = &[
        "circonference (cm)",
        "circonférence (cm)",
        "circonference",
        "circonférence",
        "circonference_cm",
    ];
    pub const REMARQUABLE: &[&str] = &["remarquable", "arbre remarquable"];
    pub const GEO_COMBINED: &[&str] = &[
        "geo_point_2d",
        "geo_point",
        "geopoint",
        "coordonnees",
        "coordonnées",
        "coordinates",
    ];
    pub const LATITUDE: &[&str] = &["latitude", "lat"];
    pub const LONGITUDE: &[&str] = &["longitude", "lon", "lng", "long"];
}

/// Résultat du mapping d'une ligne
#[derive(Debug, Clone)]
pub struct Mapped {
    pub record: TreeRecord,

    /// Champs dont la valeur source n'a pas pu être interprétée (mis à null)
    pub invalid: Vec<&'static str>,
}

/// Filtre "arbres remarquables"
///
/// Pour Paris, une ligne est conservée si l'en-tête n'a pas de colonne de flag
/// ou si sa valeur est affirmative. Une ligne courte sans cellule de flag est
/// écartée. Les autres sources ne sont pas filtrées.
pub fn keep_row(row: &Row<'_>, source: Source) -> bool {
    if !source.notable_only() || !row.table().has_any(columns::REMARQUABLE) {
        return true;
    }
    row.first(columns::REMARQUABLE).is_some_and(is_affirmative)
}

/// Construit l'enregistrement canonique d'une ligne
///
/// Ne peut pas échouer: chaque champ non interprétable devient `None`.
pub fn map_row(row: &Row<'_>, source: Source) -> Mapped {
    let mut invalid = Vec::new();

    let text = |candidates: &[&str]| row.first(candidates).map(str::to_string);

    let commune_candidates = match source {
        Source::Paris => columns::PARIS_COMMUNE,
        Source::HautsDeSeine => columns::COMMUNE,
    };

    let code_insee = match row.first(columns::CODE_INSEE) {
        Some(code) => Some(code.to_string()),
        None if source.derives_insee_from_arrondissement() => row
            .first(columns::ARRONDISSEMENT)
            .and_then(insee_from_arrondissement),
        None => None,
    };

    let latin = text(columns::LATIN).or_else(|| {
        let parts: Vec<&str> = [row.first(columns::GENRE), row.first(columns::ESPECE)]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    });

    let hauteur = take(
        Field::parse(row.first(columns::HAUTEUR), parse_height),
        "hauteur",
        &mut invalid,
    );
    let circonference = take(
        Field::parse(row.first(columns::CIRCONFERENCE), parse_girth),
        "circonference",
        &mut invalid,
    );
    let remarquable = take(
        Field::parse(row.first(columns::REMARQUABLE), parse_flag),
        "remarquable",
        &mut invalid,
    );

    let localisation = parse_localisation(row, &mut invalid);

    let record = TreeRecord {
        source,
        id_source: text(columns::ID_SOURCE),
        commune: text(commune_candidates),
        code_insee,
        adresse: text(columns::ADRESSE),
        nom: text(columns::NOM),
        latin,
        hauteur,
        circonference,
        remarquable,
        localisation,
        raw: row.raw(),
    };

    Mapped { record, invalid }
}

/// Champ combiné d'abord, puis colonnes latitude/longitude séparées
fn parse_localisation(row: &Row<'_>, invalid: &mut Vec<&'static str>) -> Localisation {
    match Field::parse(row.first(columns::GEO_COMBINED), parse_combined) {
        Field::Value(loc) => return loc,
        Field::Invalid => invalid.push("localisation"),
        Field::Missing => {}
    }

    let lat = Field::parse(row.first(columns::LATITUDE), parse_number)
        .and_then(|v| (-90.0..=90.0).contains(&v).then_some(v));
    let lon = Field::parse(row.first(columns::LONGITUDE), parse_number)
        .and_then(|v| (-180.0..=180.0).contains(&v).then_some(v));

    from_columns(
        take(lat, "localisation.lat", invalid),
        take(lon, "localisation.lon", invalid),
    )
}

fn take<T>(field: Field<T>, name: &'static str, invalid: &mut Vec<&'static str>) -> Option<T> {
    if field.is_invalid() {
        invalid.push(name);
    }
    field.value()
}
