//! Types de données pour le crate arbres

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ArbresError;

/// Producteur d'un jeu de données (tag de provenance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Inventaire des arbres de la Ville de Paris
    Paris,
    /// Arbres remarquables du territoire des Hauts-de-Seine
    HautsDeSeine,
}

impl Source {
    /// Tag sérialisé de la source
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Paris => "paris",
            Source::HautsDeSeine => "hauts-de-seine",
        }
    }

    /// Seuls les arbres remarquables sont conservés pour cette source
    pub fn notable_only(&self) -> bool {
        matches!(self, Source::Paris)
    }

    /// Le code INSEE est dérivé de l'arrondissement quand il manque
    pub fn derives_insee_from_arrondissement(&self) -> bool {
        matches!(self, Source::Paris)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ArbresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paris" | "75" => Ok(Source::Paris),
            "hauts-de-seine" | "hauts_de_seine" | "hds" | "92" => Ok(Source::HautsDeSeine),
            other => Err(ArbresError::UnknownSource(other.to_string())),
        }
    }
}

/// Coordonnées WGS84
///
/// `lat` est toujours dans [-90, 90] et `lon` dans [-180, 180], sinon `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Localisation {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl Localisation {
    /// Construit une localisation en écartant les composantes hors plage
    pub fn checked(lat: Option<f64>, lon: Option<f64>) -> Self {
        Self {
            lat: lat.filter(|v| (-90.0..=90.0).contains(v)),
            lon: lon.filter(|v| (-180.0..=180.0).contains(v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lon.is_none()
    }
}

/// Enregistrement canonique d'un arbre
///
/// Tous les champs sont sérialisés, `null` quand la valeur est absente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Provenance
    pub source: Source,

    /// Identifiant d'origine
    pub id_source: Option<String>,

    /// Commune (pour Paris: libellé d'arrondissement)
    pub commune: Option<String>,

    /// Code INSEE de la commune
    pub code_insee: Option<String>,

    /// Adresse ou lieu
    pub adresse: Option<String>,

    /// Nom vernaculaire
    pub nom: Option<String>,

    /// Nom scientifique
    pub latin: Option<String>,

    /// Hauteur en mètres
    pub hauteur: Option<f64>,

    /// Circonférence du tronc en mètres
    pub circonference: Option<f64>,

    /// Arbre remarquable
    pub remarquable: Option<bool>,

    pub localisation: Localisation,

    /// Valeurs littérales de la ligne source (en-tête d'origine -> cellule)
    pub raw: BTreeMap<String, String>,
}

impl TreeRecord {
    /// Enregistrement vide pour une source donnée
    pub fn empty(source: Source) -> Self {
        Self {
            source,
            id_source: None,
            commune: None,
            code_insee: None,
            adresse: None,
            nom: None,
            latin: None,
            hauteur: None,
            circonference: None,
            remarquable: None,
            localisation: Localisation::default(),
            raw: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_str() {
        assert_eq!("paris".parse::<Source>().unwrap(), Source::Paris);
        assert_eq!("PARIS".parse::<Source>().unwrap(), Source::Paris);
        assert_eq!(
            "hauts-de-seine".parse::<Source>().unwrap(),
            Source::HautsDeSeine
        );
        assert_eq!("hds".parse::<Source>().unwrap(), Source::HautsDeSeine);
        assert!("lyon".parse::<Source>().is_err());
    }

    #[test]
    fn test_source_serde_tag() {
        let json = serde_json::to_string(&Source::HautsDeSeine).unwrap();
        assert_eq!(json, "\"hauts-de-seine\"");
        let back: Source = serde_json::from_str("\"paris\"").unwrap();
        assert_eq!(back, Source::Paris);
    }

    #[test]
    fn test_empty_record_serializes_nulls() {
        let value = serde_json::to_value(TreeRecord::empty(Source::Paris)).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "id_source",
            "commune",
            "code_insee",
            "adresse",
            "nom",
            "latin",
            "hauteur",
            "circonference",
            "remarquable",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
            assert!(obj[key].is_null(), "{key} should be null");
        }
        assert_eq!(obj["source"], "paris");
        assert!(obj["localisation"]["lat"].is_null());
        assert!(obj["localisation"]["lon"].is_null());
    }

    #[test]
    fn test_localisation_checked() {
        let loc = Localisation::checked(Some(48.85), Some(2.35));
        assert_eq!(loc.lat, Some(48.85));
        assert_eq!(loc.lon, Some(2.35));

        let loc = Localisation::checked(Some(91.0), Some(-181.0));
        assert!(loc.is_empty());
    }
}
