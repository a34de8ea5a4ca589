//! Parser des coordonnées (champ combiné "lat, lon" ou colonnes séparées)

use crate::types::Localisation;

use super::number::parse_number;

fn in_lat_range(v: f64) -> bool {
    (-90.0..=90.0).contains(&v)
}

fn in_lon_range(v: f64) -> bool {
    (-180.0..=180.0).contains(&v)
}

/// Parse un champ combiné du type `geo_point_2d`: "48.8326, 2.41145"
///
/// Le premier nombre est la latitude, le second la longitude, sauf:
/// - le premier est hors [-90, 90] et le second dedans → inversion
/// - les deux sont positifs, dans [-90, 90], et |premier| < |second|
///   → inversion (en Île-de-France la latitude ~48 domine la longitude ~2)
///
/// Une paire de signes opposés ("40.7128, -74.0060") n'est jamais inversée.
///
/// Renvoie `None` si le champ n'a pas deux composantes numériques.
/// Une composante hors plage après désambiguïsation est mise à `None`.
pub fn parse_combined(raw: &str) -> Option<Localisation> {
    let mut parts = raw.split(',').map(str::trim);
    let a = parse_number(parts.next()?)?;
    let b = parse_number(parts.next()?)?;

    let swap = if !in_lat_range(a) {
        in_lat_range(b) && in_lon_range(b)
    } else {
        in_lat_range(b) && a > 0.0 && b > 0.0 && a < b
    };

    let (lat, lon) = if swap { (b, a) } else { (a, b) };
    Some(Localisation::checked(Some(lat), Some(lon)))
}

/// Latitude et longitude en colonnes séparées: jamais inversées, seulement bornées
pub fn from_columns(lat: Option<f64>, lon: Option<f64>) -> Localisation {
    Localisation::checked(lat, lon)
}
