//! Nombres (séparateur décimal `.` ou `,`) et unités

/// Au-delà de ce seuil, une circonférence est supposée en centimètres
pub const GIRTH_CM_THRESHOLD: f64 = 20.0;

/// Parse un nombre avec `.` ou `,` comme séparateur décimal
///
/// - "12" → 12.0
/// - "7,5" → 7.5
/// - " 3.05 " → 3.05
/// - "n/a", "" → None
pub fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim();
    if v.is_empty() {
        return None;
    }

    let cleaned = v.replace(',', ".");
    let value: f64 = fast_float::parse(cleaned.as_str()).ok()?;
    value.is_finite().then_some(value)
}

/// Hauteur en mètres, positive ou nulle
pub fn parse_height(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|v| *v >= 0.0)
}

/// Circonférence normalisée en mètres, arrondie à 2 décimales
///
/// Paris publie la circonférence en cm, les Hauts-de-Seine en m:
/// - valeur > 20 → cm → /100
/// - sinon déjà en mètres
pub fn parse_girth(raw: &str) -> Option<f64> {
    let x = parse_number(raw).filter(|v| *v >= 0.0)?;
    let meters = if x > GIRTH_CM_THRESHOLD { x / 100.0 } else { x };
    Some(round_to(meters, 2))
}

/// Arrondit à `decimals` décimales
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
