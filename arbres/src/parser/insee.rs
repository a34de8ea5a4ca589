//! Code INSEE des arrondissements parisiens

use std::sync::LazyLock;

use regex::Regex;

/// Numéro d'arrondissement 1..=20, éventuellement suivi de E/ER/EME
/// ("14", "PARIS 14E ARRDT", "PARIS 1ER ARRDT")
static ARRONDISSEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(1[0-9]|20|0?[1-9])(?:E|ER|EME|ÈME)?\b")
        .expect("Invalid arrondissement pattern")
});

/// Numéro d'arrondissement contenu dans un libellé libre
pub fn arrondissement_number(raw: &str) -> Option<u8> {
    let caps = ARRONDISSEMENT_PATTERN.captures(raw.trim())?;
    let n: u8 = caps.get(1)?.as_str().parse().ok()?;
    (1..=20).contains(&n).then_some(n)
}

/// Code INSEE `751NN` dérivé d'un libellé d'arrondissement
///
/// - "14" → "75114"
/// - "PARIS 7E ARRDT" → "75107"
/// - "BOIS DE VINCENNES" → None
pub fn insee_from_arrondissement(raw: &str) -> Option<String> {
    arrondissement_number(raw).map(|n| format!("751{:02}", n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insee_from_arrondissement() {
        assert_eq!(insee_from_arrondissement("PARIS 14E ARRDT").as_deref(), Some("75114"));
        assert_eq!(insee_from_arrondissement("7").as_deref(), Some("75107"));
        assert_eq!(insee_from_arrondissement("14").as_deref(), Some("75114"));
        assert_eq!(insee_from_arrondissement("PARIS 7E ARRDT").as_deref(), Some("75107"));
        assert_eq!(insee_from_arrondissement("PARIS 1ER ARRDT").as_deref(), Some("75101"));
        assert_eq!(insee_from_arrondissement("paris 20e arrdt").as_deref(), Some("75120"));
        assert_eq!(insee_from_arrondissement("05").as_deref(), Some("75105"));
    }

    #[test]
    fn test_no_arrondissement() {
        assert_eq!(insee_from_arrondissement("BOIS DE VINCENNES"), None);
        assert_eq!(insee_from_arrondissement("BOIS DE BOULOGNE"), None);
        assert_eq!(insee_from_arrondissement("21"), None);
        assert_eq!(insee_from_arrondissement("75014"), None);
        assert_eq!(insee_from_arrondissement(""), None);
    }
}
