//! Flags booléens ("OUI"/"NON", "true"/"false", ...)

const AFFIRMATIVE: [&str; 5] = ["oui", "true", "1", "yes", "vrai"];
const NEGATIVE: [&str; 5] = ["non", "false", "0", "no", "faux"];

/// Valeur affirmative, insensible à la casse
pub fn is_affirmative(raw: &str) -> bool {
    let v = raw.trim().to_lowercase();
    AFFIRMATIVE.contains(&v.as_str())
}

/// Parse un flag: `Some(true)`, `Some(false)` ou `None` si non reconnu
pub fn parse_flag(raw: &str) -> Option<bool> {
    let v = raw.trim().to_lowercase();
    if AFFIRMATIVE.contains(&v.as_str()) {
        Some(true)
    } else if NEGATIVE.contains(&v.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        for v in ["OUI", "oui", "True", "1", "YES", "Vrai", " oui "] {
            assert!(is_affirmative(v), "{v}");
        }
        for v in ["NON", "false", "0", "", "peut-être"] {
            assert!(!is_affirmative(v), "{v}");
        }
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("OUI"), Some(true));
        assert_eq!(parse_flag("NON"), Some(false));
        assert_eq!(parse_flag("Faux"), Some(false));
        assert_eq!(parse_flag("?"), None);
    }
}
