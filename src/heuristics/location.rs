use std::sync::LazyLock;

use regex::Regex;

static REMOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)remote|worldwide|anywhere|global").unwrap());
static POSTAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{5,6})\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}

pub const INDIA: Country = Country {
    code: "IN",
    name: "India",
};

struct CountryRule {
    pattern: Regex,
    country: Country,
}

impl CountryRule {
    fn new(pattern: &str, code: &'static str, name: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            country: Country { code, name },
        }
    }
}

// Evaluated in order against the lowercased text; the first hit wins.
static COUNTRY_RULES: LazyLock<Vec<CountryRule>> = LazyLock::new(|| {
    vec![
        CountryRule::new(r"\busa\b|\bunited states\b|\bus\b", "US", "United States"),
        CountryRule::new(r"\bcanada\b|\bca\b", "CA", "Canada"),
        CountryRule::new(r"\bgermany\b|\bde\b", "DE", "Germany"),
        CountryRule::new(r"\beurope\b", "EU", "Europe"),
        CountryRule::new(r"\bphilippines\b", "PH", "Philippines"),
        CountryRule::new(r"\bsouth africa\b", "ZA", "South Africa"),
        CountryRule::new(r"\bjamaica\b", "JM", "Jamaica"),
        CountryRule::new(r"\bisrael\b", "IL", "Israel"),
        CountryRule::new(r"\bindia\b|\bin\b", "IN", "India"),
    ]
});

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub remote: bool,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub country: Country,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            remote: false,
            locality: None,
            region: None,
            postal_code: None,
            street_address: None,
            country: INDIA,
        }
    }
}

pub fn match_country(text: &str) -> Country {
    let lower = text.to_lowercase();
    COUNTRY_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&lower))
        .map(|rule| rule.country)
        .unwrap_or(INDIA)
}

/// Split a free-text location into schema.org address parts. Empty input is
/// an on-site location in India with nothing else known.
pub fn parse_location(value: &str) -> Location {
    let text = value.trim();
    if text.is_empty() {
        return Location::default();
    }

    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    Location {
        remote: REMOTE_RE.is_match(text),
        locality: Some(parts.first().copied().unwrap_or(text).to_string()),
        region: parts.get(1).map(|s| s.to_string()),
        postal_code: POSTAL_RE.captures(text).map(|c| c[1].to_string()),
        street_address: Some(text.to_string()),
        country: match_country(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_worldwide() {
        let loc = parse_location("Remote, Worldwide");
        assert!(loc.remote);
        assert_eq!(loc.locality.as_deref(), Some("Remote"));
        assert_eq!(loc.country.code, "IN");
    }

    #[test]
    fn indian_city_with_postal_code() {
        let loc = parse_location("Bengaluru, Karnataka, 560001");
        assert!(!loc.remote);
        assert_eq!(loc.locality.as_deref(), Some("Bengaluru"));
        assert_eq!(loc.region.as_deref(), Some("Karnataka"));
        assert_eq!(loc.postal_code.as_deref(), Some("560001"));
        assert_eq!(loc.street_address.as_deref(), Some("Bengaluru, Karnataka, 560001"));
        assert_eq!(loc.country.code, "IN");
    }

    #[test]
    fn empty_defaults_to_india() {
        assert_eq!(parse_location("   "), Location::default());
    }

    #[test]
    fn first_rule_wins() {
        // both USA and India mentioned: USA is earlier in the table
        assert_eq!(match_country("Remote (USA or India)").code, "US");
        assert_eq!(match_country("Toronto, CA").code, "CA");
        assert_eq!(match_country("Berlin, Germany").code, "DE");
        assert_eq!(match_country("Cape Town, South Africa").code, "ZA");
        assert_eq!(match_country("Anywhere in Europe").code, "EU");
    }

    #[test]
    fn short_codes_need_word_edges() {
        // "us" inside "campus" and "de" inside "delhi" are not country codes
        assert_eq!(match_country("Campus drive, New Delhi").code, "IN");
    }
}
