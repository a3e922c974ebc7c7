//! Country-name harmonization and geography natural keys.
//!
//! Recall geography and product-origin geography share one key space:
//! - `USA|<state>` for US states
//! - `USA|` for the United States without a state
//! - the canonical country name for every other country

use std::collections::HashMap;

use serde::Serialize;

pub const UNITED_STATES: &str = "United States";
pub const UNITED_KINGDOM: &str = "United Kingdom";

/// Upper-case alias -> canonical country name.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("AUSTRIA", "Austria"),
    ("BELGIUM", "Belgium"),
    ("BULGARIA", "Bulgaria"),
    ("CROATIA", "Croatia"),
    ("CYPRUS", "Cyprus"),
    ("CZECH REPUBLIC", "Czech Republic"),
    ("CZECHIA", "Czech Republic"),
    ("DENMARK", "Denmark"),
    ("ESTONIA", "Estonia"),
    ("FINLAND", "Finland"),
    ("FRANCE", "France"),
    ("GERMANY", "Germany"),
    ("GREECE", "Greece"),
    ("HUNGARY", "Hungary"),
    ("IRELAND", "Ireland"),
    ("ITALY", "Italy"),
    ("LATVIA", "Latvia"),
    ("LITHUANIA", "Lithuania"),
    ("LUXEMBOURG", "Luxembourg"),
    ("MALTA", "Malta"),
    ("NETHERLANDS", "Netherlands"),
    ("THE NETHERLANDS", "Netherlands"),
    ("POLAND", "Poland"),
    ("PORTUGAL", "Portugal"),
    ("ROMANIA", "Romania"),
    ("SLOVAKIA", "Slovakia"),
    ("SLOVENIA", "Slovenia"),
    ("SPAIN", "Spain"),
    ("SWEDEN", "Sweden"),
    ("SWITZERLAND", "Switzerland"),
    ("NORWAY", "Norway"),
    ("ICELAND", "Iceland"),
    ("LIECHTENSTEIN", "Liechtenstein"),
    ("TURKEY", "Türkiye"),
    ("TÜRKİYE", "Türkiye"),
    ("TÜRKIYE", "Türkiye"),
    ("TURKIYE", "Türkiye"),
    ("UNITED KINGDOM", "United Kingdom"),
    ("CHINA", "China"),
    ("INDIA", "India"),
    ("BRAZIL", "Brazil"),
    ("THAILAND", "Thailand"),
    ("VIETNAM", "Vietnam"),
    ("VIET NAM", "Vietnam"),
    ("INDONESIA", "Indonesia"),
    ("EGYPT", "Egypt"),
    ("MOROCCO", "Morocco"),
    ("ARGENTINA", "Argentina"),
    ("UNITED STATES", "United States"),
    ("UNITED STATES OF AMERICA", "United States"),
    ("USA", "United States"),
];

const EU_MEMBERS: &[&str] = &[
    "Austria",
    "Belgium",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Czechia",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Poland",
    "Portugal",
    "Romania",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
];

const EFTA_COUNTRIES: &[&str] = &["Switzerland", "Norway", "Iceland", "Liechtenstein"];

#[derive(Debug, Clone)]
pub struct CountryHarmonizer {
    aliases: HashMap<String, String>,
}

impl Default for CountryHarmonizer {
    fn default() -> Self {
        Self::from_pairs(COUNTRY_ALIASES)
    }
}

impl CountryHarmonizer {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let aliases = pairs
            .iter()
            .map(|(alias, canonical)| (alias.to_uppercase(), canonical.to_string()))
            .collect();
        Self { aliases }
    }

    /// Returns the canonical name, or `None` for a missing or blank input.
    ///
    /// Names outside the alias table keep their casing when they already
    /// read as a proper name and are title-cased otherwise.
    pub fn harmonize(&self, country: Option<&str>) -> Option<String> {
        let country = country?.trim();
        if country.is_empty() {
            return None;
        }
        if let Some(canonical) = self.aliases.get(&country.to_uppercase()) {
            return Some(canonical.clone());
        }
        let starts_upper = country.chars().next().is_some_and(char::is_uppercase);
        let all_upper = country == country.to_uppercase();
        if starts_upper && !all_upper {
            return Some(country.to_string());
        }
        Some(title_case(country))
    }
}

/// Capitalizes the first letter of every alphabetic run and lower-cases the
/// rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "EFTA")]
    Efta,
    #[serde(rename = "UK")]
    Uk,
    Other,
    Unknown,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Usa => "USA",
            Region::Eu => "EU",
            Region::Efta => "EFTA",
            Region::Uk => "UK",
            Region::Other => "Other",
            Region::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geography {
    pub country: String,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub region: Region,
    pub is_eu_member: bool,
    pub is_efta: bool,
}

impl Geography {
    pub fn unknown() -> Self {
        Self {
            country: "Unknown".to_string(),
            country_code: None,
            state: None,
            region: Region::Unknown,
            is_eu_member: false,
            is_efta: false,
        }
    }

    pub fn us_state(state: Option<&str>) -> Self {
        Self {
            country: UNITED_STATES.to_string(),
            country_code: Some("USA".to_string()),
            state: state.map(str::to_string),
            region: Region::Usa,
            is_eu_member: false,
            is_efta: false,
        }
    }

    pub fn united_kingdom() -> Self {
        Self {
            country: UNITED_KINGDOM.to_string(),
            country_code: Some("GBR".to_string()),
            state: None,
            region: Region::Uk,
            is_eu_member: false,
            is_efta: false,
        }
    }

    /// A non-US country identified only by its canonical name.
    pub fn country(name: &str) -> Self {
        let is_eu_member = EU_MEMBERS.contains(&name);
        let is_efta = EFTA_COUNTRIES.contains(&name);
        let region = if name == UNITED_KINGDOM {
            Region::Uk
        } else if is_eu_member {
            Region::Eu
        } else if is_efta {
            Region::Efta
        } else {
            Region::Other
        };
        Self {
            country: name.to_string(),
            country_code: None,
            state: None,
            region,
            is_eu_member,
            is_efta,
        }
    }
}

/// Natural key for a US recall location; a missing state yields `USA|`.
pub fn us_key(state: Option<&str>) -> String {
    format!("USA|{}", state.unwrap_or(""))
}

/// Country names containing a comma are distribution lists that leaked into
/// a country column and never become geography entries.
pub fn is_country_list(name: &str) -> bool {
    name.contains(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmonize_alias_table() {
        let h = CountryHarmonizer::default();
        assert_eq!(h.harmonize(Some("GERMANY")), Some("Germany".to_string()));
        assert_eq!(h.harmonize(Some("the netherlands")), Some("Netherlands".to_string()));
        assert_eq!(h.harmonize(Some("Czechia")), Some("Czech Republic".to_string()));
        assert_eq!(h.harmonize(Some("TURKEY")), Some("Türkiye".to_string()));
        assert_eq!(h.harmonize(Some("Türkiye")), Some("Türkiye".to_string()));
        assert_eq!(h.harmonize(Some("USA")), Some("United States".to_string()));
    }

    #[test]
    fn test_harmonize_blank_is_absent() {
        let h = CountryHarmonizer::default();
        assert_eq!(h.harmonize(None), None);
        assert_eq!(h.harmonize(Some("")), None);
        assert_eq!(h.harmonize(Some("   ")), None);
    }

    #[test]
    fn test_harmonize_title_cases_unknown_names() {
        let h = CountryHarmonizer::default();
        assert_eq!(h.harmonize(Some("NEW ZEALAND")), Some("New Zealand".to_string()));
        assert_eq!(h.harmonize(Some("south africa")), Some("South Africa".to_string()));
        assert_eq!(
            h.harmonize(Some("Bosnia and Herzegovina")),
            Some("Bosnia and Herzegovina".to_string())
        );
    }

    #[test]
    fn test_harmonize_trims_input() {
        let h = CountryHarmonizer::default();
        assert_eq!(h.harmonize(Some("  France ")), Some("France".to_string()));
    }

    #[test]
    fn test_title_case_apostrophes() {
        assert_eq!(title_case("CÔTE D'IVOIRE"), "Côte D'Ivoire");
    }

    #[test]
    fn test_country_regions() {
        assert_eq!(Geography::country("France").region, Region::Eu);
        assert!(Geography::country("France").is_eu_member);
        assert_eq!(Geography::country("Norway").region, Region::Efta);
        assert_eq!(Geography::country("United Kingdom").region, Region::Uk);
        assert_eq!(Geography::country("China").region, Region::Other);
    }

    #[test]
    fn test_us_keys() {
        assert_eq!(us_key(Some("California")), "USA|California");
        assert_eq!(us_key(None), "USA|");
    }
}
