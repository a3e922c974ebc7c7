//! Source-neutral recall records produced by the normalizers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declaration order is the processing order of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "FDA")]
    Fda,
    #[serde(rename = "FSIS")]
    Fsis,
    #[serde(rename = "RASFF")]
    Rasff,
    #[serde(rename = "UK_FSA")]
    UkFsa,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Fda => "FDA",
            Source::Fsis => "FSIS",
            Source::Rasff => "RASFF",
            Source::UkFsa => "UK_FSA",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific inputs to the classification natural key.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationInput {
    Fda {
        class: Option<String>,
    },
    Fsis {
        class: Option<String>,
    },
    Rasff {
        notification_type: Option<String>,
        risk_decision: Option<String>,
    },
    UkFsa {
        alert_type: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub key_text: Option<String>,
    /// Display name when it differs from the key text.
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// One raw source row mapped into the common intermediate shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallRecord {
    pub source: Source,
    pub reference_id: Option<String>,
    pub event_id: Option<String>,
    pub raw_date: Option<String>,
    /// FDA: US state. RASFF: notifying country. Unused for FSIS and UK FSA.
    pub recall_geography: Option<String>,
    /// FDA: firm country. RASFF: origin country.
    pub origin_geography: Option<String>,
    pub classification: ClassificationInput,
    pub product: ProductInput,
    pub company: Option<CompanyInput>,
    pub reason: Option<String>,
    pub distribution: Option<String>,
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutbreakRecord {
    pub outbreak_id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub state: Option<String>,
    pub illnesses: i64,
    pub hospitalizations: i64,
    pub deaths: i64,
    pub etiology: Option<String>,
    pub serotype: Option<String>,
    pub food_vehicle: Option<String>,
    pub ifsac_category: Option<String>,
    pub setting: Option<String>,
    pub primary_mode: Option<String>,
}

/// One CAERS consumer adverse event report, reduced to its first product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdverseEventRecord {
    pub report_number: Option<String>,
    /// `YYYYMMDD` as published.
    pub date_created: Option<String>,
    pub industry_code: Option<String>,
    pub industry_name: Option<String>,
    pub product_name: Option<String>,
    pub age: Option<String>,
    pub age_unit: Option<String>,
    pub gender: Option<String>,
    pub outcomes: Vec<String>,
    pub reaction_count: usize,
}

/// Returns `None` for missing, blank or spreadsheet-null values.
pub fn clean(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "None" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Truncates to at most `max` characters without splitting a code point.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_blank_and_nan() {
        assert_eq!(clean(None), None);
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(clean(Some("NaN")), None);
        assert_eq!(clean(Some(" Ohio ")), Some("Ohio".to_string()));
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("Türkiye", 2), "Tü");
    }

    #[test]
    fn test_source_labels() {
        let labels: Vec<&str> = [Source::Fda, Source::Fsis, Source::Rasff, Source::UkFsa]
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(labels, vec!["FDA", "FSIS", "RASFF", "UK_FSA"]);
        assert_eq!(Source::UkFsa.to_string(), "UK_FSA");
    }
}
