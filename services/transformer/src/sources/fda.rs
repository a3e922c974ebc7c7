//! openFDA food enforcement reports.

use std::path::Path;

use serde::Deserialize;

use crate::calendar::parse_date;
use crate::error::{Error, Result};
use crate::model::{ClassificationInput, CompanyInput, ProductInput, RecallRecord, Source};
use crate::product::categorize;

use super::{lenient_text, read_text};

/// The download is `{"meta": ..., "results": [...]}`; older exports are a
/// bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnforcementFile {
    Wrapped { results: Vec<EnforcementReport> },
    Bare(Vec<EnforcementReport>),
}

#[derive(Debug, Default, Deserialize)]
struct EnforcementReport {
    #[serde(default, deserialize_with = "lenient_text")]
    recall_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    recall_initiation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    report_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    classification: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    product_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    recalling_firm: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    reason_for_recall: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    distribution_pattern: Option<String>,
}

impl EnforcementReport {
    /// Enforcement reports also cover drugs and devices.
    fn is_food(&self) -> bool {
        self.product_type.as_deref().map_or(true, |t| t == "Food")
    }

    /// The first parseable of initiation and report date, else the raw
    /// initiation date.
    fn recall_date(&self) -> Option<String> {
        [&self.recall_initiation_date, &self.report_date]
            .into_iter()
            .flatten()
            .find(|raw| parse_date(raw).is_some())
            .or(self.recall_initiation_date.as_ref())
            .cloned()
    }

    fn into_record(self) -> RecallRecord {
        let raw_date = self.recall_date();
        let category = self
            .product_description
            .as_deref()
            .map(|d| categorize(d).to_string());
        let company = self.recalling_firm.map(|name| CompanyInput {
            name,
            city: self.city,
            state: self.state.clone(),
            country: self.country.clone(),
        });
        RecallRecord {
            source: Source::Fda,
            reference_id: self.recall_number,
            event_id: self.event_id,
            raw_date,
            recall_geography: self.state,
            origin_geography: self.country,
            classification: ClassificationInput::Fda {
                class: self.classification,
            },
            product: ProductInput {
                key_text: self.product_description,
                name: None,
                category,
            },
            company,
            reason: self.reason_for_recall,
            distribution: self.distribution_pattern,
            action_taken: None,
        }
    }
}

pub fn parse(json: &str) -> serde_json::Result<Vec<RecallRecord>> {
    let reports = match serde_json::from_str(json)? {
        EnforcementFile::Wrapped { results } => results,
        EnforcementFile::Bare(results) => results,
    };
    Ok(reports
        .into_iter()
        .filter(EnforcementReport::is_food)
        .map(EnforcementReport::into_record)
        .collect())
}

pub fn load(path: &Path) -> Result<Vec<RecallRecord>> {
    let text = read_text(path)?;
    parse(&text).map_err(|e| Error::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "meta": {"results": {"total": 3}},
        "results": [
            {
                "recall_number": "F-0001-2024",
                "event_id": 93001,
                "recall_initiation_date": "20240115",
                "report_date": "20240201",
                "state": "CA",
                "city": "Fresno",
                "country": "United States",
                "classification": "Class I",
                "product_description": "Chicken salad sandwich",
                "product_type": "Food",
                "recalling_firm": "Acme Foods",
                "reason_for_recall": "Listeria monocytogenes",
                "distribution_pattern": "Nationwide"
            },
            {
                "recall_number": "D-0002-2024",
                "product_type": "Drugs"
            },
            {
                "recall_number": "F-0003-2024",
                "recall_initiation_date": "unknown",
                "report_date": "2024-02-01",
                "product_type": "Food"
            }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_food_only() {
        let records = parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == Source::Fda));
    }

    #[test]
    fn test_parse_maps_fields() {
        let records = parse(SAMPLE).unwrap();
        let r = &records[0];
        assert_eq!(r.reference_id.as_deref(), Some("F-0001-2024"));
        assert_eq!(r.event_id.as_deref(), Some("93001"));
        assert_eq!(r.raw_date.as_deref(), Some("20240115"));
        assert_eq!(r.recall_geography.as_deref(), Some("CA"));
        assert_eq!(r.origin_geography.as_deref(), Some("United States"));
        assert_eq!(
            r.classification,
            ClassificationInput::Fda {
                class: Some("Class I".to_string())
            }
        );
        assert_eq!(r.product.category.as_deref(), Some("Meat/Poultry"));
        let company = r.company.as_ref().unwrap();
        assert_eq!(company.name, "Acme Foods");
        assert_eq!(company.city.as_deref(), Some("Fresno"));
        assert_eq!(r.distribution.as_deref(), Some("Nationwide"));
    }

    #[test]
    fn test_report_date_used_when_initiation_unparseable() {
        let records = parse(SAMPLE).unwrap();
        assert_eq!(records[1].raw_date.as_deref(), Some("2024-02-01"));
        assert_eq!(records[1].company, None);
    }

    #[test]
    fn test_parse_bare_array() {
        let records = parse(r#"[{"recall_number": "F-9", "classification": "Class II"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_date, None);
    }
}
