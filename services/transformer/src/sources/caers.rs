//! openFDA CAERS food adverse event reports (`food-event-*.json`).

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::AdverseEventRecord;

use super::{lenient_text, optional_present, read_text};

/// CAERS also carries cosmetics reports, spelled e.g. `Cosmetics`.
const COSMETIC: &str = "Cosmetic";

#[derive(Deserialize)]
struct EventFile {
    #[serde(default)]
    results: Vec<EventReport>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventReport {
    #[serde(deserialize_with = "lenient_text")]
    report_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    date_created: Option<String>,
    outcomes: Vec<String>,
    reactions: Vec<String>,
    consumer: Option<Consumer>,
    products: Vec<Product>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Consumer {
    #[serde(deserialize_with = "lenient_text")]
    age: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    age_unit: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    gender: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Product {
    #[serde(deserialize_with = "lenient_text")]
    name_brand: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    industry_code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    industry_name: Option<String>,
}

impl Product {
    fn is_cosmetic(&self) -> bool {
        self.industry_name
            .as_deref()
            .is_some_and(|name| name.contains(COSMETIC))
    }
}

impl EventReport {
    /// Reports are described by their first listed product; reports without
    /// one are dropped.
    fn into_record(self) -> Option<AdverseEventRecord> {
        let product = self.products.into_iter().next()?;
        let consumer = self.consumer.unwrap_or_default();
        Some(AdverseEventRecord {
            report_number: self.report_number,
            date_created: self.date_created,
            industry_code: product.industry_code,
            industry_name: product.industry_name,
            product_name: product.name_brand,
            age: consumer.age,
            age_unit: consumer.age_unit,
            gender: consumer.gender,
            outcomes: self.outcomes,
            reaction_count: self.reactions.len(),
        })
    }
}

/// Parses a download and keeps food reports.
pub fn parse(json: &str) -> serde_json::Result<Vec<AdverseEventRecord>> {
    let file: EventFile = serde_json::from_str(json)?;
    let total = file.results.len();
    let mut cosmetics = 0usize;
    let mut records = Vec::new();
    for report in file.results {
        if report.products.first().is_some_and(Product::is_cosmetic) {
            cosmetics += 1;
            continue;
        }
        records.extend(report.into_record());
    }
    info!(kept = records.len(), cosmetics, total, "filtered CAERS reports to food");
    Ok(records)
}

pub fn load(path: &Path) -> Result<Vec<AdverseEventRecord>> {
    if !optional_present("CAERS", path) {
        return Ok(Vec::new());
    }
    let text = read_text(path)?;
    parse(&text).map_err(|e| Error::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"meta": {}, "results": [
        {
            "report_number": "2017-CFS-001",
            "date_created": "20170315",
            "outcomes": ["Hospitalization", "Visited Emergency Room"],
            "reactions": ["VOMITING", "NAUSEA", "DIARRHOEA"],
            "consumer": {"age": "6", "age_unit": "month(s)", "gender": "Female"},
            "products": [
                {"role": "SUSPECT", "name_brand": "INFANT FORMULA", "industry_code": 40,
                 "industry_name": "Baby Food Products"},
                {"role": "CONCOMITANT", "name_brand": "LIPSTICK", "industry_name": "Cosmetics"}
            ]
        },
        {
            "report_number": "2017-CFS-002",
            "date_created": "20170401",
            "outcomes": ["Other Outcome"],
            "products": [{"name_brand": "FACE CREAM", "industry_name": "Cosmetics"}]
        },
        {"report_number": "2017-CFS-003", "date_created": "20170402", "products": []},
        {
            "report_number": 4,
            "products": [{"name_brand": "KALE", "industry_name": "Vegetables/Vegetable Products"}]
        }
    ]}"#;

    #[test]
    fn test_cosmetics_and_productless_reports_skipped() {
        let records = parse(SAMPLE).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.report_number.as_deref()).collect();
        assert_eq!(ids, vec![Some("2017-CFS-001"), Some("4")]);
    }

    #[test]
    fn test_first_product_describes_the_report() {
        let records = parse(SAMPLE).unwrap();
        let first = &records[0];
        assert_eq!(first.product_name.as_deref(), Some("INFANT FORMULA"));
        assert_eq!(first.industry_code.as_deref(), Some("40"));
        assert_eq!(first.industry_name.as_deref(), Some("Baby Food Products"));
        assert_eq!(first.age.as_deref(), Some("6"));
        assert_eq!(first.age_unit.as_deref(), Some("month(s)"));
        assert_eq!(first.gender.as_deref(), Some("Female"));
        assert_eq!(first.reaction_count, 3);
        assert_eq!(first.outcomes.len(), 2);
    }

    #[test]
    fn test_missing_consumer_and_lists_default() {
        let records = parse(SAMPLE).unwrap();
        let kale = &records[1];
        assert_eq!(kale.date_created, None);
        assert_eq!(kale.age, None);
        assert!(kale.outcomes.is_empty());
        assert_eq!(kale.reaction_count, 0);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("food-event.json")).unwrap().is_empty());
    }
}
