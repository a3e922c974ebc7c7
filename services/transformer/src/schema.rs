//! Finished star schema tables in their output shape.

use serde::Serialize;

use crate::adverse::AdverseEventRow;
use crate::calendar::{DateDimension, DateRow};
use crate::dimensions::Dimensions;
use crate::facts::FactRecall;
use crate::health::HealthImpactRow;
use crate::model::Source;
use crate::summary::YearlySummaryRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeographyRow {
    pub geography_key: u32,
    pub natural_key: String,
    pub country: String,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub region: &'static str,
    #[serde(rename = "IsEUMember")]
    pub is_eu_member: bool,
    #[serde(rename = "IsEFTA")]
    pub is_efta: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassificationRow {
    pub classification_key: u32,
    pub natural_key: String,
    pub source: Option<Source>,
    pub original_classification: String,
    #[serde(rename = "USAClassLevel")]
    pub usa_class_level: Option<String>,
    pub notification_type: Option<String>,
    pub risk_decision: Option<String>,
    pub severity_level: &'static str,
    pub severity_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRow {
    pub product_key: u32,
    pub natural_key: String,
    pub product_name: String,
    pub product_category: Option<String>,
    pub product_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyRow {
    pub company_key: u32,
    pub natural_key: String,
    pub company_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub establishment_number: Option<String>,
}

/// Table names in the order they are written and loaded.
pub const TABLES: [&str; 9] = [
    "dim_date",
    "dim_geography",
    "dim_classification",
    "dim_product",
    "dim_company",
    "fact_recalls",
    "fact_health_impact",
    "fact_adverse_events",
    "fact_yearly_summary",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSchema {
    pub dates: Vec<DateRow>,
    pub geography: Vec<GeographyRow>,
    pub classification: Vec<ClassificationRow>,
    pub product: Vec<ProductRow>,
    pub company: Vec<CompanyRow>,
    pub recalls: Vec<FactRecall>,
    pub health_impact: Vec<HealthImpactRow>,
    pub adverse_events: Vec<AdverseEventRow>,
    pub yearly_summary: Vec<YearlySummaryRow>,
}

impl StarSchema {
    pub fn new(
        dates: &DateDimension,
        dims: &Dimensions,
        recalls: Vec<FactRecall>,
        health_impact: Vec<HealthImpactRow>,
        adverse_events: Vec<AdverseEventRow>,
        yearly_summary: Vec<YearlySummaryRow>,
    ) -> Self {
        let geography = dims
            .geography
            .entries()
            .iter()
            .map(|e| GeographyRow {
                geography_key: e.key,
                natural_key: e.natural_key.clone(),
                country: e.attrs.country.clone(),
                country_code: e.attrs.country_code.clone(),
                state: e.attrs.state.clone(),
                region: e.attrs.region.as_str(),
                is_eu_member: e.attrs.is_eu_member,
                is_efta: e.attrs.is_efta,
            })
            .collect();
        let classification = dims
            .classification
            .entries()
            .iter()
            .map(|e| ClassificationRow {
                classification_key: e.key,
                natural_key: e.natural_key.clone(),
                source: e.attrs.source,
                original_classification: e.attrs.original_classification.clone(),
                usa_class_level: e.attrs.usa_class_level.clone(),
                notification_type: e.attrs.notification_type.clone(),
                risk_decision: e.attrs.risk_decision.clone(),
                severity_level: e.attrs.severity.level.as_str(),
                severity_score: e.attrs.severity.score,
            })
            .collect();
        let product = dims
            .product
            .entries()
            .iter()
            .map(|e| ProductRow {
                product_key: e.key,
                natural_key: e.natural_key.clone(),
                product_name: e.attrs.name.clone(),
                product_category: e.attrs.category.clone(),
                product_type: e.attrs.product_type.clone(),
            })
            .collect();
        let company = dims
            .company
            .entries()
            .iter()
            .map(|e| CompanyRow {
                company_key: e.key,
                natural_key: e.natural_key.clone(),
                company_name: e.attrs.name.clone(),
                city: e.attrs.city.clone(),
                state: e.attrs.state.clone(),
                country: e.attrs.country.clone(),
                establishment_number: e.attrs.establishment_number.clone(),
            })
            .collect();

        Self {
            dates: dates.rows().to_vec(),
            geography,
            classification,
            product,
            company,
            recalls,
            health_impact,
            adverse_events,
            yearly_summary,
        }
    }

    /// Row count per table, in [`TABLES`] order.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        let counts = [
            self.dates.len(),
            self.geography.len(),
            self.classification.len(),
            self.product.len(),
            self.company.len(),
            self.recalls.len(),
            self.health_impact.len(),
            self.adverse_events.len(),
            self.yearly_summary.len(),
        ];
        TABLES.into_iter().zip(counts).collect()
    }
}
