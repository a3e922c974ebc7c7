//! Deduplicating dimension tables and the builder that fills them.
//!
//! Every table is an arena of entries plus an index from natural key to
//! surrogate key. Slot `n` of the arena holds key `n + 1`; key 1 is the
//! "unknown" sentinel created with the table.

use std::collections::HashMap;

use crate::geography::{self, CountryHarmonizer, Geography};
use crate::model::{truncate, ClassificationInput, RecallRecord, Source};
use crate::severity::{fsis_class_label, Severity, SeverityTables};

/// Surrogate key of the sentinel row in every data-driven dimension.
pub const UNKNOWN_KEY: u32 = 1;

/// Natural key of the sentinel row. Data-driven keys are never empty, and
/// never wrapped in angle brackets, so this cannot collide.
pub const UNKNOWN_NATURAL_KEY: &str = "<unknown>";

/// Product names, product keys and company names are cut to this length.
pub const MAX_NAME_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionEntry<A> {
    pub key: u32,
    pub natural_key: String,
    pub attrs: A,
}

#[derive(Debug, Clone)]
pub struct DimensionTable<A> {
    entries: Vec<DimensionEntry<A>>,
    index: HashMap<String, u32>,
}

impl<A> DimensionTable<A> {
    pub fn new(sentinel: A) -> Self {
        let mut index = HashMap::new();
        index.insert(UNKNOWN_NATURAL_KEY.to_string(), UNKNOWN_KEY);
        Self {
            entries: vec![DimensionEntry {
                key: UNKNOWN_KEY,
                natural_key: UNKNOWN_NATURAL_KEY.to_string(),
                attrs: sentinel,
            }],
            index,
        }
    }

    /// Returns the key for `natural_key`, creating an entry with the next key
    /// on first sight. Attributes of an existing entry are never replaced.
    pub fn resolve(&mut self, natural_key: &str, attrs: impl FnOnce() -> A) -> u32 {
        if let Some(key) = self.index.get(natural_key) {
            return *key;
        }
        let key = self.entries.len() as u32 + 1;
        self.entries.push(DimensionEntry {
            key,
            natural_key: natural_key.to_string(),
            attrs: attrs(),
        });
        self.index.insert(natural_key.to_string(), key);
        key
    }

    pub fn lookup(&self, natural_key: &str) -> Option<u32> {
        self.index.get(natural_key).copied()
    }

    #[cfg(test)]
    pub fn get(&self, key: u32) -> Option<&DimensionEntry<A>> {
        let slot = (key as usize).checked_sub(1)?;
        self.entries.get(slot)
    }

    /// Entries in key order, sentinel first.
    pub fn entries(&self) -> &[DimensionEntry<A>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationAttrs {
    pub source: Option<Source>,
    pub original_classification: String,
    pub usa_class_level: Option<String>,
    pub notification_type: Option<String>,
    pub risk_decision: Option<String>,
    pub severity: Severity,
}

impl ClassificationAttrs {
    fn unknown() -> Self {
        Self {
            source: None,
            original_classification: "Unknown".to_string(),
            usa_class_level: None,
            notification_type: None,
            risk_decision: None,
            severity: Severity::UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttrs {
    pub name: String,
    pub category: Option<String>,
    pub product_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyAttrs {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub establishment_number: Option<String>,
}

/// Natural keys of one record. Registration and fact assembly both derive
/// keys through [`DimensionBuilder::natural_keys`] so they never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NaturalKeys {
    pub geography: Option<String>,
    pub origin: Option<String>,
    pub classification: Option<String>,
    pub product: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dimensions {
    pub geography: DimensionTable<Geography>,
    pub classification: DimensionTable<ClassificationAttrs>,
    pub product: DimensionTable<ProductAttrs>,
    pub company: DimensionTable<CompanyAttrs>,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            geography: DimensionTable::new(Geography::unknown()),
            classification: DimensionTable::new(ClassificationAttrs::unknown()),
            product: DimensionTable::new(ProductAttrs {
                name: "Unknown".to_string(),
                category: None,
                product_type: "Unknown".to_string(),
            }),
            company: DimensionTable::new(CompanyAttrs {
                name: "Unknown".to_string(),
                city: None,
                state: None,
                country: "Unknown".to_string(),
                establishment_number: None,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DimensionBuilder {
    harmonizer: CountryHarmonizer,
    severity: SeverityTables,
    dims: Dimensions,
}

impl DimensionBuilder {
    pub fn new(harmonizer: CountryHarmonizer, severity: SeverityTables) -> Self {
        Self {
            harmonizer,
            severity,
            dims: Dimensions::default(),
        }
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    /// Canonical country name usable as a geography key; distribution lists
    /// that leaked into a country column yield `None`.
    fn country_key(&self, raw: Option<&str>) -> Option<String> {
        self.harmonizer
            .harmonize(raw)
            .filter(|name| !geography::is_country_list(name))
    }

    /// Like [`Self::country_key`], but the United States joins the US key
    /// space as `USA|`.
    fn foreign_country_key(&self, raw: Option<&str>) -> Option<String> {
        self.country_key(raw).map(|name| {
            if name == geography::UNITED_STATES {
                geography::us_key(None)
            } else {
                name
            }
        })
    }

    pub fn natural_keys(&self, record: &RecallRecord) -> NaturalKeys {
        let (geography, origin) = match record.source {
            Source::Fda => {
                let recall = geography::us_key(record.recall_geography.as_deref());
                let origin = match self.country_key(record.origin_geography.as_deref()) {
                    Some(name) if name == geography::UNITED_STATES => Some(recall.clone()),
                    other => other,
                };
                (Some(recall), origin)
            }
            Source::Fsis => (Some(geography::us_key(None)), None),
            Source::Rasff => (
                self.foreign_country_key(record.recall_geography.as_deref()),
                self.foreign_country_key(record.origin_geography.as_deref()),
            ),
            Source::UkFsa => (Some(geography::UNITED_KINGDOM.to_string()), None),
        };

        let classification = match &record.classification {
            ClassificationInput::Fda { class } => class.as_ref().map(|c| format!("FDA|{c}")),
            ClassificationInput::Fsis { class } => class
                .as_ref()
                .map(|c| format!("FSIS|{}", fsis_class_label(c))),
            ClassificationInput::Rasff {
                notification_type,
                risk_decision,
            } => Some(format!(
                "RASFF|{}|{}",
                notification_type.as_deref().unwrap_or("unknown"),
                risk_decision.as_deref().unwrap_or("unknown"),
            )),
            ClassificationInput::UkFsa { alert_type } => Some(format!("UK_FSA|{alert_type}")),
        };

        let product = record
            .product
            .key_text
            .as_deref()
            .map(|text| format!("{}|{}", record.source, truncate(text, MAX_NAME_CHARS)));

        let company = record
            .company
            .as_ref()
            .map(|c| truncate(&c.name, MAX_NAME_CHARS));

        NaturalKeys {
            geography,
            origin,
            classification,
            product,
            company,
        }
    }

    /// Registers every natural key of `record`; the first record to carry a
    /// key decides that entry's attributes.
    pub fn register(&mut self, record: &RecallRecord) {
        let keys = self.natural_keys(record);

        for key in [&keys.geography, &keys.origin].into_iter().flatten() {
            self.dims
                .geography
                .resolve(key, || geography_from_key(key));
        }

        if let Some(key) = &keys.classification {
            let severity = &self.severity;
            self.dims
                .classification
                .resolve(key, || classification_attrs(severity, &record.classification));
        }

        if let Some(key) = &keys.product {
            self.dims.product.resolve(key, || {
                let name = record
                    .product
                    .name
                    .as_deref()
                    .or(record.product.key_text.as_deref())
                    .unwrap_or("Unknown Product");
                let category = record.product.category.clone();
                ProductAttrs {
                    name: truncate(name, MAX_NAME_CHARS),
                    product_type: crate::product::product_type(category.as_deref()).to_string(),
                    category,
                }
            });
        }

        if let (Some(key), Some(company)) = (&keys.company, &record.company) {
            self.dims.company.resolve(key, || CompanyAttrs {
                name: key.clone(),
                city: company.city.clone(),
                state: company.state.clone(),
                country: company
                    .country
                    .clone()
                    .unwrap_or_else(|| geography::UNITED_STATES.to_string()),
                establishment_number: None,
            });
        }
    }
}

fn classification_attrs(severity: &SeverityTables, input: &ClassificationInput) -> ClassificationAttrs {
    match input {
        ClassificationInput::Fda { class } => {
            let class = class.clone().unwrap_or_default();
            ClassificationAttrs {
                source: Some(Source::Fda),
                severity: severity.us_class(&class),
                usa_class_level: Some(class.clone()),
                original_classification: class,
                notification_type: None,
                risk_decision: None,
            }
        }
        ClassificationInput::Fsis { class } => {
            let class = class.clone().unwrap_or_default();
            let label = fsis_class_label(&class);
            ClassificationAttrs {
                source: Some(Source::Fsis),
                severity: severity.us_class(&label),
                usa_class_level: Some(label),
                original_classification: class,
                notification_type: None,
                risk_decision: None,
            }
        }
        ClassificationInput::Rasff {
            notification_type,
            risk_decision,
        } => {
            let notification = notification_type.as_deref().unwrap_or("unknown");
            let risk = risk_decision.as_deref().unwrap_or("unknown");
            ClassificationAttrs {
                source: Some(Source::Rasff),
                original_classification: notification.to_string(),
                usa_class_level: None,
                notification_type: Some(severity.rasff_notification_name(notification)),
                risk_decision: risk_decision.clone(),
                severity: severity.rasff(notification, risk),
            }
        }
        ClassificationInput::UkFsa { alert_type } => ClassificationAttrs {
            source: Some(Source::UkFsa),
            original_classification: alert_type.clone(),
            usa_class_level: None,
            notification_type: Some(alert_type.clone()),
            risk_decision: None,
            severity: severity.uk_alert(alert_type),
        },
    }
}

/// Geography attributes are fully determined by the natural key.
fn geography_from_key(key: &str) -> Geography {
    if let Some(state) = key.strip_prefix("USA|") {
        return Geography::us_state((!state.is_empty()).then_some(state));
    }
    if key == geography::UNITED_KINGDOM {
        return Geography::united_kingdom();
    }
    Geography::country(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::Region;
    use crate::model::{CompanyInput, ProductInput};
    use crate::severity::SeverityLevel;

    fn builder() -> DimensionBuilder {
        DimensionBuilder::new(CountryHarmonizer::default(), SeverityTables::default())
    }

    fn fda(state: Option<&str>, country: Option<&str>, class: &str, desc: &str) -> RecallRecord {
        RecallRecord {
            source: Source::Fda,
            reference_id: Some("F-0001-2024".to_string()),
            event_id: Some("90001".to_string()),
            raw_date: Some("20240115".to_string()),
            recall_geography: state.map(str::to_string),
            origin_geography: country.map(str::to_string),
            classification: ClassificationInput::Fda {
                class: Some(class.to_string()),
            },
            product: ProductInput {
                key_text: Some(desc.to_string()),
                name: None,
                category: Some(crate::product::categorize(desc).to_string()),
            },
            company: Some(CompanyInput {
                name: "Acme Foods".to_string(),
                city: Some("Fresno".to_string()),
                state: state.map(str::to_string),
                country: None,
            }),
            reason: Some("Undeclared milk".to_string()),
            distribution: None,
            action_taken: None,
        }
    }

    fn rasff(notifying: &str, origin: &str, notification: Option<&str>) -> RecallRecord {
        RecallRecord {
            source: Source::Rasff,
            reference_id: Some("2024.0001".to_string()),
            event_id: None,
            raw_date: Some("2024-01-15".to_string()),
            recall_geography: Some(notifying.to_string()),
            origin_geography: Some(origin.to_string()),
            classification: ClassificationInput::Rasff {
                notification_type: notification.map(str::to_string),
                risk_decision: None,
            },
            product: ProductInput {
                key_text: Some("aflatoxins in pistachios".to_string()),
                name: None,
                category: Some("nuts, nut products and seeds".to_string()),
            },
            company: None,
            reason: Some("aflatoxins (mycotoxins)".to_string()),
            distribution: None,
            action_taken: None,
        }
    }

    // ------------------------------------------------------------------
    // DimensionTable
    // ------------------------------------------------------------------

    #[test]
    fn test_sentinel_is_key_one() {
        let table: DimensionTable<&str> = DimensionTable::new("unknown");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(UNKNOWN_KEY).unwrap().attrs, "unknown");
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn test_resolve_assigns_keys_from_two_in_first_seen_order() {
        let mut table = DimensionTable::new("unknown");
        assert_eq!(table.resolve("b", || "B"), 2);
        assert_eq!(table.resolve("a", || "A"), 3);
        assert_eq!(table.resolve("b", || "B again"), 2);
        let keys: Vec<_> = table.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn test_resolve_is_first_write_wins() {
        let mut table = DimensionTable::new(0);
        table.resolve("x", || 10);
        table.resolve("x", || 20);
        assert_eq!(table.get(2).unwrap().attrs, 10);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unregistered_key_falls_back_to_sentinel() {
        let table: DimensionTable<()> = DimensionTable::new(());
        assert_eq!(table.lookup("USA|Texas"), None);
        assert_eq!(table.lookup("USA|Texas").unwrap_or(UNKNOWN_KEY), UNKNOWN_KEY);
    }

    // ------------------------------------------------------------------
    // Geography
    // ------------------------------------------------------------------

    #[test]
    fn test_same_us_state_registers_once() {
        let mut b = builder();
        b.register(&fda(Some("California"), Some("United States"), "Class I", "Cheese"));
        b.register(&fda(Some("California"), Some("USA"), "Class II", "Milk"));
        let geo = &b.dimensions().geography;
        let first = geo.lookup("USA|California").unwrap();
        assert_eq!(first, 2);
        let rows: Vec<_> = geo
            .entries()
            .iter()
            .filter(|e| e.natural_key == "USA|California")
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(geo.len(), 2);
    }

    #[test]
    fn test_fda_us_origin_reuses_recall_geography() {
        let b = builder();
        let keys = b.natural_keys(&fda(Some("Ohio"), Some("United States"), "Class I", "Ham"));
        assert_eq!(keys.geography.as_deref(), Some("USA|Ohio"));
        assert_eq!(keys.origin.as_deref(), Some("USA|Ohio"));
    }

    #[test]
    fn test_fda_import_origin_is_harmonized_country() {
        let mut b = builder();
        b.register(&fda(Some("Ohio"), Some("MEXICO"), "Class I", "Peppers"));
        let geo = &b.dimensions().geography;
        let key = geo.lookup("Mexico").unwrap();
        assert_eq!(geo.get(key).unwrap().attrs.region, Region::Other);
    }

    #[test]
    fn test_fda_without_state_uses_bare_usa_key() {
        let b = builder();
        let keys = b.natural_keys(&fda(None, None, "Class I", "Ham"));
        assert_eq!(keys.geography.as_deref(), Some("USA|"));
        assert_eq!(keys.origin, None);
    }

    #[test]
    fn test_rasff_geography_harmonized_and_lists_skipped() {
        let mut b = builder();
        let record = rasff("GERMANY", "Turkey, Iran", Some("alert"));
        let keys = b.natural_keys(&record);
        assert_eq!(keys.geography.as_deref(), Some("Germany"));
        assert_eq!(keys.origin, None);
        b.register(&record);
        let geo = &b.dimensions().geography;
        let germany = geo.get(geo.lookup("Germany").unwrap()).unwrap();
        assert!(germany.attrs.is_eu_member);
        assert_eq!(geo.len(), 2);
    }

    #[test]
    fn test_rasff_united_states_shares_the_usa_key() {
        let mut b = builder();
        let imported = rasff("Italy", "USA", Some("alert"));
        let keys = b.natural_keys(&imported);
        let fda_keys = b.natural_keys(&fda(None, Some("United States"), "Class I", "Ham"));
        assert_eq!(keys.origin, fda_keys.geography);
        assert_eq!(keys.origin.as_deref(), Some("USA|"));

        b.register(&imported);
        b.register(&rasff("UNITED STATES", "Italy", Some("alert")));
        let geo = &b.dimensions().geography;
        assert_eq!(geo.lookup("United States"), None);
        let usa = geo.get(geo.lookup("USA|").unwrap()).unwrap();
        assert_eq!(usa.attrs.region, Region::Usa);
        // <unknown>, Italy, USA|
        assert_eq!(geo.len(), 3);
    }

    #[test]
    fn test_uk_geography_has_country_code() {
        assert_eq!(geography_from_key("United Kingdom").country_code.as_deref(), Some("GBR"));
        assert_eq!(geography_from_key("USA|").state, None);
        assert_eq!(geography_from_key("USA|Iowa").state.as_deref(), Some("Iowa"));
    }

    // ------------------------------------------------------------------
    // Classification, product, company
    // ------------------------------------------------------------------

    #[test]
    fn test_fsis_numeric_class_normalized_in_key() {
        let mut b = builder();
        let record = RecallRecord {
            source: Source::Fsis,
            classification: ClassificationInput::Fsis {
                class: Some("1".to_string()),
            },
            company: None,
            ..fda(None, None, "Class I", "Ground beef")
        };
        b.register(&record);
        let class = &b.dimensions().classification;
        let key = class.lookup("FSIS|Class I").unwrap();
        let entry = class.get(key).unwrap();
        assert_eq!(entry.attrs.original_classification, "1");
        assert_eq!(entry.attrs.severity.level, SeverityLevel::High);
    }

    #[test]
    fn test_rasff_classification_key_spells_absent_parts() {
        let mut b = builder();
        b.register(&rasff("France", "China", Some("alert")));
        let class = &b.dimensions().classification;
        let key = class.lookup("RASFF|alert|unknown").unwrap();
        let entry = class.get(key).unwrap();
        assert_eq!(entry.attrs.notification_type.as_deref(), Some("alert notification"));
        assert_eq!(entry.attrs.risk_decision, None);
        assert_eq!(entry.attrs.severity, Severity::new(SeverityLevel::High, 9));

        let keys = b.natural_keys(&rasff("France", "China", None));
        assert_eq!(keys.classification.as_deref(), Some("RASFF|unknown|unknown"));
    }

    #[test]
    fn test_product_key_is_source_qualified_and_truncated() {
        let long = "x".repeat(300);
        let b = builder();
        let keys = b.natural_keys(&fda(Some("Ohio"), None, "Class I", &long));
        let key = keys.product.unwrap();
        assert!(key.starts_with("FDA|"));
        assert_eq!(key.chars().count(), 4 + MAX_NAME_CHARS);
    }

    #[test]
    fn test_product_attrs_from_first_record() {
        let mut b = builder();
        b.register(&fda(Some("Ohio"), None, "Class I", "Chicken nuggets"));
        let product = &b.dimensions().product;
        let entry = product.get(product.lookup("FDA|Chicken nuggets").unwrap()).unwrap();
        assert_eq!(entry.attrs.category.as_deref(), Some("Meat/Poultry"));
        assert_eq!(entry.attrs.product_type, "Fresh Protein");
    }

    #[test]
    fn test_company_defaults_country() {
        let mut b = builder();
        b.register(&fda(Some("Ohio"), None, "Class I", "Ham"));
        let company = &b.dimensions().company;
        let entry = company.get(company.lookup("Acme Foods").unwrap()).unwrap();
        assert_eq!(entry.attrs.country, "United States");
        assert_eq!(entry.attrs.city.as_deref(), Some("Fresno"));
    }

    #[test]
    fn test_missing_inputs_produce_no_keys() {
        let b = builder();
        let mut record = rasff("", "", None);
        record.product.key_text = None;
        let keys = b.natural_keys(&record);
        assert_eq!(keys.geography, None);
        assert_eq!(keys.origin, None);
        assert_eq!(keys.product, None);
        assert_eq!(keys.company, None);
    }

    #[test]
    fn test_registration_is_deterministic() {
        let records = vec![
            fda(Some("Ohio"), Some("Canada"), "Class I", "Ham"),
            rasff("Italy", "India", Some("border rejection")),
            fda(Some("Texas"), None, "Class II", "Salsa"),
        ];
        let run = || {
            let mut b = builder();
            records.iter().for_each(|r| b.register(r));
            b.dimensions()
                .geography
                .entries()
                .iter()
                .map(|e| (e.key, e.natural_key.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
