//! UK Food Standards Agency food alerts.

use std::path::Path;

use serde::Deserialize;

use crate::calendar::parse_date;
use crate::error::{Error, Result};
use crate::geography::UNITED_KINGDOM;
use crate::model::{clean, ClassificationInput, ProductInput, RecallRecord, Source};
use crate::product::categorize;

use super::{lenient_text, optional_present, read_text};

/// Alert type URI suffixes; when several match, the last one wins.
const ALERT_TYPES: &[(&str, &str)] = &[
    ("/AA", "Allergy Alert"),
    ("/PRIN", "Product Recall"),
    ("/FAFA", "Food Alert For Action"),
];

const DEFAULT_ALERT_TYPE: &str = "Alert";

#[derive(Debug, Default, Deserialize)]
struct AlertFeed {
    #[serde(default)]
    items: Vec<Alert>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Alert {
    #[serde(deserialize_with = "lenient_text")]
    notation: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    created: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    short_title: Option<String>,
    #[serde(rename = "type")]
    types: Vec<Reference>,
    product_details: Vec<ProductDetail>,
    problem: Vec<Problem>,
    country: Vec<Labelled>,
}

/// Linked-data reference, either a bare URI or an object with `@id`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reference {
    Uri(String),
    Node {
        #[serde(rename = "@id")]
        id: String,
    },
}

impl Reference {
    fn uri(&self) -> &str {
        match self {
            Reference::Uri(uri) => uri,
            Reference::Node { id } => id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProductDetail {
    #[serde(deserialize_with = "lenient_text")]
    product_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Problem {
    #[serde(deserialize_with = "lenient_text")]
    risk_statement: Option<String>,
    allergen: Vec<Labelled>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Labelled {
    label: Label,
}

/// Labels come as a string or, for multilingual nodes, a list of strings.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Label {
    One(String),
    Many(Vec<String>),
    #[default]
    Missing,
}

impl Label {
    fn text(&self) -> Option<String> {
        match self {
            Label::One(s) => clean(Some(s)),
            Label::Many(list) => clean(list.first().map(String::as_str)),
            Label::Missing => None,
        }
    }
}

impl Alert {
    fn alert_type(&self) -> &'static str {
        self.types
            .iter()
            .filter_map(|t| {
                ALERT_TYPES
                    .iter()
                    .find(|(suffix, _)| t.uri().contains(suffix))
                    .map(|(_, name)| *name)
            })
            .last()
            .unwrap_or(DEFAULT_ALERT_TYPE)
    }

    /// The last risk statement, else the allergen list.
    fn reason(&self) -> Option<String> {
        let statement = self
            .problem
            .iter()
            .filter_map(|p| p.risk_statement.clone())
            .last();
        if statement.is_some() {
            return statement;
        }
        let allergens: Vec<String> = self
            .problem
            .iter()
            .flat_map(|p| p.allergen.iter().filter_map(|a| a.label.text()))
            .collect();
        (!allergens.is_empty()).then(|| format!("Allergens: {}", allergens.join(", ")))
    }

    fn into_record(self) -> RecallRecord {
        let alert_type = self.alert_type().to_string();
        let reason = self.reason();
        let product_name = self
            .product_details
            .first()
            .and_then(|p| p.product_name.clone())
            .or_else(|| self.short_title.clone());
        let countries: Vec<String> = self.country.iter().filter_map(|c| c.label.text()).collect();
        let distribution = if countries.is_empty() {
            UNITED_KINGDOM.to_string()
        } else {
            countries.join(", ")
        };
        let raw_date = self.created.map(|created| match parse_date(&created) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => created,
        });

        RecallRecord {
            source: Source::UkFsa,
            reference_id: self.notation,
            event_id: None,
            raw_date,
            recall_geography: None,
            origin_geography: None,
            classification: ClassificationInput::UkFsa { alert_type },
            product: ProductInput {
                category: product_name.as_deref().map(|n| categorize(n).to_string()),
                key_text: product_name,
                name: None,
            },
            company: None,
            reason,
            distribution: Some(distribution),
            action_taken: None,
        }
    }
}

pub fn parse(json: &str) -> serde_json::Result<Vec<RecallRecord>> {
    let feed: AlertFeed = serde_json::from_str(json)?;
    Ok(feed.items.into_iter().map(Alert::into_record).collect())
}

pub fn load(path: &Path) -> Result<Vec<RecallRecord>> {
    if !optional_present("UK_FSA", path) {
        return Ok(Vec::new());
    }
    let text = read_text(path)?;
    parse(&text).map_err(|e| Error::json(path, e))
}
