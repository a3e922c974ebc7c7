//! Recall fact assembly: pure lookups against finished dimensions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{date_key, parse_date};
use crate::classify::{Classification, ReasonClassifier, RecallCategory};
use crate::dimensions::{DimensionBuilder, DimensionTable, UNKNOWN_KEY};
use crate::model::{truncate, RecallRecord, Source};

pub const MAX_REASON_CHARS: usize = 500;
pub const MAX_SCOPE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FactRecall {
    pub recall_key: u32,
    #[serde(rename = "RecallID")]
    pub recall_id: String,
    #[serde(rename = "EventID")]
    pub event_id: Option<String>,
    pub recall_date: Option<NaiveDate>,
    pub source: Source,
    pub geography_key: u32,
    pub origin_geography_key: Option<u32>,
    pub classification_key: u32,
    pub product_key: u32,
    pub company_key: u32,
    pub date_key: Option<u32>,
    pub reason_for_recall: Option<String>,
    pub recall_category: RecallCategory,
    pub recall_group: String,
    pub recall_subgroup: Option<String>,
    pub distribution_scope: Option<String>,
    pub action_taken: Option<String>,
}

/// Rows that fell back to the sentinel, per foreign-key column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fallbacks {
    pub geography: usize,
    pub classification: usize,
    pub product: usize,
    pub company: usize,
}

impl Fallbacks {
    pub fn columns(&self) -> [(&'static str, usize); 4] {
        [
            ("GeographyKey", self.geography),
            ("ClassificationKey", self.classification),
            ("ProductKey", self.product),
            ("CompanyKey", self.company),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub unparsed_dates: usize,
    pub generated_ids: usize,
    pub null_origin: usize,
    pub fallbacks: Fallbacks,
}

/// Key for `natural_key`, or the sentinel when it is absent or was never
/// registered.
fn key_or_fallback<A>(table: &DimensionTable<A>, natural_key: Option<&str>, misses: &mut usize) -> u32 {
    match natural_key.and_then(|k| table.lookup(k)) {
        Some(key) => key,
        None => {
            *misses += 1;
            UNKNOWN_KEY
        }
    }
}

pub struct FactAssembler<'a> {
    builder: &'a DimensionBuilder,
    classifier: &'a ReasonClassifier,
}

impl<'a> FactAssembler<'a> {
    pub fn new(builder: &'a DimensionBuilder, classifier: &'a ReasonClassifier) -> Self {
        Self {
            builder,
            classifier,
        }
    }

    /// One fact per record, keys numbered from 1 in record order.
    pub fn assemble(&self, records: &[RecallRecord]) -> (Vec<FactRecall>, AssemblyStats) {
        let mut stats = AssemblyStats::default();
        let facts = records
            .iter()
            .zip(1u32..)
            .map(|(record, recall_key)| self.fact(recall_key, record, &mut stats))
            .collect();
        (facts, stats)
    }

    fn fact(&self, recall_key: u32, record: &RecallRecord, stats: &mut AssemblyStats) -> FactRecall {
        let dims = self.builder.dimensions();
        let keys = self.builder.natural_keys(record);
        let fallbacks = &mut stats.fallbacks;

        let geography_key = key_or_fallback(&dims.geography, keys.geography.as_deref(), &mut fallbacks.geography);
        let origin_geography_key = keys.origin.as_deref().and_then(|k| dims.geography.lookup(k));
        if origin_geography_key.is_none() {
            stats.null_origin += 1;
        }
        let classification_key = key_or_fallback(
            &dims.classification,
            keys.classification.as_deref(),
            &mut fallbacks.classification,
        );
        let product_key = key_or_fallback(&dims.product, keys.product.as_deref(), &mut fallbacks.product);
        // Only FDA reports name a firm; other sources sit on the sentinel.
        let company_key = match record.source {
            Source::Fda => key_or_fallback(&dims.company, keys.company.as_deref(), &mut fallbacks.company),
            _ => UNKNOWN_KEY,
        };

        let recall_date = record.raw_date.as_deref().and_then(parse_date);
        if recall_date.is_none() {
            stats.unparsed_dates += 1;
        }

        let recall_id = match &record.reference_id {
            Some(id) => id.clone(),
            None => {
                stats.generated_ids += 1;
                format!("{}-{recall_key}", record.source)
            }
        };
        let event_id = match record.source {
            Source::Fda => record.event_id.clone(),
            _ => Some(recall_id.clone()),
        };

        let reason = record.reason.as_deref().map(|r| truncate(r, MAX_REASON_CHARS));
        let Classification {
            category,
            group,
            subgroup,
        } = self.classifier.classify(reason.as_deref());

        FactRecall {
            recall_key,
            recall_id,
            event_id,
            recall_date,
            source: record.source,
            geography_key,
            origin_geography_key,
            classification_key,
            product_key,
            company_key,
            date_key: recall_date.and_then(date_key),
            reason_for_recall: reason,
            recall_category: category,
            recall_group: group,
            recall_subgroup: subgroup,
            distribution_scope: record.distribution.as_deref().map(|d| truncate(d, MAX_SCOPE_CHARS)),
            action_taken: record.action_taken.as_deref().map(|a| truncate(a, MAX_SCOPE_CHARS)),
        }
    }
}
