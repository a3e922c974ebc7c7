//! Yearly recall summary fact and the end-of-run report.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::info;

use crate::adverse::AdverseEventTotals;
use crate::calendar::DateDimension;
use crate::classify::RecallCategory;
use crate::facts::{AssemblyStats, FactRecall, Fallbacks};
use crate::model::Source;

/// Number of groups and subgroups shown in the run report.
const TOP_LABELS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct YearlySummaryRow {
    pub yearly_summary_key: u32,
    pub year: i32,
    pub source: Source,
    pub recall_category: RecallCategory,
    pub recall_group: String,
    pub recall_subgroup: Option<String>,
    pub recall_count: usize,
}

/// Distinct recall ids per (year, source, category, group, subgroup), for
/// dated recalls inside the date dimension's years.
pub fn yearly_summary(facts: &[FactRecall], dates: &DateDimension) -> Vec<YearlySummaryRow> {
    // Categories sort by label so the table orders the way it reads.
    type Group<'f> = (i32, Source, &'static str, &'f str, Option<&'f str>);
    let mut groups: BTreeMap<Group<'_>, (RecallCategory, BTreeSet<&str>)> = BTreeMap::new();
    let years = dates.start_year()..=dates.end_year();

    for fact in facts {
        let Some(key) = fact.date_key else { continue };
        let year = (key / 10_000) as i32;
        if !years.contains(&year) {
            continue;
        }
        let group = (
            year,
            fact.source,
            fact.recall_category.as_str(),
            fact.recall_group.as_str(),
            fact.recall_subgroup.as_deref(),
        );
        groups
            .entry(group)
            .or_insert_with(|| (fact.recall_category, BTreeSet::new()))
            .1
            .insert(fact.recall_id.as_str());
    }

    groups
        .into_iter()
        .zip(1u32..)
        .map(|((group, (category, ids)), key)| {
            let (year, source, _, recall_group, subgroup) = group;
            YearlySummaryRow {
                yearly_summary_key: key,
                year,
                source,
                recall_category: category,
                recall_group: recall_group.to_string(),
                recall_subgroup: subgroup.map(str::to_string),
                recall_count: ids.len(),
            }
        })
        .collect()
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Label counts, most frequent first; ties break by label.
fn distribution<'f>(labels: impl Iterator<Item = &'f str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutbreakTotals {
    pub outbreaks: usize,
    pub illnesses: i64,
    pub hospitalizations: i64,
    pub deaths: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub table_rows: Vec<(&'static str, usize)>,
    pub records_by_source: BTreeMap<Source, usize>,
    pub recalls: usize,
    pub valid_dates: usize,
    pub generated_ids: usize,
    pub null_origin: usize,
    pub fallbacks: Fallbacks,
    pub categories: Vec<(String, usize)>,
    pub groups: Vec<(String, usize)>,
    pub subgroups: Vec<(String, usize)>,
    pub outbreaks: OutbreakTotals,
    pub adverse_events: AdverseEventTotals,
}

impl RunSummary {
    pub fn new(
        table_rows: Vec<(&'static str, usize)>,
        facts: &[FactRecall],
        stats: &AssemblyStats,
        outbreaks: OutbreakTotals,
    ) -> Self {
        let mut records_by_source = BTreeMap::new();
        for fact in facts {
            *records_by_source.entry(fact.source).or_default() += 1;
        }
        Self {
            table_rows,
            records_by_source,
            recalls: facts.len(),
            valid_dates: facts.iter().filter(|f| f.date_key.is_some()).count(),
            generated_ids: stats.generated_ids,
            null_origin: stats.null_origin,
            fallbacks: stats.fallbacks,
            categories: distribution(facts.iter().map(|f| f.recall_category.as_str())),
            groups: distribution(facts.iter().map(|f| f.recall_group.as_str())),
            subgroups: distribution(facts.iter().filter_map(|f| f.recall_subgroup.as_deref())),
            outbreaks,
            adverse_events: AdverseEventTotals::default(),
        }
    }

    pub fn valid_date_percent(&self) -> f64 {
        percent(self.valid_dates, self.recalls)
    }

    /// Share of recalls whose reason matched no rule.
    pub fn other_percent(&self) -> f64 {
        let other = self
            .categories
            .iter()
            .find(|(label, _)| label == RecallCategory::Other.as_str())
            .map_or(0, |(_, count)| *count);
        percent(other, self.recalls)
    }

    pub fn null_percents(&self) -> [(&'static str, f64); 4] {
        let undated = self.recalls - self.valid_dates;
        [
            ("RecallID", percent(self.generated_ids, self.recalls)),
            ("RecallDate", percent(undated, self.recalls)),
            ("DateKey", percent(undated, self.recalls)),
            ("OriginGeographyKey", percent(self.null_origin, self.recalls)),
        ]
    }

    pub fn log(&self) {
        info!("star schema complete");
        for (table, rows) in &self.table_rows {
            info!(table, rows, "table written");
        }
        for (source, records) in &self.records_by_source {
            info!(source = %source, records, "fact_recalls by source");
        }
        info!(
            valid = self.valid_dates,
            total = self.recalls,
            percent = %format!("{:.1}", self.valid_date_percent()),
            "recalls with valid dates"
        );
        for (column, pct) in self.null_percents() {
            info!(column, percent = %format!("{pct:.1}"), "null rate");
        }
        for (column, count) in self.fallbacks.columns() {
            info!(column, count, "fell back to unknown member");
        }
        for (label, count) in &self.categories {
            info!(level = 1, label = %label, count, "classification");
        }
        for (label, count) in self.groups.iter().take(TOP_LABELS) {
            info!(level = 2, label = %label, count, "classification");
        }
        for (label, count) in self.subgroups.iter().take(TOP_LABELS) {
            info!(level = 3, label = %label, count, "classification");
        }
        info!(percent = %format!("{:.1}", self.other_percent()), "classified as Other");
        info!(
            outbreaks = self.outbreaks.outbreaks,
            illnesses = self.outbreaks.illnesses,
            hospitalizations = self.outbreaks.hospitalizations,
            deaths = self.outbreaks.deaths,
            "CDC outbreak totals"
        );
        let adverse = &self.adverse_events;
        info!(
            reports = adverse.reports,
            hospitalizations = adverse.hospitalizations,
            emergency_room = adverse.emergency_room,
            deaths = adverse.deaths,
            life_threatening = adverse.life_threatening,
            disabilities = adverse.disabilities,
            allergic_reactions = adverse.allergic_reactions,
            "CAERS adverse event totals"
        );
    }
}
