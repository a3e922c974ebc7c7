//! Two-phase run: register every record's natural keys, then assemble facts
//! against the frozen dimensions.

use tracing::info;

use crate::adverse::{self, AdverseEventTotals};
use crate::calendar::DateDimension;
use crate::classify::ReasonClassifier;
use crate::dimensions::DimensionBuilder;
use crate::facts::FactAssembler;
use crate::geography::CountryHarmonizer;
use crate::health;
use crate::schema::StarSchema;
use crate::severity::SeverityTables;
use crate::sources::LoadedSources;
use crate::summary::{yearly_summary, OutbreakTotals, RunSummary};

pub struct RunOutput {
    pub schema: StarSchema,
    pub summary: RunSummary,
}

pub fn build(loaded: &LoadedSources, classifier: &ReasonClassifier, dates: &DateDimension) -> RunOutput {
    let mut builder = DimensionBuilder::new(CountryHarmonizer::default(), SeverityTables::default());
    for record in &loaded.records {
        builder.register(record);
    }
    let dims = builder.dimensions();
    info!(
        geography = dims.geography.len(),
        classification = dims.classification.len(),
        product = dims.product.len(),
        company = dims.company.len(),
        "dimensions registered"
    );

    let (recalls, stats) = FactAssembler::new(&builder, classifier).assemble(&loaded.records);
    let health_impact = health::assemble(&loaded.outbreaks, dates);
    let adverse_events = adverse::assemble(&loaded.adverse_events, dates);
    let yearly = yearly_summary(&recalls, dates);

    let outbreaks = OutbreakTotals {
        outbreaks: health_impact.len(),
        illnesses: health_impact.iter().map(|h| h.illnesses).sum(),
        hospitalizations: health_impact.iter().map(|h| h.hospitalizations).sum(),
        deaths: health_impact.iter().map(|h| h.deaths).sum(),
    };

    let schema = StarSchema::new(
        dates,
        builder.dimensions(),
        recalls,
        health_impact,
        adverse_events,
        yearly,
    );
    let summary = RunSummary {
        adverse_events: AdverseEventTotals::from_rows(&schema.adverse_events),
        ..RunSummary::new(schema.row_counts(), &schema.recalls, &stats, outbreaks)
    };
    RunOutput { schema, summary }
}
