//! Outbreak health impact facts from CDC NORS.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::DateDimension;
use crate::model::{truncate, OutbreakRecord};

const MAX_TEXT_CHARS: usize = 200;
const MAX_MODE_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthImpactRow {
    pub health_impact_key: u32,
    #[serde(rename = "OutbreakID")]
    pub outbreak_id: String,
    pub year: Option<i32>,
    pub month: u32,
    pub date_key: Option<u32>,
    pub state: Option<String>,
    pub illnesses: i64,
    pub hospitalizations: i64,
    pub deaths: i64,
    pub pathogen: Option<String>,
    pub serotype: Option<String>,
    pub food_vehicle: Option<String>,
    #[serde(rename = "IFSACCategory")]
    pub ifsac_category: Option<String>,
    pub setting: Option<String>,
    pub primary_mode: Option<String>,
}

fn clip(text: &Option<String>, max: usize) -> Option<String> {
    text.as_deref().map(|t| truncate(t, max))
}

/// Builds health impact rows; outbreaks dated outside `dates` keep their
/// year and month but get no date key.
pub fn assemble(outbreaks: &[OutbreakRecord], dates: &DateDimension) -> Vec<HealthImpactRow> {
    outbreaks
        .iter()
        .zip(1u32..)
        .map(|(o, key)| {
            let month = o.month.unwrap_or(1);
            let date_key = o
                .year
                .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
                .and_then(|d| dates.key_for(d));
            HealthImpactRow {
                health_impact_key: key,
                outbreak_id: o.outbreak_id.clone().unwrap_or_else(|| format!("CDC-{key}")),
                year: o.year,
                month,
                date_key,
                state: o.state.clone(),
                illnesses: o.illnesses,
                hospitalizations: o.hospitalizations,
                deaths: o.deaths,
                pathogen: clip(&o.etiology, MAX_TEXT_CHARS),
                serotype: clip(&o.serotype, MAX_TEXT_CHARS),
                food_vehicle: clip(&o.food_vehicle, MAX_TEXT_CHARS),
                ifsac_category: clip(&o.ifsac_category, MAX_TEXT_CHARS),
                setting: clip(&o.setting, MAX_TEXT_CHARS),
                primary_mode: clip(&o.primary_mode, MAX_MODE_CHARS),
            }
        })
        .collect()
}
