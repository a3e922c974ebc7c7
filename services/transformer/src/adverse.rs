//! Consumer adverse event facts from FDA CAERS.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::DateDimension;
use crate::model::AdverseEventRecord;

/// CAERS industry name -> product type.
const INDUSTRY_PRODUCT_TYPES: &[(&str, &str)] = &[
    ("Vit/Min/Prot/Unconv Diet(Human/Animal)", "Supplement"),
    ("Dietary Conventional Foods/Meal Replacements", "Supplement"),
    ("Powder Formula", "Supplement"),
    ("Vegetables/Vegetable Products", "Fresh Produce"),
    ("Fruit/Fruit Prod", "Fresh Produce"),
    ("Prep Salad Prod", "Fresh Produce"),
    ("Nuts/Edible Seed", "Nuts/Seeds"),
    ("Fishery/Seafood Prod", "Seafood"),
    ("Milk/Butter/Dried Milk Prod", "Dairy"),
    ("Ice Cream Prod", "Dairy"),
    ("Cheese/Cheese Prod", "Dairy"),
    ("Egg/Egg Prod", "Fresh Protein"),
    ("Meat, Meat Products And Poultry", "Fresh Protein"),
    ("Bakery Prod/Dough/Mix/Icing", "Bakery/Grains"),
    ("Cereal Prep/Breakfast Food", "Bakery/Grains"),
    ("Whole Grain/Milled Grain Prod/Starch", "Bakery/Grains"),
    ("Soft Drink/Water", "Beverage"),
    ("Coffee/Tea", "Beverage"),
    ("Candy W/O Choc/Special/Chew Gum", "Confectionery"),
    ("Choc/Cocoa Prod", "Confectionery"),
    ("Mult Food Dinner/Grav/Sauce/Special", "Ready-to-Eat"),
    ("Soup", "Ready-to-Eat"),
    ("Baby Food Products", "Ready-to-Eat"),
    ("Snack Food Item", "Ready-to-Eat"),
    ("Spices, Flavors And Salts", "Ingredients"),
    ("Food Additives (Human Use)", "Ingredients"),
    ("Dressings/Condiments", "Ingredients"),
    ("Food Service/Convnce Store", "Processed"),
    ("Macaroni/Noodle Prod", "Processed"),
];

const HOSPITALIZATION: &str = "Hospitalization";
const EMERGENCY_ROOM: &str = "Visited Emergency Room";
const DEATH: &str = "Death";
const LIFE_THREATENING: &str = "Life Threatening";
const DISABILITY: &str = "Disability";
const ALLERGIC_REACTION: &str = "Allergic Reaction";
const HEALTHCARE_VISIT: &str = "Visited a Health Care Provider";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdverseEventRow {
    pub adverse_event_key: u32,
    pub report_number: Option<String>,
    pub date_key: Option<u32>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub industry_code: Option<String>,
    pub industry_category: Option<String>,
    pub product_type: &'static str,
    pub product_name: Option<String>,
    /// Whole years; infants under a year report 0.
    pub consumer_age: Option<u32>,
    pub consumer_gender: Option<String>,
    pub has_hospitalization: bool,
    pub has_emergency_room: bool,
    pub has_death: bool,
    pub has_life_threatening: bool,
    pub has_disability: bool,
    pub has_allergic_reaction: bool,
    pub has_healthcare_visit: bool,
    pub reaction_count: usize,
    pub outcome_count: usize,
}

pub fn industry_product_type(industry: Option<&str>) -> &'static str {
    industry
        .and_then(|name| INDUSTRY_PRODUCT_TYPES.iter().find(|(n, _)| *n == name))
        .map_or("Other", |(_, product_type)| *product_type)
}

/// Converts a reported age to years. Units other than days, weeks, months
/// and decades are taken as years.
pub fn age_in_years(age: Option<&str>, unit: Option<&str>) -> Option<u32> {
    let age: f64 = age?.trim().parse().ok()?;
    let unit = unit.unwrap_or_default().to_lowercase();
    let years = if unit.contains("month") {
        age / 12.0
    } else if unit.contains("week") {
        age / 52.0
    } else if unit.contains("day") {
        age / 365.0
    } else if unit.contains("decade") {
        age * 10.0
    } else {
        age
    };
    (years.is_finite() && years > 0.0).then(|| years as u32)
}

/// Year, month and calendar date from a `YYYYMMDD` creation stamp. Year and
/// month survive an invalid day.
fn created_parts(raw: Option<&str>) -> (Option<i32>, Option<u32>, Option<NaiveDate>) {
    let Some(raw) = raw.map(str::trim) else {
        return (None, None, None);
    };
    let year = raw
        .get(..4)
        .filter(|_| raw.len() >= 8)
        .and_then(|y| y.parse().ok());
    let month = raw.get(4..6).and_then(|m| m.parse().ok());
    let date = raw
        .get(..8)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok());
    (year, month, date)
}

/// Builds adverse event rows; reports dated outside `dates` get no date key.
pub fn assemble(reports: &[AdverseEventRecord], dates: &DateDimension) -> Vec<AdverseEventRow> {
    reports
        .iter()
        .zip(1u32..)
        .map(|(r, key)| {
            let (year, month, date) = created_parts(r.date_created.as_deref());
            let has = |outcome: &str| r.outcomes.iter().any(|o| o == outcome);
            AdverseEventRow {
                adverse_event_key: key,
                report_number: r.report_number.clone(),
                date_key: date.and_then(|d| dates.key_for(d)),
                year,
                month,
                industry_code: r.industry_code.clone(),
                industry_category: r.industry_name.clone(),
                product_type: industry_product_type(r.industry_name.as_deref()),
                product_name: r.product_name.clone(),
                consumer_age: age_in_years(r.age.as_deref(), r.age_unit.as_deref()),
                consumer_gender: r.gender.clone(),
                has_hospitalization: has(HOSPITALIZATION),
                has_emergency_room: has(EMERGENCY_ROOM),
                has_death: has(DEATH),
                has_life_threatening: has(LIFE_THREATENING),
                has_disability: has(DISABILITY),
                has_allergic_reaction: has(ALLERGIC_REACTION),
                has_healthcare_visit: has(HEALTHCARE_VISIT),
                reaction_count: r.reaction_count,
                outcome_count: r.outcomes.len(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdverseEventTotals {
    pub reports: usize,
    pub hospitalizations: usize,
    pub emergency_room: usize,
    pub deaths: usize,
    pub life_threatening: usize,
    pub disabilities: usize,
    pub allergic_reactions: usize,
}

impl AdverseEventTotals {
    pub fn from_rows(rows: &[AdverseEventRow]) -> Self {
        let count = |flag: fn(&AdverseEventRow) -> bool| rows.iter().filter(|r| flag(r)).count();
        Self {
            reports: rows.len(),
            hospitalizations: count(|r| r.has_hospitalization),
            emergency_room: count(|r| r.has_emergency_room),
            deaths: count(|r| r.has_death),
            life_threatening: count(|r| r.has_life_threatening),
            disabilities: count(|r| r.has_disability),
            allergic_reactions: count(|r| r.has_allergic_reaction),
        }
    }
}
