//! CSV sink: one `<table>.csv` per star schema table.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::adverse::AdverseEventRow;
use crate::calendar::DateRow;
use crate::error::{Error, Result};
use crate::facts::FactRecall;
use crate::health::HealthImpactRow;
use crate::schema::{ClassificationRow, CompanyRow, GeographyRow, ProductRow, StarSchema};
use crate::summary::YearlySummaryRow;

/// A row type with a fixed CSV header, written even when a table is empty.
pub trait CsvTable: Serialize {
    const HEADER: &'static [&'static str];
}

impl CsvTable for DateRow {
    const HEADER: &'static [&'static str] = &[
        "DateKey",
        "Date",
        "Year",
        "FiscalYear",
        "Quarter",
        "FiscalQuarter",
        "Month",
        "MonthName",
        "Day",
        "DayOfWeek",
        "DayName",
        "WeekOfYear",
    ];
}

impl CsvTable for GeographyRow {
    const HEADER: &'static [&'static str] = &[
        "GeographyKey",
        "NaturalKey",
        "Country",
        "CountryCode",
        "State",
        "Region",
        "IsEUMember",
        "IsEFTA",
    ];
}

impl CsvTable for ClassificationRow {
    const HEADER: &'static [&'static str] = &[
        "ClassificationKey",
        "NaturalKey",
        "Source",
        "OriginalClassification",
        "USAClassLevel",
        "NotificationType",
        "RiskDecision",
        "SeverityLevel",
        "SeverityScore",
    ];
}

impl CsvTable for ProductRow {
    const HEADER: &'static [&'static str] =
        &["ProductKey", "NaturalKey", "ProductName", "ProductCategory", "ProductType"];
}

impl CsvTable for CompanyRow {
    const HEADER: &'static [&'static str] = &[
        "CompanyKey",
        "NaturalKey",
        "CompanyName",
        "City",
        "State",
        "Country",
        "EstablishmentNumber",
    ];
}

impl CsvTable for FactRecall {
    const HEADER: &'static [&'static str] = &[
        "RecallKey",
        "RecallID",
        "EventID",
        "RecallDate",
        "Source",
        "GeographyKey",
        "OriginGeographyKey",
        "ClassificationKey",
        "ProductKey",
        "CompanyKey",
        "DateKey",
        "ReasonForRecall",
        "RecallCategory",
        "RecallGroup",
        "RecallSubgroup",
        "DistributionScope",
        "ActionTaken",
    ];
}

impl CsvTable for HealthImpactRow {
    const HEADER: &'static [&'static str] = &[
        "HealthImpactKey",
        "OutbreakID",
        "Year",
        "Month",
        "DateKey",
        "State",
        "Illnesses",
        "Hospitalizations",
        "Deaths",
        "Pathogen",
        "Serotype",
        "FoodVehicle",
        "IFSACCategory",
        "Setting",
        "PrimaryMode",
    ];
}

impl CsvTable for AdverseEventRow {
    const HEADER: &'static [&'static str] = &[
        "AdverseEventKey",
        "ReportNumber",
        "DateKey",
        "Year",
        "Month",
        "IndustryCode",
        "IndustryCategory",
        "ProductType",
        "ProductName",
        "ConsumerAge",
        "ConsumerGender",
        "HasHospitalization",
        "HasEmergencyRoom",
        "HasDeath",
        "HasLifeThreatening",
        "HasDisability",
        "HasAllergicReaction",
        "HasHealthcareVisit",
        "ReactionCount",
        "OutcomeCount",
    ];
}

impl CsvTable for YearlySummaryRow {
    const HEADER: &'static [&'static str] = &[
        "YearlySummaryKey",
        "Year",
        "Source",
        "RecallCategory",
        "RecallGroup",
        "RecallSubgroup",
        "RecallCount",
    ];
}

/// Writes `rows` to `dir/<name>.csv` with a header row, replacing any
/// previous file. An empty table is a header-only file.
pub fn write_table<T: CsvTable>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;
    if rows.is_empty() {
        writer.write_record(T::HEADER)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| Error::io(&path, e))?;
    info!(table = name, rows = rows.len(), path = %path.display(), "wrote table");
    Ok(path)
}

/// Writes every table of `schema` under `dir`, creating it if needed.
pub fn write_all(dir: &Path, schema: &StarSchema) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    Ok(vec![
        write_table(dir, "dim_date", &schema.dates)?,
        write_table(dir, "dim_geography", &schema.geography)?,
        write_table(dir, "dim_classification", &schema.classification)?,
        write_table(dir, "dim_product", &schema.product)?,
        write_table(dir, "dim_company", &schema.company)?,
        write_table(dir, "fact_recalls", &schema.recalls)?,
        write_table(dir, "fact_health_impact", &schema.health_impact)?,
        write_table(dir, "fact_adverse_events", &schema.adverse_events)?,
        write_table(dir, "fact_yearly_summary", &schema.yearly_summary)?,
    ])
}
