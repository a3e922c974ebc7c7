//! RASFF notifications: the historical export and the current portal
//! export, stitched at 2021-01-01.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::calendar::{date_key, parse_date};
use crate::error::Result;
use crate::model::{ClassificationInput, ProductInput, RecallRecord, Source};

use super::optional_present;
use super::sheet::{Row, Sheet};

pub const HISTORICAL_FILE: &str = "RASFF_pre2021.xlsx";
pub const CURRENT_FILE: &str = "RASFF_current.xlsx";

/// Portal exports stamp notifications as `DD-MM-YYYY HH:MM:SS`.
const PORTAL_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Date keys bounding the two exports.
const HISTORY_START: u32 = 20120101;
const CURRENT_START: u32 = 20210101;

/// Which export a sheet came from; decides the date window and how the
/// hazard is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    Historical,
    Current,
}

impl Export {
    fn keeps(&self, date: NaiveDate) -> bool {
        let Some(key) = date_key(date) else {
            return false;
        };
        match self {
            Export::Historical => (HISTORY_START..CURRENT_START).contains(&key),
            Export::Current => key >= CURRENT_START,
        }
    }
}

fn parse_notification_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, PORTAL_DATE_FORMAT)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
        .ok()
        .or_else(|| parse_date(raw))
}

/// Splits a portal hazard such as `Listeria monocytogenes - {pathogenic
/// micro-organisms}` into substance and hazard category. Text that does not
/// follow the pattern is all substance.
pub fn split_hazard(text: &str) -> (Option<String>, Option<String>) {
    let nonblank = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    for (dash, _) in text.match_indices('-').filter(|(i, _)| *i > 0) {
        let rest = text[dash + 1..].trim_start();
        let Some(inner) = rest.strip_prefix('{') else {
            continue;
        };
        let Some(close) = inner.find('}').filter(|c| *c > 0) else {
            continue;
        };
        return (nonblank(&text[..dash]), nonblank(&inner[..close]));
    }
    (nonblank(text), None)
}

/// "substance (category)", or the category alone.
fn reason(substance: Option<&str>, category: Option<&str>) -> Option<String> {
    match (substance, category) {
        (Some(s), Some(c)) => Some(format!("{s} ({c})")),
        (Some(s), None) => Some(s.to_string()),
        (None, c) => c.map(str::to_string),
    }
}

struct Columns {
    reference: Option<usize>,
    date: Option<usize>,
    notifying: Option<usize>,
    origin: Option<usize>,
    kind: Option<usize>,
    classification: Option<usize>,
    risk_decision: Option<usize>,
    subject: Option<usize>,
    product: Option<usize>,
    category: Option<usize>,
    distribution: Option<usize>,
    action_taken: Option<usize>,
    hazards: Option<usize>,
    hazard_category: Option<usize>,
    substance: Option<usize>,
}

impl Columns {
    fn locate(sheet: &Sheet) -> Self {
        Self {
            reference: sheet.column(&["reference"]),
            date: sheet.column(&["date"]),
            notifying: sheet.column(&["notifying_country", "notifying"]),
            origin: sheet.column(&["origin"]),
            kind: sheet.column(&["type"]),
            classification: sheet.column(&["classification", "type2"]),
            risk_decision: sheet.column(&["risk_decision", "risk decision"]),
            subject: sheet.column(&["subject"]),
            product: sheet.column(&["product"]),
            category: sheet.column(&["category", "product category"]),
            distribution: sheet.column(&["distribution", "distribution status"]),
            action_taken: sheet.column(&["action taken", "action_taken"]),
            hazards: sheet.column(&["hazards"]),
            hazard_category: sheet.column(&["hazard category", "hazard_category"]),
            substance: sheet.column(&["substance/finding", "substance"]),
        }
    }
}

fn record(export: Export, cols: &Columns, row: Row<'_>, date: NaiveDate) -> RecallRecord {
    let (substance, hazard_category) = match export {
        Export::Historical => (row.text(cols.substance), row.text(cols.hazard_category)),
        Export::Current => row
            .get(cols.hazards)
            .map(split_hazard)
            .unwrap_or((None, None)),
    };
    let product = match export {
        Export::Historical => row.text(cols.product),
        Export::Current => None,
    };
    let category = row.text(cols.category);
    RecallRecord {
        source: Source::Rasff,
        reference_id: row.text(cols.reference),
        event_id: None,
        raw_date: Some(date.format("%Y-%m-%d").to_string()),
        recall_geography: row.text(cols.notifying),
        origin_geography: row.text(cols.origin),
        classification: ClassificationInput::Rasff {
            notification_type: row.text(cols.classification),
            risk_decision: row.text(cols.risk_decision),
        },
        product: ProductInput {
            key_text: row.text(cols.subject),
            name: product.or_else(|| category.clone()),
            category,
        },
        company: None,
        reason: reason(substance.as_deref(), hazard_category.as_deref()),
        distribution: row.text(cols.distribution),
        action_taken: match export {
            Export::Historical => row.text(cols.action_taken),
            Export::Current => None,
        },
    }
}

/// Food notifications of one export inside its date window, in row order.
pub fn normalize(sheet: &Sheet, export: Export) -> Vec<RecallRecord> {
    let cols = Columns::locate(sheet);
    sheet
        .rows()
        .filter(|row| row.get(cols.kind).is_some_and(|k| k.eq_ignore_ascii_case("food")))
        .filter_map(|row| {
            let date = row.get(cols.date).and_then(parse_notification_date)?;
            export
                .keeps(date)
                .then(|| record(export, &cols, row, date))
        })
        .collect()
}

/// Loads whichever exports exist under `dir`; historical rows come first.
pub fn load(dir: &Path) -> Result<Vec<RecallRecord>> {
    let mut records = Vec::new();
    for (file, export) in [
        (HISTORICAL_FILE, Export::Historical),
        (CURRENT_FILE, Export::Current),
    ] {
        let path = dir.join(file);
        if !optional_present("RASFF", &path) {
            continue;
        }
        let batch = normalize(&Sheet::read(&path)?, export);
        info!(export = ?export, records = batch.len(), "loaded RASFF export");
        records.extend(batch);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORICAL: &str = "\
REFERENCE,Date,notifying,origin,Type,type2,subject,product,product category,Action taken,distribution status,hazard category,substance/finding
2015.0001,2015-03-02,GERMANY,Turkey,food,alert,aflatoxins in dried figs,dried figs,fruits and vegetables,withdrawal from the market,distribution to other member countries,mycotoxins,aflatoxins
2011.0001,2011-05-01,France,China,food,alert,old notification,tea,herbs and spices,,,pesticide residues,chlorpyrifos
2016.0002,2016-01-10,Italy,Spain,feed,information,feed issue,maize,feed materials,,,,
2019.0003,2019-07-19,Belgium,\"Belgium, France\",Food,border rejection,listeria in cheese,cheese,milk and milk products,,,,
";

    const CURRENT: &str = "\
reference,date,notifying_country,origin,type,classification,risk_decision,subject,category,distribution,hazards
2024.0100,15-01-2024 10:30:00,Netherlands,Poland,food,alert notification,serious,Salmonella in chicken,poultry meat and poultry meat products,Netherlands,Salmonella Enteritidis - {pathogenic micro-organisms}
2020.9999,31-12-2020 23:59:59,Netherlands,Poland,food,alert notification,serious,too early,poultry meat and poultry meat products,,
";

    #[test]
    fn test_historical_window_and_food_filter() {
        let sheet = Sheet::from_csv(HISTORICAL.as_bytes()).unwrap();
        let records = normalize(&sheet, Export::Historical);
        let refs: Vec<_> = records.iter().filter_map(|r| r.reference_id.as_deref()).collect();
        assert_eq!(refs, vec!["2015.0001", "2019.0003"]);
    }

    #[test]
    fn test_historical_fields() {
        let sheet = Sheet::from_csv(HISTORICAL.as_bytes()).unwrap();
        let r = &normalize(&sheet, Export::Historical)[0];
        assert_eq!(r.raw_date.as_deref(), Some("2015-03-02"));
        assert_eq!(r.recall_geography.as_deref(), Some("GERMANY"));
        assert_eq!(r.origin_geography.as_deref(), Some("Turkey"));
        assert_eq!(
            r.classification,
            ClassificationInput::Rasff {
                notification_type: Some("alert".to_string()),
                risk_decision: None,
            }
        );
        assert_eq!(r.product.key_text.as_deref(), Some("aflatoxins in dried figs"));
        assert_eq!(r.product.name.as_deref(), Some("dried figs"));
        assert_eq!(r.reason.as_deref(), Some("aflatoxins (mycotoxins)"));
        assert_eq!(r.action_taken.as_deref(), Some("withdrawal from the market"));
    }

    #[test]
    fn test_current_export() {
        let sheet = Sheet::from_csv(CURRENT.as_bytes()).unwrap();
        let records = normalize(&sheet, Export::Current);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.raw_date.as_deref(), Some("2024-01-15"));
        assert_eq!(
            r.reason.as_deref(),
            Some("Salmonella Enteritidis (pathogenic micro-organisms)")
        );
        assert_eq!(
            r.product.name.as_deref(),
            Some("poultry meat and poultry meat products")
        );
        assert_eq!(r.action_taken, None);
    }

    #[test]
    fn test_split_hazard() {
        assert_eq!(
            split_hazard("Listeria monocytogenes - {pathogenic micro-organisms}"),
            (
                Some("Listeria monocytogenes".to_string()),
                Some("pathogenic micro-organisms".to_string())
            )
        );
        assert_eq!(
            split_hazard("2-chloroethanol -{pesticide residues}"),
            (
                Some("2-chloroethanol".to_string()),
                Some("pesticide residues".to_string())
            )
        );
        assert_eq!(split_hazard("foreign body"), (Some("foreign body".to_string()), None));
    }

    #[test]
    fn test_reason_composition() {
        assert_eq!(reason(Some("lead"), Some("metals")), Some("lead (metals)".to_string()));
        assert_eq!(reason(None, Some("metals")), Some("metals".to_string()));
        assert_eq!(reason(Some("lead"), None), Some("lead".to_string()));
        assert_eq!(reason(None, None), None);
    }

    #[test]
    fn test_notification_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_notification_date("15-01-2024 10:30:00"), Some(d));
        assert_eq!(parse_notification_date("15-01-2024"), Some(d));
        assert_eq!(parse_notification_date("2024-01-15"), Some(d));
        assert_eq!(parse_notification_date("garbage"), None);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent")).unwrap().is_empty());
    }
}
