//! CDC NORS foodborne outbreak downloads (`cdc_nors_<date>.json`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::OutbreakRecord;

use super::{lenient_int, lenient_text, optional_present, read_text};

const FILE_PREFIX: &str = "cdc_nors_";
const FOOD_MODE: &str = "Food";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Outbreak {
    #[serde(deserialize_with = "lenient_text")]
    cdcid: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    year: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    month: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    state: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    illnesses: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    hospitalizations: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    deaths: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    etiology: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    serotype_or_genotype: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    food_vehicle: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    ifsac_category: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    setting: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    primary_mode: Option<String>,
}

impl From<Outbreak> for OutbreakRecord {
    fn from(o: Outbreak) -> Self {
        Self {
            outbreak_id: o.cdcid,
            year: o.year.and_then(|y| i32::try_from(y).ok()),
            month: o.month.and_then(|m| u32::try_from(m).ok()),
            state: o.state,
            illnesses: o.illnesses.unwrap_or(0),
            hospitalizations: o.hospitalizations.unwrap_or(0),
            deaths: o.deaths.unwrap_or(0),
            etiology: o.etiology,
            serotype: o.serotype_or_genotype,
            food_vehicle: o.food_vehicle,
            ifsac_category: o.ifsac_category,
            setting: o.setting,
            primary_mode: o.primary_mode,
        }
    }
}

/// Parses a download and keeps food-borne outbreaks.
pub fn parse(json: &str) -> serde_json::Result<Vec<OutbreakRecord>> {
    let outbreaks: Vec<Outbreak> = serde_json::from_str(json)?;
    let total = outbreaks.len();
    let food: Vec<OutbreakRecord> = outbreaks
        .into_iter()
        .filter(|o| o.primary_mode.as_deref() == Some(FOOD_MODE))
        .map(OutbreakRecord::from)
        .collect();
    info!(kept = food.len(), total, "filtered CDC outbreaks to food mode");
    Ok(food)
}

/// The lexicographically last download in `dir`; dated names sort by date.
/// Validation reports written next to the downloads are ignored.
pub fn latest_download(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_download =
            name.starts_with(FILE_PREFIX) && name.ends_with(".json") && !name.contains("validation");
        if is_download && latest.as_ref().map_or(true, |l| path > *l) {
            latest = Some(path);
        }
    }
    Ok(latest)
}

pub fn load(dir: &Path) -> Result<Vec<OutbreakRecord>> {
    if !optional_present("CDC", dir) {
        return Ok(Vec::new());
    }
    let Some(path) = latest_download(dir)? else {
        warn!(dir = %dir.display(), "no CDC NORS downloads found");
        return Ok(Vec::new());
    };
    info!(file = %path.display(), "reading CDC NORS download");
    let text = read_text(&path)?;
    parse(&text).map_err(|e| Error::json(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "cdcid": "OB-1001",
            "year": "2019",
            "month": "7",
            "state": "Ohio",
            "illnesses": "12",
            "hospitalizations": 3,
            "etiology": "Salmonella enterica",
            "serotype_or_genotype": "Enteritidis",
            "food_vehicle": "chicken",
            "ifsac_category": "Chicken",
            "setting": "Restaurant",
            "primary_mode": "Food"
        },
        {"cdcid": "OB-1002", "year": 2019, "primary_mode": "Person-to-person"},
        {"year": 2020, "illnesses": 4, "primary_mode": "Food"}
    ]"#;

    #[test]
    fn test_parse_keeps_food_mode() {
        let records = parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.outbreak_id.as_deref(), Some("OB-1001"));
        assert_eq!(first.year, Some(2019));
        assert_eq!(first.month, Some(7));
        assert_eq!(first.illnesses, 12);
        assert_eq!(first.hospitalizations, 3);
        assert_eq!(first.deaths, 0);
        assert_eq!(first.serotype.as_deref(), Some("Enteritidis"));
    }

    #[test]
    fn test_missing_fields_default() {
        let records = parse(SAMPLE).unwrap();
        let second = &records[1];
        assert_eq!(second.outbreak_id, None);
        assert_eq!(second.month, None);
        assert_eq!(second.illnesses, 4);
        assert_eq!(second.state, None);
    }

    #[test]
    fn test_latest_download_skips_validation_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "cdc_nors_2024-01-01.json",
            "cdc_nors_2024-03-01.json",
            "cdc_nors_validation.json",
            "other.json",
        ] {
            std::fs::write(dir.path().join(name), "[]").unwrap();
        }
        let latest = latest_download(dir.path()).unwrap().unwrap();
        assert_eq!(
            latest.file_name().and_then(|n| n.to_str()),
            Some("cdc_nors_2024-03-01.json")
        );
    }

    #[test]
    fn test_load_reads_latest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cdc_nors_2023-01-01.json"), "[]").unwrap();
        std::fs::write(dir.path().join("cdc_nors_2024-01-01.json"), SAMPLE).unwrap();
        assert_eq!(load(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_or_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).unwrap().is_empty());
        assert!(load(&dir.path().join("absent")).unwrap().is_empty());
    }
}
