//! Source normalizers: raw files in, [`RecallRecord`]s out.
//!
//! FDA and FSIS are mandatory. RASFF, UK FSA, CDC and CAERS are optional
//! and a missing file only skips that source.

pub mod caers;
pub mod cdc;
pub mod fda;
pub mod fsis;
pub mod rasff;
pub mod sheet;
pub mod uk_fsa;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{clean, AdverseEventRecord, OutbreakRecord, RecallRecord, Source};

#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub fda: PathBuf,
    pub fsis: PathBuf,
    pub rasff_dir: PathBuf,
    pub uk_fsa: PathBuf,
    pub cdc_dir: PathBuf,
    pub caers: PathBuf,
}

#[derive(Debug, Default)]
pub struct LoadedSources {
    /// Recall records in processing order: FDA, FSIS, RASFF, UK FSA.
    pub records: Vec<RecallRecord>,
    pub outbreaks: Vec<OutbreakRecord>,
    pub adverse_events: Vec<AdverseEventRecord>,
    pub counts: BTreeMap<Source, usize>,
}

fn require(name: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingSource {
            name,
            path: path.to_path_buf(),
        })
    }
}

pub fn load_all(paths: &SourcePaths) -> Result<LoadedSources> {
    require("FDA", &paths.fda)?;
    require("FSIS", &paths.fsis)?;

    let mut loaded = LoadedSources::default();
    let batches = [
        (Source::Fda, fda::load(&paths.fda)?),
        (Source::Fsis, fsis::load(&paths.fsis)?),
        (Source::Rasff, rasff::load(&paths.rasff_dir)?),
        (Source::UkFsa, uk_fsa::load(&paths.uk_fsa)?),
    ];
    for (source, records) in batches {
        info!(source = %source, records = records.len(), "normalized source");
        loaded.counts.insert(source, records.len());
        loaded.records.extend(records);
    }

    loaded.outbreaks = cdc::load(&paths.cdc_dir)?;
    info!(records = loaded.outbreaks.len(), "normalized CDC NORS outbreaks");
    loaded.adverse_events = caers::load(&paths.caers)?;
    info!(records = loaded.adverse_events.len(), "normalized CAERS adverse events");
    Ok(loaded)
}

/// Returns `false`, after logging, when an optional input is absent.
pub(crate) fn optional_present(name: &str, path: &Path) -> bool {
    if path.exists() {
        true
    } else {
        warn!(source = name, path = %path.display(), "optional source not found, skipping");
        false
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// JSON scalars that feeds emit interchangeably for the same field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Accepts a string, number or null and yields cleaned text.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| clean(Some(&v.into_text()))))
}

/// Accepts an integer, a float or a numeric string.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Scalar::Int(i) => Some(i),
        Scalar::Float(f) if f.is_finite() => Some(f as i64),
        Scalar::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_int")]
        count: Option<i64>,
    }

    fn lenient(json: &str) -> Lenient {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lenient_text_accepts_numbers_and_null() {
        assert_eq!(lenient(r#"{"text": "abc"}"#).text.as_deref(), Some("abc"));
        assert_eq!(lenient(r#"{"text": 20240115}"#).text.as_deref(), Some("20240115"));
        assert_eq!(lenient(r#"{"text": 2.0}"#).text.as_deref(), Some("2"));
        assert_eq!(lenient(r#"{"text": null}"#).text, None);
        assert_eq!(lenient(r#"{"text": "  "}"#).text, None);
        assert_eq!(lenient(r#"{}"#).text, None);
    }

    #[test]
    fn test_lenient_int_accepts_strings() {
        assert_eq!(lenient(r#"{"count": "12"}"#).count, Some(12));
        assert_eq!(lenient(r#"{"count": 3}"#).count, Some(3));
        assert_eq!(lenient(r#"{"count": "4.0"}"#).count, Some(4));
        assert_eq!(lenient(r#"{"count": ""}"#).count, None);
        assert_eq!(lenient(r#"{"count": null}"#).count, None);
    }

    #[test]
    fn test_missing_mandatory_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SourcePaths {
            fda: dir.path().join("missing.json"),
            fsis: dir.path().join("fsis.csv"),
            rasff_dir: dir.path().join("rasff"),
            uk_fsa: dir.path().join("uk.json"),
            cdc_dir: dir.path().join("cdc"),
            caers: dir.path().join("caers.json"),
        };
        let err = load_all(&paths).unwrap_err();
        assert!(matches!(err, Error::MissingSource { name: "FDA", .. }));
    }

    #[test]
    fn test_optional_sources_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let fda = dir.path().join("fda.json");
        let fsis = dir.path().join("fsis.csv");
        std::fs::write(
            &fda,
            r#"{"results": [{"recall_number": "F-1", "product_type": "Food", "classification": "Class I"}]}"#,
        )
        .unwrap();
        std::fs::write(&fsis, "recall_number,open_date,class,product,species,problem_type\n001-2024,2024-01-15,1,Ground beef,Beef,Listeria\n").unwrap();

        let paths = SourcePaths {
            fda,
            fsis,
            rasff_dir: dir.path().join("rasff"),
            uk_fsa: dir.path().join("uk.json"),
            cdc_dir: dir.path().join("cdc"),
            caers: dir.path().join("caers.json"),
        };
        let loaded = load_all(&paths).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].source, Source::Fda);
        assert_eq!(loaded.records[1].source, Source::Fsis);
        assert_eq!(loaded.counts.get(&Source::Rasff), Some(&0));
        assert!(loaded.outbreaks.is_empty());
        assert!(loaded.adverse_events.is_empty());
    }
}
