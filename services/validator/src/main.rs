//! Validator Service - Checks a written food recall star schema
//!
//! Responsibilities:
//! - Load the CSV tables produced by the transformer
//! - Report record counts, date ranges and classification distributions
//! - Flag null-heavy columns, orphan foreign keys, missing unknown members
//!   and duplicate natural keys
//!
//! With --strict, any integrity violation makes the process exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Null rate at which a column is reported as a warning.
const NULL_WARN_PERCENT: f64 = 5.0;
const UNKNOWN_KEY: u32 = 1;
const TOP_N: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "validator", about = "Validates the food recall star schema")]
struct Args {
    /// Directory holding the CSV tables (overrides OUTPUT_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Exit non-zero when an integrity check fails
    #[arg(long, default_value = "false")]
    strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Recall {
    #[serde(rename = "RecallID")]
    recall_id: Option<String>,
    recall_date: Option<String>,
    source: String,
    geography_key: Option<u32>,
    origin_geography_key: Option<u32>,
    classification_key: Option<u32>,
    product_key: Option<u32>,
    company_key: Option<u32>,
    date_key: Option<u32>,
    recall_category: Option<String>,
}

/// The columns every data-driven dimension shares.
#[derive(Debug, Clone, Deserialize)]
struct DimensionRow {
    #[serde(
        alias = "GeographyKey",
        alias = "ClassificationKey",
        alias = "ProductKey",
        alias = "CompanyKey"
    )]
    key: u32,
    #[serde(rename = "NaturalKey")]
    natural_key: String,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "SeverityLevel", default)]
    severity_level: Option<String>,
    #[serde(rename = "ProductCategory", default)]
    product_category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DateRow {
    date_key: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthImpact {
    date_key: Option<u32>,
    illnesses: i64,
    hospitalizations: i64,
    deaths: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AdverseEvent {
    date_key: Option<u32>,
    product_type: String,
    has_hospitalization: bool,
    has_death: bool,
}

#[derive(Debug)]
struct Schema {
    dates: Vec<DateRow>,
    geography: Vec<DimensionRow>,
    classification: Vec<DimensionRow>,
    product: Vec<DimensionRow>,
    company: Vec<DimensionRow>,
    recalls: Vec<Recall>,
    health: Vec<HealthImpact>,
    adverse: Vec<AdverseEvent>,
}

fn parse_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        rows.push(row.with_context(|| format!("Invalid row {}", i + 2))?);
    }
    Ok(rows)
}

fn read_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(format!("{name}.csv"));
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    parse_rows(file).with_context(|| format!("Failed to read {}", path.display()))
}

impl Schema {
    fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            dates: read_table(dir, "dim_date")?,
            geography: read_table(dir, "dim_geography")?,
            classification: read_table(dir, "dim_classification")?,
            product: read_table(dir, "dim_product")?,
            company: read_table(dir, "dim_company")?,
            recalls: read_table(dir, "fact_recalls")?,
            health: read_table(dir, "fact_health_impact")?,
            adverse: read_table(dir, "fact_adverse_events")?,
        })
    }
}

/// An integrity failure; strict mode turns any of these into a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Violation {
    table: &'static str,
    message: String,
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

fn top<K: Ord + Clone>(counts: HashMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut sorted: Vec<(K, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

/// Every dimension must carry the unknown member and unique natural keys.
fn check_dimension(table: &'static str, rows: &[DimensionRow]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !rows.iter().any(|r| r.key == UNKNOWN_KEY) {
        violations.push(Violation {
            table,
            message: "unknown member (key 1) missing".to_string(),
        });
    }
    let mut seen_keys = HashSet::new();
    let mut seen_natural = HashSet::new();
    for row in rows {
        if !seen_keys.insert(row.key) {
            violations.push(Violation {
                table,
                message: format!("duplicate surrogate key {}", row.key),
            });
        }
        if !seen_natural.insert(row.natural_key.as_str()) {
            violations.push(Violation {
                table,
                message: format!("duplicate natural key {:?}", row.natural_key),
            });
        }
    }
    violations
}

fn keys(rows: &[DimensionRow]) -> HashSet<u32> {
    rows.iter().map(|r| r.key).collect()
}

/// Fact foreign keys pointing at no dimension row.
fn check_orphans(schema: &Schema) -> Vec<Violation> {
    let geography = keys(&schema.geography);
    let classification = keys(&schema.classification);
    let product = keys(&schema.product);
    let company = keys(&schema.company);
    let dates: HashSet<u32> = schema.dates.iter().map(|d| d.date_key).collect();

    type KeyOf = fn(&Recall) -> Option<u32>;
    let columns: [(&str, KeyOf, &HashSet<u32>); 5] = [
        ("GeographyKey", |r| r.geography_key, &geography),
        ("OriginGeographyKey", |r| r.origin_geography_key, &geography),
        ("ClassificationKey", |r| r.classification_key, &classification),
        ("ProductKey", |r| r.product_key, &product),
        ("CompanyKey", |r| r.company_key, &company),
    ];

    let mut violations = Vec::new();
    for (column, key_of, valid) in columns {
        let orphans = schema
            .recalls
            .iter()
            .filter_map(key_of)
            .filter(|k| !valid.contains(k))
            .count();
        if orphans > 0 {
            violations.push(Violation {
                table: "fact_recalls",
                message: format!("{orphans} orphan {column} values"),
            });
        }
    }

    // Recall dates outside the generated calendar are expected; outbreak
    // and adverse event date keys are only set when the date exists.
    let outside = schema
        .recalls
        .iter()
        .filter_map(|r| r.date_key)
        .filter(|k| !dates.contains(k))
        .count();
    if outside > 0 {
        warn!(count = outside, "fact_recalls DateKey values outside dim_date");
    }
    let health_orphans = schema
        .health
        .iter()
        .filter_map(|h| h.date_key)
        .filter(|k| !dates.contains(k))
        .count();
    if health_orphans > 0 {
        violations.push(Violation {
            table: "fact_health_impact",
            message: format!("{health_orphans} orphan DateKey values"),
        });
    }
    let adverse_orphans = schema
        .adverse
        .iter()
        .filter_map(|a| a.date_key)
        .filter(|k| !dates.contains(k))
        .count();
    if adverse_orphans > 0 {
        violations.push(Violation {
            table: "fact_adverse_events",
            message: format!("{adverse_orphans} orphan DateKey values"),
        });
    }
    violations
}

/// Foreign keys that must always be present on a recall.
fn check_required_keys(recalls: &[Recall]) -> Vec<Violation> {
    type KeyOf = fn(&Recall) -> Option<u32>;
    let required: [(&str, KeyOf); 4] = [
        ("GeographyKey", |r| r.geography_key),
        ("ClassificationKey", |r| r.classification_key),
        ("ProductKey", |r| r.product_key),
        ("CompanyKey", |r| r.company_key),
    ];
    required
        .into_iter()
        .filter_map(|(column, key_of)| {
            let missing = recalls.iter().filter(|r| key_of(r).is_none()).count();
            (missing > 0).then(|| Violation {
                table: "fact_recalls",
                message: format!("{missing} rows without {column}"),
            })
        })
        .collect()
}

/// Null percentage per nullable fact column.
fn null_rates(recalls: &[Recall]) -> Vec<(&'static str, f64)> {
    let total = recalls.len();
    let count = |pred: fn(&Recall) -> bool| recalls.iter().filter(|r| pred(r)).count();
    vec![
        ("RecallID", percent(count(|r| r.recall_id.is_none()), total)),
        ("RecallDate", percent(count(|r| r.recall_date.is_none()), total)),
        ("DateKey", percent(count(|r| r.date_key.is_none()), total)),
        (
            "OriginGeographyKey",
            percent(count(|r| r.origin_geography_key.is_none()), total),
        ),
        (
            "RecallCategory",
            percent(count(|r| r.recall_category.is_none()), total),
        ),
    ]
}

fn report(schema: &Schema) {
    let recalls = &schema.recalls;
    info!(recalls = recalls.len(), "fact_recalls loaded");

    let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
    let mut ranges: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for r in recalls {
        *by_source.entry(r.source.as_str()).or_default() += 1;
        if let Some(key) = r.date_key {
            let range = ranges.entry(r.source.as_str()).or_insert((key, key));
            range.0 = range.0.min(key);
            range.1 = range.1.max(key);
        }
    }
    for (source, count) in &by_source {
        info!(source, count, percent = %format!("{:.1}", percent(*count, recalls.len())), "records by source");
    }
    for (source, (first, last)) in &ranges {
        info!(source, first, last, "date range");
    }

    let mut categories: HashMap<&str, usize> = HashMap::new();
    for r in recalls {
        *categories
            .entry(r.recall_category.as_deref().unwrap_or("<null>"))
            .or_default() += 1;
    }
    for (category, count) in top(categories, TOP_N) {
        info!(category, count, "classification distribution");
    }

    let severity: HashMap<u32, &str> = schema
        .classification
        .iter()
        .map(|c| (c.key, c.severity_level.as_deref().unwrap_or("Unknown")))
        .collect();
    let mut by_severity: HashMap<&str, usize> = HashMap::new();
    for r in recalls {
        let level = r
            .classification_key
            .and_then(|k| severity.get(&k).copied())
            .unwrap_or("Unknown");
        *by_severity.entry(level).or_default() += 1;
    }
    for (level, count) in top(by_severity, TOP_N) {
        info!(level, count, "severity distribution");
    }

    let states: HashMap<u32, &str> = schema
        .geography
        .iter()
        .filter_map(|g| g.state.as_deref().map(|s| (g.key, s)))
        .collect();
    let mut by_state: HashMap<&str, usize> = HashMap::new();
    for r in recalls {
        if let Some(state) = r.geography_key.and_then(|k| states.get(&k).copied()) {
            *by_state.entry(state).or_default() += 1;
        }
    }
    for (state, count) in top(by_state, TOP_N) {
        info!(state, count, "top states");
    }

    let mut by_year: BTreeMap<u32, usize> = BTreeMap::new();
    for key in recalls.iter().filter_map(|r| r.date_key) {
        *by_year.entry(key / 10_000).or_default() += 1;
    }
    for (year, count) in &by_year {
        info!(year, count, "yearly distribution");
    }

    let categories_by_product: HashMap<u32, &str> = schema
        .product
        .iter()
        .filter_map(|p| p.product_category.as_deref().map(|c| (p.key, c)))
        .collect();
    let mut by_category: HashMap<&str, usize> = HashMap::new();
    for r in recalls {
        if let Some(category) = r.product_key.and_then(|k| categories_by_product.get(&k).copied()) {
            *by_category.entry(category).or_default() += 1;
        }
    }
    for (category, count) in top(by_category, TOP_N) {
        info!(category, count, "top product categories");
    }

    let health = &schema.health;
    info!(
        outbreaks = health.len(),
        illnesses = health.iter().map(|h| h.illnesses).sum::<i64>(),
        hospitalizations = health.iter().map(|h| h.hospitalizations).sum::<i64>(),
        deaths = health.iter().map(|h| h.deaths).sum::<i64>(),
        "CDC outbreak totals"
    );

    let adverse = &schema.adverse;
    info!(
        reports = adverse.len(),
        hospitalizations = adverse.iter().filter(|a| a.has_hospitalization).count(),
        deaths = adverse.iter().filter(|a| a.has_death).count(),
        "CAERS adverse event totals"
    );
    let mut by_type: HashMap<&str, usize> = HashMap::new();
    for a in adverse {
        *by_type.entry(a.product_type.as_str()).or_default() += 1;
    }
    for (product_type, count) in top(by_type, TOP_N) {
        info!(product_type, count, "adverse events by product type");
    }

    for (column, pct) in null_rates(recalls) {
        if pct >= NULL_WARN_PERCENT {
            warn!(column, percent = %format!("{pct:.1}"), "high null rate");
        } else {
            info!(column, percent = %format!("{pct:.1}"), "null rate");
        }
    }
}

fn validate(schema: &Schema) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(check_dimension("dim_geography", &schema.geography));
    violations.extend(check_dimension("dim_classification", &schema.classification));
    violations.extend(check_dimension("dim_product", &schema.product));
    violations.extend(check_dimension("dim_company", &schema.company));
    violations.extend(check_required_keys(&schema.recalls));
    violations.extend(check_orphans(schema));
    violations
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let dir = args.dir.unwrap_or_else(|| {
        PathBuf::from(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./data/output/star".to_string()))
    });

    info!("=== Food Recall Star Schema Validator ===");
    info!(dir = %dir.display(), strict = args.strict, "validating tables");

    let schema = Schema::load(&dir)?;
    report(&schema);

    let violations = validate(&schema);
    for v in &violations {
        warn!(table = v.table, "{}", v.message);
    }
    if violations.is_empty() {
        info!("All integrity checks passed");
    } else {
        warn!(count = violations.len(), "integrity checks failed");
        if args.strict {
            anyhow::bail!("{} integrity violation(s)", violations.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOGRAPHY: &str = "\
GeographyKey,NaturalKey,Country,CountryCode,State,Region,IsEUMember,IsEFTA
1,<unknown>,Unknown,,,Unknown,false,false
2,USA|California,United States,USA,California,USA,false,false
3,Mexico,Mexico,,,Other,false,false
";

    const RECALLS: &str = "\
RecallKey,RecallID,EventID,RecallDate,Source,GeographyKey,OriginGeographyKey,ClassificationKey,ProductKey,CompanyKey,DateKey,ReasonForRecall,RecallCategory,RecallGroup,RecallSubgroup,DistributionScope,ActionTaken
1,F-1,93001,2024-01-15,FDA,2,2,1,1,1,20240115,Undeclared milk,Product Contaminant,Allergens,Milk,,
2,S-1,S-1,,FSIS,9,,1,1,1,,Listeria,Product Contaminant,Biological Contamination,Listeria,,
";

    fn dims(csv: &str) -> Vec<DimensionRow> {
        parse_rows(csv.as_bytes()).unwrap()
    }

    fn sentinel_only() -> Vec<DimensionRow> {
        dims("ProductKey,NaturalKey,ProductName,ProductCategory,ProductType\n1,<unknown>,Unknown,,Unknown\n")
    }

    fn schema() -> Schema {
        Schema {
            dates: parse_rows("DateKey,Date\n20240115,2024-01-15\n".as_bytes()).unwrap(),
            geography: dims(GEOGRAPHY),
            classification: sentinel_only(),
            product: sentinel_only(),
            company: sentinel_only(),
            recalls: parse_rows(RECALLS.as_bytes()).unwrap(),
            health: Vec::new(),
            adverse: Vec::new(),
        }
    }

    #[test]
    fn test_parse_fact_rows() {
        let recalls: Vec<Recall> = parse_rows(RECALLS.as_bytes()).unwrap();
        assert_eq!(recalls.len(), 2);
        assert_eq!(recalls[0].date_key, Some(20240115));
        assert_eq!(recalls[1].recall_date, None);
        assert_eq!(recalls[1].origin_geography_key, None);
    }

    #[test]
    fn test_dimension_checks() {
        assert!(check_dimension("dim_geography", &dims(GEOGRAPHY)).is_empty());

        let duplicated = dims("CompanyKey,NaturalKey\n1,<unknown>\n2,Acme\n3,Acme\n");
        let violations = check_dimension("dim_company", &duplicated);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("duplicate natural key"));

        let no_sentinel = dims("CompanyKey,NaturalKey\n2,Acme\n");
        assert_eq!(check_dimension("dim_company", &no_sentinel)[0].message, "unknown member (key 1) missing");
    }

    #[test]
    fn test_orphan_geography_detected() {
        let violations = check_orphans(&schema());
        assert_eq!(
            violations,
            vec![Violation {
                table: "fact_recalls",
                message: "1 orphan GeographyKey values".to_string(),
            }]
        );
    }

    #[test]
    fn test_null_rates() {
        let rates = null_rates(&schema().recalls);
        assert_eq!(rates[1], ("RecallDate", 50.0));
        assert_eq!(rates[3], ("OriginGeographyKey", 50.0));
        assert_eq!(rates[0], ("RecallID", 0.0));
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let mut s = schema();
        s.recalls[0].product_key = None;
        let violations = validate(&s);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_header_only_table_reads_as_no_rows() {
        let header = "HealthImpactKey,OutbreakID,Year,Month,DateKey,State,Illnesses,Hospitalizations,Deaths\n";
        let rows: Vec<HealthImpact> = parse_rows(header.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_orphan_adverse_event_date_detected() {
        let mut s = schema();
        s.recalls[1].geography_key = Some(2);
        s.adverse = parse_rows(
            "AdverseEventKey,DateKey,ProductType,HasHospitalization,HasDeath\n\
             1,20240115,Seafood,true,false\n\
             2,20990101,Dairy,false,false\n\
             3,,Other,false,true\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(
            check_orphans(&s),
            vec![Violation {
                table: "fact_adverse_events",
                message: "1 orphan DateKey values".to_string(),
            }]
        );
    }

    #[test]
    fn test_top_orders_by_count_then_key() {
        let counts: HashMap<&str, usize> = [("b", 2), ("a", 2), ("c", 5)].into_iter().collect();
        assert_eq!(top(counts, 2), vec![("c", 5), ("a", 2)]);
    }
}
