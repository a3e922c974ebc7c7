//! Optional PostgreSQL load of a finished star schema.
//!
//! All tables are replaced inside one transaction; a `job_runs` row records
//! the attempt whether or not it commits.

use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::adverse::AdverseEventRow;
use crate::calendar::DateRow;
use crate::error::Result;
use crate::facts::FactRecall;
use crate::health::HealthImpactRow;
use crate::schema::{ClassificationRow, CompanyRow, GeographyRow, ProductRow, StarSchema, TABLES};
use crate::summary::YearlySummaryRow;

const DDL: &str = include_str!("../sql/star_schema.sql");
const COMPONENT: &str = "transformer";

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A row with a fixed target table and column list.
trait TableRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// Surrogate keys and calendar parts are small; Postgres has no unsigned
/// integers.
fn int(value: u32) -> i32 {
    value as i32
}

impl TableRow for DateRow {
    const TABLE: &'static str = "dim_date";
    const COLUMNS: &'static [&'static str] = &[
        "date_key",
        "date",
        "year",
        "fiscal_year",
        "quarter",
        "fiscal_quarter",
        "month",
        "month_name",
        "day",
        "day_of_week",
        "day_name",
        "week_of_year",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.date_key))
            .bind(self.date)
            .bind(self.year)
            .bind(self.fiscal_year)
            .bind(int(self.quarter))
            .bind(int(self.fiscal_quarter))
            .bind(int(self.month))
            .bind(&self.month_name)
            .bind(int(self.day))
            .bind(int(self.day_of_week))
            .bind(&self.day_name)
            .bind(int(self.week_of_year))
    }
}

impl TableRow for GeographyRow {
    const TABLE: &'static str = "dim_geography";
    const COLUMNS: &'static [&'static str] = &[
        "geography_key",
        "natural_key",
        "country",
        "country_code",
        "state",
        "region",
        "is_eu_member",
        "is_efta",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.geography_key))
            .bind(&self.natural_key)
            .bind(&self.country)
            .bind(&self.country_code)
            .bind(&self.state)
            .bind(self.region)
            .bind(self.is_eu_member)
            .bind(self.is_efta)
    }
}

impl TableRow for ClassificationRow {
    const TABLE: &'static str = "dim_classification";
    const COLUMNS: &'static [&'static str] = &[
        "classification_key",
        "natural_key",
        "source",
        "original_classification",
        "usa_class_level",
        "notification_type",
        "risk_decision",
        "severity_level",
        "severity_score",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.classification_key))
            .bind(&self.natural_key)
            .bind(self.source.map(|s| s.as_str()))
            .bind(&self.original_classification)
            .bind(&self.usa_class_level)
            .bind(&self.notification_type)
            .bind(&self.risk_decision)
            .bind(self.severity_level)
            .bind(self.severity_score)
    }
}

impl TableRow for ProductRow {
    const TABLE: &'static str = "dim_product";
    const COLUMNS: &'static [&'static str] = &[
        "product_key",
        "natural_key",
        "product_name",
        "product_category",
        "product_type",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.product_key))
            .bind(&self.natural_key)
            .bind(&self.product_name)
            .bind(&self.product_category)
            .bind(&self.product_type)
    }
}

impl TableRow for CompanyRow {
    const TABLE: &'static str = "dim_company";
    const COLUMNS: &'static [&'static str] = &[
        "company_key",
        "natural_key",
        "company_name",
        "city",
        "state",
        "country",
        "establishment_number",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.company_key))
            .bind(&self.natural_key)
            .bind(&self.company_name)
            .bind(&self.city)
            .bind(&self.state)
            .bind(&self.country)
            .bind(&self.establishment_number)
    }
}

impl TableRow for FactRecall {
    const TABLE: &'static str = "fact_recalls";
    const COLUMNS: &'static [&'static str] = &[
        "recall_key",
        "recall_id",
        "event_id",
        "recall_date",
        "source",
        "geography_key",
        "origin_geography_key",
        "classification_key",
        "product_key",
        "company_key",
        "date_key",
        "reason_for_recall",
        "recall_category",
        "recall_group",
        "recall_subgroup",
        "distribution_scope",
        "action_taken",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.recall_key))
            .bind(&self.recall_id)
            .bind(&self.event_id)
            .bind(self.recall_date)
            .bind(self.source.as_str())
            .bind(int(self.geography_key))
            .bind(self.origin_geography_key.map(int))
            .bind(int(self.classification_key))
            .bind(int(self.product_key))
            .bind(int(self.company_key))
            .bind(self.date_key.map(int))
            .bind(&self.reason_for_recall)
            .bind(self.recall_category.as_str())
            .bind(&self.recall_group)
            .bind(&self.recall_subgroup)
            .bind(&self.distribution_scope)
            .bind(&self.action_taken)
    }
}

impl TableRow for HealthImpactRow {
    const TABLE: &'static str = "fact_health_impact";
    const COLUMNS: &'static [&'static str] = &[
        "health_impact_key",
        "outbreak_id",
        "year",
        "month",
        "date_key",
        "state",
        "illnesses",
        "hospitalizations",
        "deaths",
        "pathogen",
        "serotype",
        "food_vehicle",
        "ifsac_category",
        "setting",
        "primary_mode",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.health_impact_key))
            .bind(&self.outbreak_id)
            .bind(self.year)
            .bind(int(self.month))
            .bind(self.date_key.map(int))
            .bind(&self.state)
            .bind(self.illnesses)
            .bind(self.hospitalizations)
            .bind(self.deaths)
            .bind(&self.pathogen)
            .bind(&self.serotype)
            .bind(&self.food_vehicle)
            .bind(&self.ifsac_category)
            .bind(&self.setting)
            .bind(&self.primary_mode)
    }
}

impl TableRow for AdverseEventRow {
    const TABLE: &'static str = "fact_adverse_events";
    const COLUMNS: &'static [&'static str] = &[
        "adverse_event_key",
        "report_number",
        "date_key",
        "year",
        "month",
        "industry_code",
        "industry_category",
        "product_type",
        "product_name",
        "consumer_age",
        "consumer_gender",
        "has_hospitalization",
        "has_emergency_room",
        "has_death",
        "has_life_threatening",
        "has_disability",
        "has_allergic_reaction",
        "has_healthcare_visit",
        "reaction_count",
        "outcome_count",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.adverse_event_key))
            .bind(&self.report_number)
            .bind(self.date_key.map(int))
            .bind(self.year)
            .bind(self.month.map(int))
            .bind(&self.industry_code)
            .bind(&self.industry_category)
            .bind(self.product_type)
            .bind(&self.product_name)
            .bind(self.consumer_age.map(int))
            .bind(&self.consumer_gender)
            .bind(self.has_hospitalization)
            .bind(self.has_emergency_room)
            .bind(self.has_death)
            .bind(self.has_life_threatening)
            .bind(self.has_disability)
            .bind(self.has_allergic_reaction)
            .bind(self.has_healthcare_visit)
            .bind(self.reaction_count as i32)
            .bind(self.outcome_count as i32)
    }
}

impl TableRow for YearlySummaryRow {
    const TABLE: &'static str = "fact_yearly_summary";
    const COLUMNS: &'static [&'static str] = &[
        "yearly_summary_key",
        "year",
        "source",
        "recall_category",
        "recall_group",
        "recall_subgroup",
        "recall_count",
    ];

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(int(self.yearly_summary_key))
            .bind(self.year)
            .bind(self.source.as_str())
            .bind(self.recall_category.as_str())
            .bind(&self.recall_group)
            .bind(&self.recall_subgroup)
            .bind(self.recall_count as i64)
    }
}

fn insert_sql<T: TableRow>() -> String {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

async fn insert_all<T: TableRow>(tx: &mut Transaction<'_, Postgres>, rows: &[T]) -> Result<()> {
    let sql = insert_sql::<T>();
    for row in rows {
        row.bind(sqlx::query(&sql)).execute(&mut **tx).await?;
    }
    info!(table = T::TABLE, rows = rows.len(), "loaded table");
    Ok(())
}

pub async fn connect(db_url: &str) -> Result<PgPool> {
    Ok(PgPoolOptions::new().max_connections(5).connect(db_url).await?)
}

async fn create_job_run(pool: &PgPool) -> Result<Uuid> {
    let job_run_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO job_runs (job_run_id, component, status)
        VALUES ($1, $2, 'running')
        "#,
    )
    .bind(job_run_id)
    .bind(COMPONENT)
    .execute(pool)
    .await?;
    Ok(job_run_id)
}

async fn finish_job_run(
    pool: &PgPool,
    job_run_id: Uuid,
    status: &str,
    error: Option<&str>,
    detail: serde_json::Value,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE job_runs
        SET finished_at = now(), status = $2, error = $3, detail = detail || $4
        WHERE job_run_id = $1
        "#,
    )
    .bind(job_run_id)
    .bind(status)
    .bind(error)
    .bind(detail)
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_tables(pool: &PgPool) -> Result<()> {
    for statement in DDL.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

async fn replace_tables(pool: &PgPool, schema: &StarSchema) -> Result<()> {
    let mut tx = pool.begin().await?;
    let truncate = format!("TRUNCATE TABLE {}", TABLES.join(", "));
    sqlx::query(&truncate).execute(&mut *tx).await?;

    insert_all(&mut tx, &schema.dates).await?;
    insert_all(&mut tx, &schema.geography).await?;
    insert_all(&mut tx, &schema.classification).await?;
    insert_all(&mut tx, &schema.product).await?;
    insert_all(&mut tx, &schema.company).await?;
    insert_all(&mut tx, &schema.recalls).await?;
    insert_all(&mut tx, &schema.health_impact).await?;
    insert_all(&mut tx, &schema.adverse_events).await?;
    insert_all(&mut tx, &schema.yearly_summary).await?;

    tx.commit().await?;
    Ok(())
}

/// Replaces the contents of every star schema table with `schema`.
pub async fn load(pool: &PgPool, schema: &StarSchema) -> Result<Uuid> {
    create_tables(pool).await?;
    let job_run_id = create_job_run(pool).await?;
    info!(job_run_id = %job_run_id, "loading star schema into database");

    let counts: serde_json::Map<String, serde_json::Value> = schema
        .row_counts()
        .into_iter()
        .map(|(table, rows)| (table.to_string(), rows.into()))
        .collect();

    match replace_tables(pool, schema).await {
        Ok(()) => {
            finish_job_run(pool, job_run_id, "ok", None, counts.into()).await?;
            Ok(job_run_id)
        }
        Err(e) => {
            warn!(job_run_id = %job_run_id, error = %e, "database load rolled back");
            finish_job_run(pool, job_run_id, "failed", Some(&e.to_string()), serde_json::json!({}))
                .await?;
            Err(e)
        }
    }
}
