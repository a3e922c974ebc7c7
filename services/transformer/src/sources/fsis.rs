//! FSIS meat and poultry recalls (workbook or CSV export).

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::{ClassificationInput, ProductInput, RecallRecord, Source};

use super::sheet::Sheet;

/// Category for FSIS products without a species.
const DEFAULT_CATEGORY: &str = "Meat/Poultry";

pub fn normalize(sheet: &Sheet) -> Vec<RecallRecord> {
    let reference = sheet.column(&["recall_number", "recall number"]);
    let date = sheet.column(&["open_date", "open date"]);
    let class = sheet.column(&["class"]);
    let product = sheet.column(&["product"]);
    let species = sheet.column(&["species"]);
    let problem = sheet.column(&["problem_type", "problem type"]);

    sheet
        .rows()
        .map(|row| RecallRecord {
            source: Source::Fsis,
            reference_id: row.text(reference),
            event_id: None,
            raw_date: row.text(date),
            recall_geography: None,
            origin_geography: None,
            classification: ClassificationInput::Fsis {
                class: row.text(class),
            },
            product: ProductInput {
                key_text: row.text(product),
                name: None,
                category: Some(row.text(species).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            },
            company: None,
            reason: row.text(problem),
            distribution: None,
            action_taken: None,
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<RecallRecord>> {
    let sheet = Sheet::read(path)?;
    debug!(rows = sheet.row_count(), path = %path.display(), "read FSIS sheet");
    Ok(normalize(&sheet))
}
