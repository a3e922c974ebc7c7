//! Three-level recall reason taxonomy.
//!
//! Classification is a fixed cascade of eleven stages. Each stage scans an
//! ordered keyword table by substring; the first hit ends the cascade. The
//! same text can satisfy several tables ("undeclared milk due to
//! cross-contact"), so table order and stage order decide the label.

mod rules;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecallCategory {
    #[serde(rename = "Product Contaminant")]
    ProductContaminant,
    #[serde(rename = "Process Issue")]
    ProcessIssue,
    Other,
}

impl RecallCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecallCategory::ProductContaminant => "Product Contaminant",
            RecallCategory::ProcessIssue => "Process Issue",
            RecallCategory::Other => "Other",
        }
    }
}

impl fmt::Display for RecallCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (RecallCategory, RecallGroup, RecallSubgroup).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    pub category: RecallCategory,
    pub group: String,
    pub subgroup: Option<String>,
}

impl Classification {
    fn new(category: RecallCategory, group: &str, subgroup: &str) -> Self {
        Self {
            category,
            group: group.to_string(),
            subgroup: Some(subgroup.to_string()),
        }
    }

    fn contaminant(group: &str, subgroup: &str) -> Self {
        Self::new(RecallCategory::ProductContaminant, group, subgroup)
    }

    /// Result for a missing or blank reason.
    pub fn unclassified() -> Self {
        Self {
            category: RecallCategory::Other,
            group: "Other".to_string(),
            subgroup: None,
        }
    }
}

const BIOLOGICAL: &str = "Biological Contamination";
const ALLERGENS: &str = "Allergens";
const CHEMICAL: &str = "Chemical Contamination";
const FOREIGN_OBJECTS: &str = "Foreign Objects";
const FOOD_COLORS: &str = "Undeclared Food Colors";

type Table = Vec<(String, String)>;

/// Ordered keyword tables driving the classifier.
///
/// A JSON rules file deserializes into this struct; tables missing from the
/// file keep their built-in contents. Tables are lists of `[keyword, label]`
/// pairs so their order survives the round trip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReasonRules {
    pub pathogens: Table,
    pub allergens: Table,
    pub chemicals: Table,
    pub rasff_contaminants: Table,
    pub foreign_objects: Table,
    pub process_issues: Table,
    pub undeclared_signals: Vec<String>,
    pub labeling_signals: Vec<String>,
    pub allergen_context: Vec<String>,
    pub allergen_tag: String,
    pub tagged_allergens: Vec<(Vec<String>, String)>,
    pub color_terms: Vec<String>,
    pub color_markers: Vec<String>,
    pub generic_biological: Vec<String>,
}

fn table(pairs: &[(&str, &str)]) -> Table {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for ReasonRules {
    fn default() -> Self {
        Self {
            pathogens: table(rules::PATHOGENS),
            allergens: table(rules::ALLERGENS),
            chemicals: table(rules::CHEMICALS),
            rasff_contaminants: table(rules::RASFF_CONTAMINANTS),
            foreign_objects: table(rules::FOREIGN_OBJECTS),
            process_issues: table(rules::PROCESS_ISSUES),
            undeclared_signals: words(rules::UNDECLARED_SIGNALS),
            labeling_signals: words(rules::LABELING_SIGNALS),
            allergen_context: words(rules::ALLERGEN_CONTEXT),
            allergen_tag: rules::ALLERGEN_TAG.to_string(),
            tagged_allergens: rules::TAGGED_ALLERGENS
                .iter()
                .map(|(terms, label)| (words(terms), label.to_string()))
                .collect(),
            color_terms: words(rules::COLOR_TERMS),
            color_markers: words(rules::COLOR_MARKERS),
            generic_biological: words(rules::GENERIC_BIOLOGICAL),
        }
    }
}

impl ReasonRules {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let rules: ReasonRules = serde_json::from_str(&text).map_err(|e| Error::json(path, e))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Keywords are matched case-insensitively against lower-cased text, so
    /// an upper-case or empty keyword would either never or always match.
    pub fn validate(&self) -> Result<()> {
        let tables = [
            ("pathogens", &self.pathogens),
            ("allergens", &self.allergens),
            ("chemicals", &self.chemicals),
            ("rasff_contaminants", &self.rasff_contaminants),
            ("foreign_objects", &self.foreign_objects),
            ("process_issues", &self.process_issues),
        ];
        let keywords = tables
            .iter()
            .flat_map(|(name, t)| t.iter().map(move |(k, _)| (*name, k)));
        let lists = [
            ("undeclared_signals", &self.undeclared_signals),
            ("labeling_signals", &self.labeling_signals),
            ("allergen_context", &self.allergen_context),
            ("color_terms", &self.color_terms),
            ("color_markers", &self.color_markers),
            ("generic_biological", &self.generic_biological),
        ];
        let listed = lists
            .iter()
            .flat_map(|(name, l)| l.iter().map(move |k| (*name, k)));
        let tagged = self
            .tagged_allergens
            .iter()
            .flat_map(|(terms, _)| terms.iter().map(|k| ("tagged_allergens", k)));

        for (name, keyword) in keywords.chain(listed).chain(tagged) {
            if keyword.trim().is_empty() {
                return Err(Error::Rules(format!("empty keyword in {name}")));
            }
            if *keyword != keyword.to_lowercase() {
                return Err(Error::Rules(format!(
                    "keyword {keyword:?} in {name} must be lower-case"
                )));
            }
        }
        if self.allergen_tag.trim().is_empty() {
            return Err(Error::Rules("empty allergen_tag".to_string()));
        }
        Ok(())
    }
}

fn first_hit<'a>(table: &'a Table, text: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(keyword, _)| text.contains(keyword.as_str()))
        .map(|(_, label)| label.as_str())
}

fn any_of(list: &[String], text: &str) -> bool {
    list.iter().any(|w| text.contains(w.as_str()))
}

#[derive(Debug, Clone, Default)]
pub struct ReasonClassifier {
    rules: ReasonRules,
}

impl ReasonClassifier {
    pub fn new(rules: ReasonRules) -> Self {
        Self { rules }
    }

    /// Classifies a free-text reason. Total: every input yields a result.
    pub fn classify(&self, reason: Option<&str>) -> Classification {
        let Some(reason) = reason.filter(|r| !r.trim().is_empty()) else {
            return Classification::unclassified();
        };
        let text = reason.to_lowercase();
        let r = &self.rules;

        if let Some(pathogen) = first_hit(&r.pathogens, &text) {
            return Classification::contaminant(BIOLOGICAL, pathogen);
        }

        let undeclared = any_of(&r.undeclared_signals, &text);
        let labeling = any_of(&r.labeling_signals, &text);
        if undeclared || labeling || any_of(&r.allergen_context, &text) {
            if let Some(allergen) = first_hit(&r.allergens, &text) {
                return Classification::contaminant(ALLERGENS, allergen);
            }
        }

        if let Some(chemical) = first_hit(&r.chemicals, &text) {
            return Classification::contaminant(CHEMICAL, chemical);
        }
        if let Some(contaminant) = first_hit(&r.rasff_contaminants, &text) {
            return Classification::contaminant(CHEMICAL, contaminant);
        }
        if let Some(object) = first_hit(&r.foreign_objects, &text) {
            return Classification::contaminant(FOREIGN_OBJECTS, object);
        }

        if text.contains(r.allergen_tag.as_str()) {
            let allergen = r
                .tagged_allergens
                .iter()
                .find(|(terms, _)| any_of(terms, &text))
                .map(|(_, label)| label.as_str())
                .unwrap_or("Allergens - Other");
            return Classification::contaminant(ALLERGENS, allergen);
        }

        let colored = text.contains("undeclared") && any_of(&r.color_terms, &text);
        if colored || any_of(&r.color_markers, &text) {
            return Classification::contaminant(FOOD_COLORS, "Undeclared Food Colors - Other");
        }

        if let Some(issue) = first_hit(&r.process_issues, &text) {
            return Classification::new(
                RecallCategory::ProcessIssue,
                issue,
                &format!("{issue} - Other"),
            );
        }

        if undeclared || labeling {
            return Classification::contaminant(ALLERGENS, "Allergens - Other");
        }

        if any_of(&r.generic_biological, &text) {
            return Classification::contaminant(BIOLOGICAL, "Biological Contamination - Other");
        }

        Classification::new(RecallCategory::Other, "Other", "Other")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> (RecallCategory, String, Option<String>) {
        let c = ReasonClassifier::default().classify(Some(text));
        (c.category, c.group, c.subgroup)
    }

    fn expect(category: RecallCategory, group: &str, subgroup: &str) -> (RecallCategory, String, Option<String>) {
        (category, group.to_string(), Some(subgroup.to_string()))
    }

    use RecallCategory::{Other, ProcessIssue, ProductContaminant};

    // ------------------------------------------------------------------
    // Reference scenarios
    // ------------------------------------------------------------------

    #[test]
    fn test_undeclared_peanuts() {
        assert_eq!(
            classify("Product contains undeclared peanuts"),
            expect(ProductContaminant, "Allergens", "Peanuts")
        );
    }

    #[test]
    fn test_pathogen_wins_over_later_stages() {
        assert_eq!(
            classify("Listeria monocytogenes detected in environmental sampling"),
            expect(ProductContaminant, "Biological Contamination", "Listeria monocytogenes")
        );
    }

    #[test]
    fn test_expiration_date_is_mislabeling() {
        assert_eq!(
            classify("Recalled due to incorrect expiration date on label"),
            expect(ProcessIssue, "Mislabeling", "Mislabeling - Other")
        );
    }

    #[test]
    fn test_absent_and_blank_reason() {
        let classifier = ReasonClassifier::default();
        assert_eq!(classifier.classify(None), Classification::unclassified());
        assert_eq!(classifier.classify(Some("")), Classification::unclassified());
        assert_eq!(classifier.classify(Some("   ")), Classification::unclassified());
        assert_eq!(Classification::unclassified().subgroup, None);
    }

    // ------------------------------------------------------------------
    // Stage precedence
    // ------------------------------------------------------------------

    #[test]
    fn test_allergen_beats_process_keyword() {
        assert_eq!(
            classify("Undeclared milk due to cross-contact"),
            expect(ProductContaminant, "Allergens", "Milk")
        );
    }

    #[test]
    fn test_allergen_without_signal_is_not_conclusive() {
        assert_eq!(classify("Contains peanuts"), expect(Other, "Other", "Other"));
    }

    #[test]
    fn test_allergen_accepted_with_allerg_marker() {
        assert_eq!(
            classify("Possible allergic reaction to sesame"),
            expect(ProductContaminant, "Allergens", "Sesame")
        );
    }

    #[test]
    fn test_may_contain_signal() {
        assert_eq!(
            classify("Products may contain peanuts"),
            expect(ProductContaminant, "Allergens", "Peanuts")
        );
    }

    #[test]
    fn test_chemical_contaminant() {
        assert_eq!(
            classify("Elevated levels of lead"),
            expect(ProductContaminant, "Chemical Contamination", "Lead")
        );
    }

    #[test]
    fn test_rasff_contaminant_alias() {
        assert_eq!(
            classify("rhodamine b (colours)"),
            expect(ProductContaminant, "Chemical Contamination", "Unauthorised Colors")
        );
    }

    #[test]
    fn test_foreign_objects() {
        assert_eq!(
            classify("Pieces of glass found in jar"),
            expect(ProductContaminant, "Foreign Objects", "Glass Fragments")
        );
        assert_eq!(
            classify("Foreign matter: metal fragments"),
            expect(ProductContaminant, "Foreign Objects", "Metal Fragments")
        );
    }

    #[test]
    fn test_food_color_marker() {
        assert_eq!(
            classify("Undeclared FD&C Yellow #5"),
            expect(ProductContaminant, "Undeclared Food Colors", "Undeclared Food Colors - Other")
        );
    }

    #[test]
    fn test_deferred_allergen_fallback() {
        assert_eq!(
            classify("Product contains an undeclared ingredient"),
            expect(ProductContaminant, "Allergens", "Allergens - Other")
        );
    }

    #[test]
    fn test_generic_biological_fallback() {
        assert_eq!(
            classify("Possible bacterial contamination"),
            expect(ProductContaminant, "Biological Contamination", "Biological Contamination - Other")
        );
    }

    #[test]
    fn test_unclassifiable_text_is_other() {
        assert_eq!(classify("Voluntary market withdrawal"), expect(Other, "Other", "Other"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("SALMONELLA"), classify("salmonella"));
    }

    // ------------------------------------------------------------------
    // Injected rules
    // ------------------------------------------------------------------

    #[test]
    fn test_allergen_tag_heuristic_with_custom_tables() {
        let rules = ReasonRules {
            allergens: Vec::new(),
            ..ReasonRules::default()
        };
        let classifier = ReasonClassifier::new(rules);
        let c = classifier.classify(Some("nuts (allergens)"));
        assert_eq!(c.group, "Allergens");
        assert_eq!(c.subgroup.as_deref(), Some("Tree Nuts"));
        let c = classifier.classify(Some("gluten (allergens)"));
        assert_eq!(c.subgroup.as_deref(), Some("Allergens - Other"));
    }

    #[test]
    fn test_table_order_decides_label() {
        let rules = ReasonRules {
            pathogens: vec![
                ("coli".to_string(), "First".to_string()),
                ("e. coli".to_string(), "Second".to_string()),
            ],
            ..ReasonRules::default()
        };
        let c = ReasonClassifier::new(rules).classify(Some("E. coli O157"));
        assert_eq!(c.subgroup.as_deref(), Some("First"));
    }

    #[test]
    fn test_rules_file_overlays_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"pathogens": [["norovirus", "Norovirus"]]}"#).unwrap();
        let rules = ReasonRules::from_path(&path).unwrap();
        assert_eq!(rules.pathogens.len(), 1);
        assert_eq!(rules.allergens, ReasonRules::default().allergens);
    }

    #[test]
    fn test_rules_file_rejects_bad_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"chemicals": [["", "Anything"]]}"#).unwrap();
        assert!(matches!(ReasonRules::from_path(&path), Err(Error::Rules(_))));
        std::fs::write(&path, r#"{"chemicals": [["Lead", "Lead"]]}"#).unwrap();
        assert!(matches!(ReasonRules::from_path(&path), Err(Error::Rules(_))));
        std::fs::write(&path, r#"{"unknown_table": []}"#).unwrap();
        assert!(matches!(ReasonRules::from_path(&path), Err(Error::Json { .. })));
    }

    #[test]
    fn test_builtin_rules_are_valid() {
        ReasonRules::default().validate().unwrap();
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = ReasonClassifier::default();
        let text = "Salmonella and undeclared milk detected";
        let first = classifier.classify(Some(text));
        for _ in 0..10 {
            assert_eq!(classifier.classify(Some(text)), first);
        }
    }
}
