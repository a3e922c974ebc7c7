//! Product categorization for the product dimension.

/// Keyword groups tried in order against a lower-cased description.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Meat/Poultry",
        &["beef", "steak", "burger", "meat", "pork", "chicken", "poultry", "turkey"],
    ),
    ("Fish/Seafood", &["fish", "salmon", "tuna", "seafood", "shrimp", "crab"]),
    ("Dairy", &["milk", "cheese", "dairy", "yogurt", "butter", "cream"]),
    ("Vegetables", &["vegetable", "lettuce", "spinach", "tomato", "salad"]),
    ("Fruits", &["fruit", "apple", "orange", "berry", "grape"]),
    ("Nuts/Seeds", &["nut", "peanut", "almond", "cashew"]),
    ("Bakery", &["bread", "bakery", "cookie", "cake", "pastry"]),
    ("Confectionery", &["candy", "chocolate", "sweet"]),
    ("Spices/Seasonings", &["spice", "seasoning", "herb"]),
    ("Dietary Supplements", &["supplement", "vitamin", "dietary"]),
];

/// Product category (source or derived) -> broad product type.
const PRODUCT_TYPES: &[(&str, &str)] = &[
    ("fruits and vegetables", "Fresh Produce"),
    ("Fruits", "Fresh Produce"),
    ("Vegetables", "Fresh Produce"),
    ("poultry meat and poultry meat products", "Fresh Protein"),
    ("Meat/Poultry", "Fresh Protein"),
    ("meat and meat products (other than poultry)", "Fresh Protein"),
    ("poultry", "Fresh Protein"),
    ("meat", "Fresh Protein"),
    ("fish and fish products", "Seafood"),
    ("Fish/Seafood", "Seafood"),
    ("fish", "Seafood"),
    ("bivalve molluscs and products thereof", "Seafood"),
    ("crustaceans and products thereof", "Seafood"),
    ("cephalopods and products thereof", "Seafood"),
    ("Dairy", "Dairy"),
    ("milk and milk products", "Dairy"),
    ("cereals and bakery products", "Bakery/Grains"),
    ("Bakery", "Bakery/Grains"),
    ("cereals/bakery", "Bakery/Grains"),
    ("nuts, nut products and seeds", "Nuts/Seeds"),
    ("Nuts/Seeds", "Nuts/Seeds"),
    ("nuts/seeds", "Nuts/Seeds"),
    ("herbs and spices", "Ingredients"),
    ("Spices/Seasonings", "Ingredients"),
    ("herbs/spices", "Ingredients"),
    ("food additives and flavourings", "Ingredients"),
    ("dietetic foods, food supplements and fortified foods", "Supplement"),
    ("dietetic foods, food supplements, fortified foods", "Supplement"),
    ("Dietary Supplements", "Supplement"),
    ("supplements", "Supplement"),
    ("prepared dishes and snacks", "Ready-to-Eat"),
    ("ices and desserts", "Ready-to-Eat"),
    ("confectionery", "Confectionery"),
    ("Confectionery", "Confectionery"),
    ("cocoa and cocoa preparations, coffee and tea", "Confectionery"),
    ("soups, broths, sauces and condiments", "Processed"),
    ("fats and oils", "Processed"),
    ("alcoholic beverages", "Beverage"),
    ("non-alcoholic beverages", "Beverage"),
    ("water for human consumption", "Beverage"),
    ("feed materials", "Animal Feed"),
    ("pet food", "Animal Feed"),
    ("compound feeds", "Animal Feed"),
    ("feed additives", "Animal Feed"),
    ("feed premixtures", "Animal Feed"),
    ("food contact materials", "Non-Food"),
    (
        "materials and articles intended to come into contact with foodstuffs",
        "Non-Food",
    ),
];

/// Substring fallbacks for categories missing from [`PRODUCT_TYPES`].
const PRODUCT_TYPE_HINTS: &[(&[&str], &str)] = &[
    (&["meat", "poultry"], "Fresh Protein"),
    (&["fish", "seafood"], "Seafood"),
    (&["dairy", "milk"], "Dairy"),
    (&["vegetable", "fruit"], "Fresh Produce"),
    (&["supplement", "vitamin"], "Supplement"),
    (&["feed", "pet food"], "Animal Feed"),
];

/// Derives a product category from a free-text description.
pub fn categorize(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or("Other")
}

pub fn product_type(category: Option<&str>) -> &'static str {
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return "Unknown";
    };
    let lower = category.to_lowercase();

    if let Some((_, kind)) = PRODUCT_TYPES
        .iter()
        .find(|(key, _)| *key == lower || key.to_lowercase() == lower)
    {
        return *kind;
    }

    PRODUCT_TYPE_HINTS
        .iter()
        .find(|(hints, _)| hints.iter().any(|h| lower.contains(h)))
        .map(|(_, kind)| *kind)
        .unwrap_or("Other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_by_keyword_order() {
        assert_eq!(categorize("Chicken Salad Sandwich"), "Meat/Poultry");
        assert_eq!(categorize("Smoked Salmon"), "Fish/Seafood");
        assert_eq!(categorize("Whole Milk Yogurt"), "Dairy");
        assert_eq!(categorize("Roasted Almonds"), "Nuts/Seeds");
        assert_eq!(categorize("Sparkling Water"), "Other");
    }

    #[test]
    fn test_product_type_direct_and_case_insensitive() {
        assert_eq!(product_type(Some("Meat/Poultry")), "Fresh Protein");
        assert_eq!(product_type(Some("fish and fish products")), "Seafood");
        assert_eq!(product_type(Some("FRUITS AND VEGETABLES")), "Fresh Produce");
        assert_eq!(product_type(Some("Dietary Supplements")), "Supplement");
    }

    #[test]
    fn test_product_type_substring_fallback() {
        assert_eq!(product_type(Some("Beef")), "Other");
        assert_eq!(product_type(Some("Poultry/Chicken/Egg Products")), "Fresh Protein");
        assert_eq!(product_type(Some("raw milk cheese")), "Dairy");
    }

    #[test]
    fn test_product_type_missing() {
        assert_eq!(product_type(None), "Unknown");
        assert_eq!(product_type(Some("  ")), "Unknown");
    }
}
