//! Built-in keyword dictionaries for the recall reason classifier.
//!
//! Every table is matched by substring against lower-cased text, in
//! declaration order. Reordering entries changes classifications.

/// Bacteria, viruses, parasites and molds.
pub const PATHOGENS: &[(&str, &str)] = &[
    ("listeria", "Listeria monocytogenes"),
    ("listeria monocytogenes", "Listeria monocytogenes"),
    ("listeriosis", "Listeria monocytogenes"),
    ("l. monocytogenes", "Listeria monocytogenes"),
    ("l.monocytogenes", "Listeria monocytogenes"),
    ("l. mono", "Listeria monocytogenes"),
    ("l.mono", "Listeria monocytogenes"),
    ("salmonella", "Salmonella"),
    ("salmonellosis", "Salmonella"),
    ("s. enteritidis", "Salmonella"),
    ("s. typhimurium", "Salmonella"),
    ("e. coli", "E. coli"),
    ("e.coli", "E. coli"),
    ("escherichia coli", "E. coli"),
    ("coliform", "Coliforms"),
    ("stec", "E. coli (STEC)"),
    ("o157", "E. coli O157:H7"),
    ("o157:h7", "E. coli O157:H7"),
    ("clostridium botulinum", "Clostridium botulinum"),
    ("c. botulinum", "Clostridium botulinum"),
    ("botulism", "Clostridium botulinum"),
    ("botulinum", "Clostridium botulinum"),
    ("campylobacter", "Campylobacter"),
    ("staphylococcus", "Staphylococcus aureus"),
    ("s. aureus", "Staphylococcus aureus"),
    ("bacillus cereus", "Bacillus cereus"),
    ("b. cereus", "Bacillus cereus"),
    ("cronobacter", "Cronobacter"),
    ("shigella", "Shigella"),
    ("vibrio", "Vibrio"),
    ("yersinia", "Yersinia"),
    ("clostridium perfringens", "Clostridium perfringens"),
    ("c. perfringens", "Clostridium perfringens"),
    ("hepatitis a", "Hepatitis A"),
    ("hepatitis", "Hepatitis A"),
    ("norovirus", "Norovirus"),
    ("cyclospora", "Cyclospora"),
    ("cryptosporidium", "Cryptosporidium"),
    ("trichinella", "Trichinella"),
    ("anisakis", "Anisakis"),
    ("aflatoxin", "Aflatoxin (Mold)"),
    ("mycotoxin", "Mycotoxin (Mold)"),
    ("ochratoxin", "Ochratoxin (Mold)"),
    ("patulin", "Patulin (Mold)"),
    ("mold", "Mold"),
    ("mould", "Mold"),
];

/// US major allergens plus the EU list.
pub const ALLERGENS: &[(&str, &str)] = &[
    ("milk", "Milk"),
    ("dairy", "Milk"),
    ("lactose", "Milk"),
    ("casein", "Milk"),
    ("whey", "Milk"),
    ("cream", "Milk"),
    ("butter", "Milk"),
    ("cheese", "Milk"),
    ("egg", "Eggs"),
    ("eggs", "Eggs"),
    ("albumin", "Eggs"),
    ("ovalbumin", "Eggs"),
    ("wheat", "Wheat"),
    ("gluten", "Wheat/Gluten"),
    ("barley", "Wheat/Gluten"),
    ("rye", "Wheat/Gluten"),
    ("oats", "Wheat/Gluten"),
    ("peanut", "Peanuts"),
    ("peanut protein", "Peanuts"),
    ("peanuts", "Peanuts"),
    ("tree nut", "Tree Nuts"),
    ("tree nuts", "Tree Nuts"),
    ("almond", "Tree Nuts (Almond)"),
    ("almonds", "Tree Nuts (Almond)"),
    ("walnut", "Tree Nuts (Walnut)"),
    ("walnuts", "Tree Nuts (Walnut)"),
    ("cashew", "Tree Nuts (Cashew)"),
    ("cashews", "Tree Nuts (Cashew)"),
    ("pistachio", "Tree Nuts (Pistachio)"),
    ("pistachios", "Tree Nuts (Pistachio)"),
    ("pecan", "Tree Nuts (Pecan)"),
    ("pecans", "Tree Nuts (Pecan)"),
    ("hazelnut", "Tree Nuts (Hazelnut)"),
    ("hazelnuts", "Tree Nuts (Hazelnut)"),
    ("macadamia", "Tree Nuts (Macadamia)"),
    ("brazil nut", "Tree Nuts (Brazil Nut)"),
    ("soy", "Soy"),
    ("soya", "Soy"),
    ("soybean", "Soy"),
    ("soybeans", "Soy"),
    ("fish", "Fish"),
    ("anchovy", "Fish"),
    ("anchovies", "Fish"),
    ("cod", "Fish"),
    ("salmon", "Fish"),
    ("tuna", "Fish"),
    ("shellfish", "Shellfish"),
    ("crustacean", "Shellfish"),
    ("shrimp", "Shellfish"),
    ("crab", "Shellfish"),
    ("lobster", "Shellfish"),
    ("prawn", "Shellfish"),
    ("mollusc", "Molluscs"),
    ("mollusk", "Molluscs"),
    ("clam", "Molluscs"),
    ("mussel", "Molluscs"),
    ("oyster", "Molluscs"),
    ("squid", "Molluscs"),
    ("sesame", "Sesame"),
    ("celery", "Celery"),
    ("mustard", "Mustard"),
    ("lupin", "Lupin"),
    ("sulphite", "Sulphites"),
    ("sulfite", "Sulphites"),
    ("sulphur dioxide", "Sulphites"),
    ("lactoprotein", "Milk"),
    ("(allergens)", "Allergens - Other"),
    ("nuts (allergens)", "Tree Nuts"),
];

/// Heavy metals, pesticides, drug residues, migration substances, natural
/// toxins, undeclared drugs and industrial contaminants.
pub const CHEMICALS: &[(&str, &str)] = &[
    ("lead", "Lead"),
    ("mercury", "Mercury"),
    ("cadmium", "Cadmium"),
    ("arsenic", "Arsenic"),
    ("pesticide", "Pesticides"),
    ("herbicide", "Pesticides"),
    ("insecticide", "Pesticides"),
    ("chlorpyrifos", "Pesticides"),
    ("dieldrin", "Pesticides"),
    ("glyphosate", "Pesticides"),
    ("melamine", "Melamine"),
    ("ethylene oxide", "Ethylene Oxide"),
    ("dioxin", "Dioxins"),
    ("pcb", "PCBs"),
    ("polychlorinated", "PCBs"),
    ("pah", "PAHs"),
    ("benzo[a]pyrene", "PAHs"),
    ("benzo(a)pyrene", "PAHs"),
    ("polycyclic aromatic", "PAHs"),
    ("acrylamide", "Acrylamide"),
    ("benzene", "Benzene"),
    ("veterinary drug", "Veterinary Drugs"),
    ("veterinary medicinal", "Veterinary Drugs"),
    ("antibiotic", "Antibiotics"),
    ("chloramphenicol", "Antibiotics"),
    ("nitrofuran", "Antibiotics"),
    ("beta lactam", "Antibiotics"),
    ("beta-lactam", "Antibiotics"),
    ("leucomalachite", "Veterinary Drugs"),
    ("malachite green", "Veterinary Drugs"),
    ("clenbuterol", "Veterinary Drugs"),
    ("histamine", "Histamine"),
    ("scombroid", "Histamine"),
    ("(migration)", "Migration (Packaging)"),
    ("migration", "Migration (Packaging)"),
    ("phthalate", "Phthalates (Migration)"),
    ("dinch", "DINCH (Migration)"),
    ("esbo", "ESBO (Migration)"),
    ("epoxidised soybean oil", "ESBO (Migration)"),
    ("dotp", "DOTP (Migration)"),
    ("primary aromatic amines", "Aromatic Amines (Migration)"),
    ("environmental pollutant", "Environmental Pollutants"),
    ("(environmental pollutants)", "Environmental Pollutants"),
    ("pyrrolizidine", "Pyrrolizidine Alkaloids"),
    ("alkaloid", "Plant Alkaloids"),
    ("natural toxin", "Natural Toxins"),
    ("(natural toxins)", "Natural Toxins"),
    ("tropane", "Tropane Alkaloids"),
    ("cyanide", "Cyanide"),
    ("glycoalkaloid", "Glycoalkaloids"),
    ("solanine", "Glycoalkaloids"),
    ("sildenafil", "Undeclared Drugs"),
    ("tadalafil", "Undeclared Drugs"),
    ("anabolic steroid", "Undeclared Drugs"),
    ("steroid", "Undeclared Drugs"),
    ("picamilon", "Undeclared Drugs"),
    ("hidden drug", "Undeclared Drugs"),
    ("drug ingredient", "Undeclared Drugs"),
    ("unapproved ingredient", "Unauthorised Substances"),
    ("unauthorised substance", "Unauthorised Substances"),
    ("unauthorised", "Unauthorised Substances"),
    ("cyclamate", "Unauthorised Substances"),
    ("kratom", "Unauthorised Substances"),
    ("dmha", "Unauthorised Substances"),
    ("dmaa", "Unauthorised Substances"),
    ("dimethylamylamine", "Unauthorised Substances"),
    ("hordenine", "Unauthorised Substances"),
    ("oleander", "Toxic Plants"),
    ("toxic", "Toxic Substances"),
    ("poisonous", "Toxic Substances"),
    ("cleaning solution", "Cleaning Chemicals"),
    ("cleaning agent", "Cleaning Chemicals"),
    ("3-mcpd", "3-MCPD"),
    ("monochlor", "3-MCPD"),
    ("glycidyl", "Glycidyl Esters"),
    ("(industrial contaminants)", "Industrial Contaminants"),
    ("(process contaminants)", "Process Contaminants"),
    ("thc", "THC (Cannabis)"),
    ("tetrahydrocanabinol", "THC (Cannabis)"),
    ("cannabidiol", "CBD (Cannabis)"),
    ("cbd", "CBD (Cannabis)"),
    ("tbhq", "Food Additives Issues"),
    ("tert-butylhydroquinone", "Food Additives Issues"),
    ("dmps", "Food Additives Issues"),
    ("dimethyl polysiloxane", "Food Additives Issues"),
    ("excessive amount", "Food Additives Issues"),
];

/// RASFF hazard-category spellings that are chemical contaminants.
pub const RASFF_CONTAMINANTS: &[(&str, &str)] = &[
    ("residues of veterinary", "Veterinary Drug Residues"),
    ("(residues of veterinary", "Veterinary Drug Residues"),
    ("food additives", "Food Additives Issues"),
    ("(food additives", "Food Additives Issues"),
    ("flavouring", "Food Additives Issues"),
    ("rhodamine", "Unauthorised Colors"),
];

pub const FOREIGN_OBJECTS: &[(&str, &str)] = &[
    ("metal", "Metal Fragments"),
    ("wire", "Metal Fragments"),
    ("glass", "Glass Fragments"),
    ("plastic", "Plastic Pieces"),
    ("polyethylene", "Plastic Pieces"),
    ("wood", "Wood Pieces"),
    ("stone", "Stones"),
    ("rubber", "Rubber Pieces"),
    ("cloth", "Cloth/Fabric"),
    ("bone", "Bone Fragments"),
    ("insect", "Insects"),
    ("rodent", "Rodent Contamination"),
    ("pest", "Pest Contamination"),
    ("hair", "Hair/Foreign Matter"),
    ("human fingertip", "Human Body Parts"),
    ("extraneous", "Foreign Matter"),
    ("foreign material", "Foreign Matter"),
    ("foreign matter", "Foreign Matter"),
    ("foreign object", "Foreign Matter"),
    ("foreign body", "Foreign Matter"),
    ("foreign bodies", "Foreign Matter"),
    ("fragments", "Fragments"),
    ("physical hazard", "Physical Hazard"),
    ("physical contaminant", "Foreign Matter"),
];

/// Keyword -> process issue type (Level 2 of the Process Issue branch).
pub const PROCESS_ISSUES: &[(&str, &str)] = &[
    ("cgmp", "cGMP Issues"),
    ("good manufacturing", "cGMP Issues"),
    ("manufacturing practice", "cGMP Issues"),
    ("under gmp", "cGMP Issues"),
    ("sanitation", "cGMP Issues"),
    ("sanitary", "cGMP Issues"),
    ("sanitizer", "cGMP Issues"),
    ("hygienic", "cGMP Issues"),
    ("infestation of mice", "cGMP Issues"),
    ("insanitary", "cGMP Issues"),
    ("unsanitary", "cGMP Issues"),
    ("haccp", "HACCP Issues"),
    ("critical control", "HACCP Issues"),
    ("manufacturing defect", "Manufacturing Issues"),
    ("production error", "Manufacturing Issues"),
    ("process deviation", "Manufacturing Issues"),
    ("equipment failure", "Manufacturing Issues"),
    ("cross-contact", "Manufacturing Issues"),
    ("cross contact", "Manufacturing Issues"),
    ("pasteurization", "Manufacturing Issues"),
    ("pasteurisation", "Manufacturing Issues"),
    ("mislabel", "Mislabeling"),
    ("misbranding", "Mislabeling"),
    ("misbrand", "Mislabeling"),
    ("incorrect label", "Mislabeling"),
    ("wrong label", "Mislabeling"),
    ("labeling error", "Mislabeling"),
    ("label error", "Mislabeling"),
    ("packaging error", "Mislabeling"),
    ("wrong package", "Mislabeling"),
    ("does not contain a listing", "Mislabeling"),
    ("fails to list", "Mislabeling"),
    ("labels lack", "Mislabeling"),
    ("labeled in english", "Mislabeling"),
    ("not fda approved", "Regulatory Issues"),
    ("temperature abuse", "Refrigeration Issues"),
    ("cold chain", "Refrigeration Issues"),
    ("refrigeration", "Refrigeration Issues"),
    ("temperature control", "Refrigeration Issues"),
    ("keep refrigerated", "Refrigeration Issues"),
    ("not held at an appropriate temperature", "Refrigeration Issues"),
    ("holding temperature", "Refrigeration Issues"),
    ("cooler", "Refrigeration Issues"),
    ("underprocess", "Under-Processing"),
    ("under-process", "Under-Processing"),
    ("undercook", "Under-Processing"),
    ("under-cook", "Under-Processing"),
    ("insufficient processing", "Under-Processing"),
    ("inadequate processing", "Under-Processing"),
    ("inadequate heat", "Under-Processing"),
    ("low acid", "Under-Processing"),
    ("swollen", "Under-Processing"),
    ("bloated", "Under-Processing"),
    ("packaging defective", "Packaging Issues"),
    ("packaging incorrect", "Packaging Issues"),
    ("packaging concern", "Packaging Issues"),
    ("air space", "Packaging Issues"),
    ("(packaging", "Packaging Issues"),
    ("(composition)", "Composition Issues"),
    ("composition", "Composition Issues"),
    ("vitamin d", "Composition Issues"),
    ("genetically modified", "GMO Issues"),
    ("novel food", "Novel Food Issues"),
    ("(novel food)", "Novel Food Issues"),
    ("foodborne outbreak", "Foodborne Outbreak"),
    ("labelling (labelling", "Mislabeling"),
    ("labelling absent", "Mislabeling"),
    ("labelling incomplete", "Mislabeling"),
    ("labelling incorrect", "Mislabeling"),
    ("expiry date", "Mislabeling"),
    ("expiration date", "Mislabeling"),
    ("thermal processing", "Under-Processing"),
    ("poor or insufficient controls", "Manufacturing Issues"),
    ("processing defect", "Manufacturing Issues"),
    ("without inspection", "Regulatory Issues"),
    ("import violation", "Regulatory Issues"),
    ("suffocation", "Physical Hazard"),
    ("choking", "Physical Hazard"),
    ("mouth injury", "Physical Hazard"),
    ("organoleptic", "Quality Issues"),
    ("acidity", "Quality Issues"),
    ("off-odour", "Quality Issues"),
    ("off-flavour", "Quality Issues"),
    ("spoilage", "Quality Issues"),
    ("food poisoning", "Foodborne Illness"),
    ("allergic reaction", "Allergic Reaction"),
];

/// Signals that an allergen is present but not declared.
pub const UNDECLARED_SIGNALS: &[&str] = &[
    "undeclared",
    "not declared",
    "may contain",
    "same equipment",
    "shared equipment",
    "presence of",
    "tested positive",
    "detected",
];

/// Signals that the label omits an ingredient.
pub const LABELING_SIGNALS: &[&str] = &[
    "does not declare",
    "do not declare",
    "not list",
    "without an ingredient",
    "absence of",
    "did not list",
    "not on the label",
    "missing",
];

/// Additional words that confirm an allergen keyword refers to an allergen.
pub const ALLERGEN_CONTEXT: &[&str] = &["label", "allerg"];

/// Co-occurring words that resolve the RASFF `(allergens)` tag.
pub const TAGGED_ALLERGENS: &[(&[&str], &str)] = &[
    (&["nuts"], "Tree Nuts"),
    (&["lactoprotein", "milk"], "Milk"),
];

pub const ALLERGEN_TAG: &str = "(allergens)";

/// Words that, next to "undeclared", indicate a food color.
pub const COLOR_TERMS: &[&str] = &["color", "colour", "dye"];

/// Markers that indicate a food color on their own.
pub const COLOR_MARKERS: &[&str] = &["fd&c", "artificial color"];

pub const GENERIC_BIOLOGICAL: &[&str] = &[
    "pathogen",
    "bacteria",
    "microbial",
    "microorganism",
    "contamination",
    "contaminated",
];
