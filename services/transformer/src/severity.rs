//! Per-source severity tables for the classification dimension.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::High => "High",
            SeverityLevel::Medium => "Medium",
            SeverityLevel::Low => "Low",
            SeverityLevel::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Severity {
    pub level: SeverityLevel,
    pub score: i32,
}

impl Severity {
    pub const UNKNOWN: Severity = Severity::new(SeverityLevel::Unknown, 0);

    pub const fn new(level: SeverityLevel, score: i32) -> Self {
        Self { level, score }
    }
}

use SeverityLevel::{High, Low, Medium, Unknown};

const US_CLASS: &[(&str, Severity)] = &[
    ("Class I", Severity::new(High, 10)),
    ("Class II", Severity::new(Medium, 5)),
    ("Class III", Severity::new(Low, 2)),
];

const RASFF_RISK: &[(&str, Severity)] = &[
    ("serious", Severity::new(High, 10)),
    ("potentially serious", Severity::new(High, 8)),
    ("potential risk", Severity::new(Medium, 5)),
    ("not serious", Severity::new(Low, 2)),
    ("undecided", Severity::new(Unknown, 0)),
    ("not determined", Severity::new(Unknown, 0)),
];

/// Fallback when a RASFF notification carries no usable risk decision.
/// Post-2020 names come first; the substring pass depends on this order.
const RASFF_NOTIFICATION: &[(&str, Severity)] = &[
    ("alert notification", Severity::new(High, 9)),
    ("border rejection notification", Severity::new(Medium, 6)),
    ("information notification for attention", Severity::new(Medium, 5)),
    ("information notification for follow-up", Severity::new(Medium, 4)),
    ("non-compliance notification", Severity::new(Medium, 5)),
    ("alert", Severity::new(High, 9)),
    ("border rejection", Severity::new(Medium, 6)),
    ("information for attention", Severity::new(Medium, 5)),
    ("information for follow-up", Severity::new(Medium, 4)),
    ("information", Severity::new(Low, 3)),
    ("news", Severity::new(Low, 2)),
];

const UK_ALERT: &[(&str, Severity)] = &[
    ("Allergy Alert", Severity::new(High, 8)),
    ("Product Recall", Severity::new(High, 9)),
    ("Food Alert For Action", Severity::new(High, 10)),
    ("Alert", Severity::new(Medium, 5)),
];

/// Pre-2021 RASFF notification names and their current equivalents.
const RASFF_NOTIFICATION_RENAMES: &[(&str, &str)] = &[
    ("alert", "alert notification"),
    ("border rejection", "border rejection notification"),
    ("information for attention", "information notification for attention"),
    ("information for follow-up", "information notification for follow-up"),
];

/// Ordered severity lookup tables, injected into the dimension builder.
#[derive(Debug, Clone)]
pub struct SeverityTables {
    pub us_class: Vec<(String, Severity)>,
    pub rasff_risk: Vec<(String, Severity)>,
    pub rasff_notification: Vec<(String, Severity)>,
    pub uk_alert: Vec<(String, Severity)>,
    pub uk_default: Severity,
    pub rasff_notification_renames: Vec<(String, String)>,
}

fn owned<T: Copy>(table: &[(&str, T)]) -> Vec<(String, T)> {
    table.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn exact<'a, T>(table: &'a [(String, T)], key: &str) -> Option<&'a T> {
    table.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

impl Default for SeverityTables {
    fn default() -> Self {
        Self {
            us_class: owned(US_CLASS),
            rasff_risk: owned(RASFF_RISK),
            rasff_notification: owned(RASFF_NOTIFICATION),
            uk_alert: owned(UK_ALERT),
            uk_default: Severity::new(Medium, 5),
            rasff_notification_renames: RASFF_NOTIFICATION_RENAMES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SeverityTables {
    /// FDA and FSIS share the US class table; `class` must already be in
    /// `Class I/II/III` form.
    pub fn us_class(&self, class: &str) -> Severity {
        exact(&self.us_class, class)
            .copied()
            .unwrap_or(Severity::UNKNOWN)
    }

    /// Severity from the risk decision, falling back to the notification type
    /// when the decision is absent or maps to `Unknown`.
    pub fn rasff(&self, notification_type: &str, risk_decision: &str) -> Severity {
        let risk = exact(&self.rasff_risk, &risk_decision.to_lowercase())
            .copied()
            .unwrap_or(Severity::UNKNOWN);
        if risk.level != SeverityLevel::Unknown {
            return risk;
        }

        let notification = notification_type.trim().to_lowercase();
        if let Some(severity) = exact(&self.rasff_notification, &notification) {
            return *severity;
        }
        self.rasff_notification
            .iter()
            .find(|(key, _)| notification.contains(key.as_str()) || key.contains(&notification))
            .map(|(_, severity)| *severity)
            .unwrap_or(risk)
    }

    pub fn uk_alert(&self, alert_type: &str) -> Severity {
        exact(&self.uk_alert, alert_type)
            .copied()
            .unwrap_or(self.uk_default)
    }

    pub fn rasff_notification_name(&self, notification_type: &str) -> String {
        exact(&self.rasff_notification_renames, notification_type)
            .cloned()
            .unwrap_or_else(|| notification_type.to_string())
    }
}

/// Normalizes FSIS numeric class codes (`1`, `2.0`, ...) to `Class I/II/III`.
pub fn fsis_class_label(class: &str) -> String {
    let trimmed = class.trim();
    let numeric = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    match numeric {
        "1" => "Class I".to_string(),
        "2" => "Class II".to_string(),
        "3" => "Class III".to_string(),
        _ => trimmed.to_string(),
    }
}
