//! Result presenter: a scoring result turned into ready-to-render values.
//!
//! Everything here is pure so that the TUI and the plain-text report show the
//! same numbers and colors.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use crate::domain::{RiskCategory, ScoringResult};

/// Arc length of the original 80-unit-radius semicircle gauge (π · 80).
pub const GAUGE_ARC_LENGTH: f64 = 251.2;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Gauge / badge color derived from the risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Green,
    Amber,
    Red,
}

impl CategoryColor {
    /// Unrecognized categories fall back to red.
    pub fn for_category(category: &RiskCategory) -> Self {
        match category {
            RiskCategory::Low => CategoryColor::Green,
            RiskCategory::Medium => CategoryColor::Amber,
            RiskCategory::High | RiskCategory::Other(_) => CategoryColor::Red,
        }
    }

    /// Color for an approval recommendation, matched case-insensitively.
    ///
    /// Values outside the approve/review/reject family get no color.
    pub fn for_recommendation(recommendation: &str) -> Option<Self> {
        const PREFIXES: [(&str, CategoryColor); 6] = [
            ("APPROVE", CategoryColor::Green),
            ("REVIEW", CategoryColor::Amber),
            ("CONDITIONAL", CategoryColor::Amber),
            ("REJECT", CategoryColor::Red),
            ("DECLINE", CategoryColor::Red),
            ("DENY", CategoryColor::Red),
        ];
        let rec = recommendation.trim().to_ascii_uppercase();
        PREFIXES
            .iter()
            .find(|(prefix, _)| rec.starts_with(*prefix))
            .map(|&(_, color)| color)
    }

    pub fn hex(self) -> &'static str {
        match self {
            CategoryColor::Green => "#10b981",
            CategoryColor::Amber => "#f59e0b",
            CategoryColor::Red => "#ef4444",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            CategoryColor::Green => (0x10, 0xb9, 0x81),
            CategoryColor::Amber => (0xf5, 0x9e, 0x0b),
            CategoryColor::Red => (0xef, 0x44, 0x44),
        }
    }
}

/// Display values for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    /// Raw score as text (e.g. `72`, `72.5`).
    pub score: String,
    /// Share of the gauge to fill, in `[0, 1]`.
    pub gauge_fraction: f64,
    /// Gauge sweep in degrees, `0..=180`.
    pub gauge_angle_deg: f64,
    /// Filled arc length on the reference gauge.
    pub gauge_arc: f64,
    pub category: String,
    pub badge: String,
    pub color: CategoryColor,
    pub recommendation: String,
    pub recommendation_color: Option<CategoryColor>,
    /// Confidence in `[0, 1]`, for bars.
    pub confidence_fraction: f64,
    /// Confidence as a whole percentage, e.g. `84%`.
    pub confidence_pct: String,
    pub debt_to_income: String,
    pub loan_to_income: String,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    pub application_id: String,
    pub processed_at: String,
}

pub fn present(result: &ScoringResult) -> DisplayModel {
    let gauge_fraction = unit_clamp(result.risk_score / 100.0);
    let color = CategoryColor::for_category(&result.risk_category);
    let category = result.risk_category.as_str().to_string();

    DisplayModel {
        score: fmt_number(result.risk_score),
        gauge_fraction,
        gauge_angle_deg: gauge_fraction * 180.0,
        gauge_arc: gauge_fraction * GAUGE_ARC_LENGTH,
        badge: format!("{category} RISK"),
        category,
        color,
        recommendation: result.approval_recommendation.clone(),
        recommendation_color: CategoryColor::for_recommendation(
            &result.approval_recommendation,
        ),
        confidence_fraction: unit_clamp(result.confidence),
        confidence_pct: format!("{:.0}%", result.confidence * 100.0),
        debt_to_income: format!("{}%", fmt_number(result.debt_to_income_ratio)),
        loan_to_income: format!("{}×", fmt_number(result.loan_to_income_ratio)),
        positive_factors: result.key_factors.positive.clone(),
        negative_factors: result.key_factors.negative.clone(),
        application_id: result.application_id.clone(),
        processed_at: fmt_timestamp(&result.processed_at),
    }
}

/// Clamp to `[0, 1]`; non-finite input maps to 0.
fn unit_clamp(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Print a number the way the service sent it: no trailing `.0`.
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// Local-time rendering of the service timestamp.
///
/// Offset timestamps are converted to local time; naive ones are taken as
/// already local. Unparseable input is shown verbatim.
pub fn fmt_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(TIMESTAMP_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KeyFactors;

    fn result(score: f64, category: &str) -> ScoringResult {
        ScoringResult {
            risk_score: score,
            risk_category: RiskCategory::parse(category),
            approval_recommendation: "REVIEW".to_string(),
            confidence: 0.84,
            debt_to_income_ratio: 30.0,
            loan_to_income_ratio: 3.5,
            key_factors: KeyFactors {
                positive: vec!["Stable employment".to_string(), "Low debt".to_string()],
                negative: vec!["Short credit history".to_string()],
            },
            application_id: "APP-42".to_string(),
            processed_at: "2024-05-01T10:15:00.123456".to_string(),
        }
    }

    #[test]
    fn medium_score_maps_to_amber_gauge() {
        let model = present(&result(72.0, "MEDIUM"));
        assert_eq!(model.color, CategoryColor::Amber);
        assert!((model.gauge_fraction - 0.72).abs() < 1e-12);
        assert!((model.gauge_angle_deg - 129.6).abs() < 1e-9);
        assert!((model.gauge_arc - 0.72 * 251.2).abs() < 1e-9);
        assert_eq!(model.score, "72");
        assert_eq!(model.badge, "MEDIUM RISK");
    }

    #[test]
    fn category_colors() {
        assert_eq!(present(&result(10.0, "LOW")).color, CategoryColor::Green);
        assert_eq!(present(&result(90.0, "HIGH")).color, CategoryColor::Red);
        assert_eq!(present(&result(90.0, "CRITICAL")).color, CategoryColor::Red);
        assert_eq!(present(&result(90.0, "CRITICAL")).badge, "CRITICAL RISK");
        assert_eq!(CategoryColor::Amber.hex(), "#f59e0b");
    }

    #[test]
    fn out_of_range_scores_are_clamped_for_the_gauge() {
        let high = present(&result(140.0, "HIGH"));
        assert_eq!(high.gauge_fraction, 1.0);
        assert_eq!(high.score, "140");

        let low = present(&result(-5.0, "LOW"));
        assert_eq!(low.gauge_fraction, 0.0);

        let nan = present(&result(f64::NAN, "LOW"));
        assert_eq!(nan.gauge_fraction, 0.0);
        assert_eq!(nan.score, "-");
    }

    #[test]
    fn formatting_of_confidence_and_ratios() {
        let model = present(&result(55.5, "MEDIUM"));
        assert_eq!(model.confidence_pct, "84%");
        assert!((model.confidence_fraction - 0.84).abs() < 1e-12);
        assert_eq!(model.debt_to_income, "30%");
        assert_eq!(model.loan_to_income, "3.5×");
        assert_eq!(model.score, "55.5");
    }

    #[test]
    fn out_of_range_confidence_is_clamped_for_bars() {
        let mut over = result(50.0, "MEDIUM");
        over.confidence = 1.7;
        let model = present(&over);
        assert_eq!(model.confidence_fraction, 1.0);
        assert_eq!(model.confidence_pct, "170%");

        let mut under = result(50.0, "MEDIUM");
        under.confidence = -0.2;
        let model = present(&under);
        assert_eq!(model.confidence_fraction, 0.0);
        assert_eq!(model.confidence_pct, "-20%");
    }

    #[test]
    fn recommendation_colors() {
        let model = present(&result(50.0, "MEDIUM"));
        assert_eq!(model.recommendation_color, Some(CategoryColor::Amber));
        assert_eq!(CategoryColor::for_recommendation("APPROVE"), Some(CategoryColor::Green));
        assert_eq!(CategoryColor::for_recommendation("approved"), Some(CategoryColor::Green));
        assert_eq!(CategoryColor::for_recommendation("REJECT"), Some(CategoryColor::Red));
        assert_eq!(CategoryColor::for_recommendation("ESCALATE"), None);
    }

    #[test]
    fn factors_keep_received_order() {
        let model = present(&result(20.0, "LOW"));
        assert_eq!(model.positive_factors, vec!["Stable employment", "Low debt"]);
        assert_eq!(model.negative_factors, vec!["Short credit history"]);
    }

    #[test]
    fn timestamps() {
        assert_eq!(fmt_timestamp("2024-05-01T10:15:00.123456"), "2024-05-01 10:15:00");
        assert_eq!(fmt_timestamp("2024-05-01T10:15:00"), "2024-05-01 10:15:00");
        assert_eq!(fmt_timestamp("yesterday"), "yesterday");
        assert_ne!(fmt_timestamp("2024-05-01T10:15:00Z"), "2024-05-01T10:15:00Z");
    }
}
