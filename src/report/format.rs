//! Plain-text rendering for terminal output.
//!
//! Formatting lives in one place so the workflow code stays free of layout
//! concerns and output changes are localized.

use crate::domain::{FieldKey, InputKind};

use super::present::DisplayModel;

const BAR_WIDTH: usize = 30;

/// Full assessment report, as printed by `credit-risk score`.
pub fn format_assessment(model: &DisplayModel) -> String {
    let mut out = String::new();

    out.push_str("=== Risk Assessment Complete ===\n");
    out.push_str(&format!("Score: {}/100  [{}]\n", model.score, bar(model.gauge_fraction)));
    out.push_str(&format!("Category: {}\n", model.badge));
    out.push_str(&format!("Recommendation: {}\n", model.recommendation));
    out.push_str(&format!(
        "Confidence: {}  [{}]\n",
        model.confidence_pct,
        bar(model.confidence_fraction)
    ));

    out.push_str("\nFinancial ratios:\n");
    out.push_str(&format!("- Debt-to-Income: {}\n", model.debt_to_income));
    out.push_str(&format!("- Loan-to-Income: {}\n", model.loan_to_income));

    out.push_str("\nPositive factors:\n");
    out.push_str(&format_factors(&model.positive_factors));
    out.push_str("\nRisk factors:\n");
    out.push_str(&format_factors(&model.negative_factors));

    out.push_str(&format!("\nApplication ID: {}\n", model.application_id));
    out.push_str(&format!("Processed: {}\n", model.processed_at));

    out
}

/// The field registry as a table, for `credit-risk fields`.
pub fn format_field_registry() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:<26} {:<10} {}\n", "key", "label", "default", "choices"));
    for key in FieldKey::ALL {
        let spec = key.spec();
        let default = if spec.default.is_empty() { "-" } else { spec.default };
        let choices = match spec.input {
            InputKind::Enumerated => spec
                .choices
                .iter()
                .map(|c| c.value)
                .collect::<Vec<_>>()
                .join(", "),
            InputKind::Numeric => bounds_hint(spec.min, spec.max),
        };
        out.push_str(&format!(
            "{:<24} {:<26} {:<10} {choices}\n",
            spec.wire_name, spec.label, default
        ));
    }
    out
}

fn bounds_hint(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("number {lo}..={hi}"),
        (Some(lo), None) => format!("number >= {lo}"),
        (None, Some(hi)) => format!("number <= {hi}"),
        (None, None) => "number".to_string(),
    }
}

fn format_factors(factors: &[String]) -> String {
    if factors.is_empty() {
        return "  (none)\n".to_string();
    }
    factors.iter().map(|f| format!("  • {f}\n")).collect()
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::present::CategoryColor;

    fn model() -> DisplayModel {
        DisplayModel {
            score: "72".to_string(),
            gauge_fraction: 0.72,
            gauge_angle_deg: 129.6,
            gauge_arc: 180.864,
            category: "MEDIUM".to_string(),
            badge: "MEDIUM RISK".to_string(),
            color: CategoryColor::Amber,
            recommendation: "REVIEW".to_string(),
            recommendation_color: Some(CategoryColor::Amber),
            confidence_fraction: 0.5,
            confidence_pct: "50%".to_string(),
            debt_to_income: "30%".to_string(),
            loan_to_income: "3×".to_string(),
            positive_factors: vec!["Long credit history".to_string()],
            negative_factors: vec![],
            application_id: "APP-7".to_string(),
            processed_at: "2024-05-01 10:15:00".to_string(),
        }
    }

    #[test]
    fn assessment_contains_key_lines() {
        let text = format_assessment(&model());
        assert!(text.contains("Score: 72/100"));
        assert!(text.contains("Category: MEDIUM RISK"));
        assert!(text.contains("Confidence: 50%  [###############...............]"));
        assert!(text.contains("- Loan-to-Income: 3×"));
        assert!(text.contains("  • Long credit history\n"));
        assert!(text.contains("Risk factors:\n  (none)\n"));
        assert!(text.contains("Application ID: APP-7"));
    }

    #[test]
    fn registry_lists_every_field() {
        let text = format_field_registry();
        for key in FieldKey::ALL {
            assert!(text.contains(key.wire_name()), "{key}");
        }
        assert!(text.contains("employed, self_employed, unemployed"));
        assert!(text.contains("number 0..=600"));
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar(2.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(-1.0), ".".repeat(BAR_WIDTH));
    }
}
