//! Wire types exchanged with the scoring service.
//!
//! These types are serializable so they can be:
//!
//! - sent/received over HTTP
//! - printed as JSON by `credit-risk score --json`

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalized scoring request payload.
///
/// Field names are the exact JSON keys expected by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub applicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: i64,
    pub credit_history_months: i64,
    pub employment_status: String,
    pub property_area: String,
    pub dependents: i64,
    pub education: String,
    pub existing_debt: f64,
}

/// Qualitative risk bucket returned by the scoring service.
///
/// The category comes from an external service, so unrecognized values are
/// preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Other(String),
}

impl RiskCategory {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LOW" => RiskCategory::Low,
            "MEDIUM" => RiskCategory::Medium,
            "HIGH" => RiskCategory::High,
            other => RiskCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
            RiskCategory::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskCategory::parse(&raw))
    }
}

/// Ordered explanation factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFactors {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Successful scoring response.
///
/// Every field is required: a 2xx body missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub approval_recommendation: String,
    pub confidence: f64,
    pub debt_to_income_ratio: f64,
    pub loan_to_income_ratio: f64,
    pub key_factors: KeyFactors,
    pub application_id: String,
    /// Timestamp as sent by the service; parsed only for display.
    pub processed_at: String,
}
