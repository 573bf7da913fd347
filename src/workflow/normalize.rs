//! Payload normalizer: raw form strings -> typed scoring request.

use crate::domain::{FieldKey, ScoringRequest, ValueType};

use super::form::FormState;

/// Why a raw value could not be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationReason {
    NotANumber,
    NotAnInteger,
    BelowMinimum(f64),
    AboveMaximum(f64),
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::NotANumber => write!(f, "not a number"),
            ValidationReason::NotAnInteger => write!(f, "not an integer"),
            ValidationReason::BelowMinimum(min) => write!(f, "must be at least {min}"),
            ValidationReason::AboveMaximum(max) => write!(f, "must be at most {max}"),
        }
    }
}

/// A field that failed normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: FieldKey,
    pub reason: ValidationReason,
}

impl ValidationError {
    /// Message phrased with the field's display label.
    pub fn user_message(&self) -> String {
        format!("{}: {}.", self.field.label(), self.reason)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.wire_name(), self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Build a scoring request from the current form.
///
/// Fields are checked in form order and the first failure is reported.
/// Enumerated text fields are passed through verbatim.
pub fn normalize(form: &FormState) -> Result<ScoringRequest, ValidationError> {
    Ok(ScoringRequest {
        applicant_income: parse_float(form, FieldKey::ApplicantIncome)?,
        loan_amount: parse_float(form, FieldKey::LoanAmount)?,
        existing_debt: parse_float(form, FieldKey::ExistingDebt)?,
        loan_term_months: parse_integer(form, FieldKey::LoanTermMonths)?,
        credit_history_months: parse_integer(form, FieldKey::CreditHistoryMonths)?,
        employment_status: text(form, FieldKey::EmploymentStatus),
        education: text(form, FieldKey::Education),
        property_area: text(form, FieldKey::PropertyArea),
        dependents: parse_integer(form, FieldKey::Dependents)?,
    })
}

fn parse_float(form: &FormState, field: FieldKey) -> Result<f64, ValidationError> {
    debug_assert_eq!(field.spec().value_type, ValueType::Float);
    let value = form
        .get(field)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError {
            field,
            reason: ValidationReason::NotANumber,
        })?;
    check_bounds(field, value)?;
    Ok(value)
}

fn parse_integer(form: &FormState, field: FieldKey) -> Result<i64, ValidationError> {
    debug_assert_eq!(field.spec().value_type, ValueType::Integer);
    let value = form
        .get(field)
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError {
            field,
            reason: ValidationReason::NotAnInteger,
        })?;
    check_bounds(field, value as f64)?;
    Ok(value)
}

fn text(form: &FormState, field: FieldKey) -> String {
    form.get(field).to_string()
}

fn check_bounds(field: FieldKey, value: f64) -> Result<(), ValidationError> {
    let spec = field.spec();
    if let Some(min) = spec.min {
        if value < min {
            return Err(ValidationError {
                field,
                reason: ValidationReason::BelowMinimum(min),
            });
        }
    }
    if let Some(max) = spec.max {
        if value > max {
            return Err(ValidationError {
                field,
                reason: ValidationReason::AboveMaximum(max),
            });
        }
    }
    Ok(())
}
