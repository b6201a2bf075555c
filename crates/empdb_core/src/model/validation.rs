//! Validation errors shared by all domain records.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level rule violation detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// `from_date` is later than `to_date`.
    ReversedPeriod { from: NaiveDate, to: NaiveDate },
    NegativeSalary(i64),
    /// Employee numbers are positive integers.
    InvalidEmpNo(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` cannot be empty"),
            Self::ReversedPeriod { from, to } => {
                write!(f, "from_date {from} is later than to_date {to}")
            }
            Self::NegativeSalary(value) => write!(f, "salary must be >= 0, got {value}"),
            Self::InvalidEmpNo(value) => write!(f, "emp_no must be positive, got {value}"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn require_period(from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if from > to {
        return Err(ValidationError::ReversedPeriod { from, to });
    }
    Ok(())
}

pub(crate) fn require_emp_no(emp_no: i64) -> Result<(), ValidationError> {
    if emp_no <= 0 {
        return Err(ValidationError::InvalidEmpNo(emp_no));
    }
    Ok(())
}
